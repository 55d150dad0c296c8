use std::sync::Arc;

use crate::{
    dsp::{
        envelope::{Envelope, EnvelopeState},
        filter::SVFilter,
        oscillator::Wavetable,
    },
    synth::{
        params::{ControlSurface, SynthParams},
        telemetry::{ScopeFrame, TelemetrySink},
        voice::VoiceState,
    },
};

/*
Voice Block Processing
======================

The audio-thread half of the engine. Called once per audio block, it owns
every piece of DSP state outright; nothing here is shared except the
read-only view of `VoiceState`.

Per block
---------

  1. Sync both envelopes with the voice gate: a trigger generation we have
     not seen yet means Trigger; a low gate while an envelope is still
     held means Release. Catching up takes one block however many note
     edges happened in between.
  2. Snapshot the control surface and push the eleven values into the
     envelopes and the filter Q.
  3. Read the voice's centre frequency and velocity gain once.

Per sample
----------

        ┌───────────┐   ┌──────────────┐   ┌────────┐
        │ wavetable │──▶│ × amplitude  │──▶│ filter │──▶ × output_scale ──▶ out
        └───────────┘   └──────────────┘   └────────┘
              ▲                ▲                 ▲
         frequency      gain · ampEnv     base + sens · filterEnv

The same mono sample goes to every output channel and, together with the
amplitude and filter-envelope values, to the telemetry sink.

Nothing in `process_block` allocates or locks. A non-finite sample (which
the filter already guards against) is replaced with silence.
*/

pub struct VoiceProcessor {
    sample_rate: f32,
    channels: usize,
    output_scale: f32,

    voice: Arc<VoiceState>,
    /// Last trigger generation applied to the envelopes.
    seen_generation: u32,

    amplitude_env: Envelope,
    filter_env: Envelope,
    oscillator: Wavetable,
    filter: SVFilter,

    filter_base: f32,
    filter_sensitivity: f32,
}

impl VoiceProcessor {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        sample_rate: f32,
        channels: usize,
        output_scale: f32,
        voice: Arc<VoiceState>,
        amplitude_env: Envelope,
        filter_env: Envelope,
        oscillator: Wavetable,
        filter: SVFilter,
    ) -> Self {
        let mut processor = Self {
            sample_rate,
            channels: channels.max(1),
            output_scale,
            seen_generation: voice.trigger_generation(),
            voice,
            amplitude_env,
            filter_env,
            oscillator,
            filter,
            filter_base: 0.0,
            filter_sensitivity: 0.0,
        };
        processor.apply_params(&SynthParams::default());
        processor
    }

    /// Render one block of interleaved audio.
    ///
    /// `output` holds `frames * channels` samples; a trailing partial frame
    /// is zeroed.
    pub fn process_block<C, T>(&mut self, surface: &C, output: &mut [f32], telemetry: &mut T)
    where
        C: ControlSurface + ?Sized,
        T: TelemetrySink + ?Sized,
    {
        self.sync_gate();
        self.apply_params(&surface.snapshot());

        // Block-rate: ingress changes to pitch and velocity land next block
        let centre_frequency = self.voice.centre_frequency();
        let gain = self.voice.amplitude();

        let mut frames = output.chunks_exact_mut(self.channels);
        for frame in &mut frames {
            let frame_out = self.next_sample(centre_frequency, gain, telemetry);
            frame.fill(frame_out);
        }
        frames.into_remainder().fill(0.0);
    }

    #[inline]
    fn next_sample<T>(&mut self, centre_frequency: f32, gain: f32, telemetry: &mut T) -> f32
    where
        T: TelemetrySink + ?Sized,
    {
        self.oscillator.set_frequency(bent_frequency(centre_frequency));

        let amplitude = gain * self.amplitude_env.process();

        let filter_control = self.filter_env.process();
        self.filter
            .set_frequency(self.filter_base + self.filter_sensitivity * filter_control);

        let mut out = self.filter.process(self.oscillator.process() * amplitude) * self.output_scale;
        if !out.is_finite() {
            out = 0.0;
        }

        telemetry.log(ScopeFrame {
            out,
            amplitude,
            filter_control,
        });

        out
    }

    fn sync_gate(&mut self) {
        let generation = self.voice.trigger_generation();
        if generation != self.seen_generation {
            self.seen_generation = generation;
            self.amplitude_env.trigger();
            self.filter_env.trigger();
        }

        if !self.voice.is_active() {
            release_if_held(&mut self.amplitude_env);
            release_if_held(&mut self.filter_env);
        }
    }

    fn apply_params(&mut self, params: &SynthParams) {
        params.amplitude.apply_to(&mut self.amplitude_env);
        params.filter.apply_to(&mut self.filter_env);
        self.filter.set_q(params.filter_q);
        self.filter_base = params.filter_base;
        self.filter_sensitivity = params.filter_sensitivity;
    }

    /// True while either envelope is still producing output.
    pub fn is_sounding(&self) -> bool {
        self.amplitude_env.is_active() || self.filter_env.is_active()
    }

    pub fn amplitude_envelope(&self) -> &Envelope {
        &self.amplitude_env
    }

    pub fn filter_envelope(&self) -> &Envelope {
        &self.filter_env
    }

    pub fn voice_state(&self) -> &Arc<VoiceState> {
        &self.voice
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }
}

fn release_if_held(env: &mut Envelope) {
    if matches!(
        env.state(),
        EnvelopeState::Attack | EnvelopeState::Decay | EnvelopeState::Sustain
    ) {
        env.release();
    }
}

/// Pitch-bend composition point. Bend is not implemented, so the voice
/// plays the centre frequency unchanged.
#[inline]
fn bent_frequency(centre_frequency: f32) -> f32 {
    centre_frequency
}
