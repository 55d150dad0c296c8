use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    dsp::{
        envelope::{Envelope, EnvelopeCurve},
        filter::{FilterType, SVFilter},
        oscillator::{OscillatorWaveform, Wavetable, DEFAULT_HARMONICS, DEFAULT_TABLE_LEN},
    },
    error::{Error, Result},
    synth::{
        ingress::NoteInput,
        params::{ParamId, SynthParams},
        processor::VoiceProcessor,
        voice::VoiceState,
    },
};

/// Session settings, fixed for the lifetime of a [`MonoSynth`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    /// Output channels; every channel carries the same mono signal.
    pub channels: usize,
    /// Final gain after the filter.
    pub output_scale: f32,
    pub waveform: OscillatorWaveform,
    pub table_len: usize,
    pub harmonics: u32,
    pub envelope_curve: EnvelopeCurve,
    pub filter_type: FilterType,
    /// Listen to one MIDI channel (0-15) only, or all when `None`.
    pub midi_channel: Option<u8>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            channels: 2,
            output_scale: 0.5,
            waveform: OscillatorWaveform::Saw,
            table_len: DEFAULT_TABLE_LEN,
            harmonics: DEFAULT_HARMONICS,
            envelope_curve: EnvelopeCurve::Exponential,
            filter_type: FilterType::LowPass,
            midi_channel: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate >= 1_000.0) {
            return Err(Error::InvalidConfig("sample rate must be at least 1 kHz"));
        }
        if self.channels == 0 {
            return Err(Error::InvalidConfig("at least one output channel is required"));
        }
        if !self.output_scale.is_finite() {
            return Err(Error::InvalidConfig("output scale must be finite"));
        }
        if self.table_len < 2 {
            return Err(Error::InvalidConfig("wavetable needs at least two samples"));
        }
        if self.harmonics == 0 {
            return Err(Error::InvalidConfig("wavetable needs at least one harmonic"));
        }
        if self.midi_channel.is_some_and(|channel| channel > 15) {
            return Err(Error::InvalidConfig("MIDI channel must be 0-15"));
        }
        Ok(())
    }
}

/// One audio session: the audio-thread half and the MIDI-thread half of
/// the voice, wired together.
///
/// Move `processor` into the audio callback and `input` into the MIDI
/// callback. They share only the atomic [`VoiceState`], which carries the
/// envelope gate as well as pitch and velocity.
pub struct MonoSynth {
    pub processor: VoiceProcessor,
    pub input: NoteInput,
}

impl MonoSynth {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let sample_rate = config.sample_rate;
        let params = SynthParams::default();

        let voice = Arc::new(VoiceState::new());

        let envelope = |attack: ParamId, decay: ParamId, sustain: ParamId, release: ParamId| {
            Envelope::adsr(
                sample_rate,
                params.get(attack),
                params.get(decay),
                params.get(sustain),
                params.get(release),
            )
            .with_curve(config.envelope_curve)
        };
        let amplitude_env = envelope(
            ParamId::AmplitudeAttackTime,
            ParamId::AmplitudeDecayTime,
            ParamId::AmplitudeSustainLevel,
            ParamId::AmplitudeReleaseTime,
        );
        let filter_env = envelope(
            ParamId::FilterAttackTime,
            ParamId::FilterDecayTime,
            ParamId::FilterSustainLevel,
            ParamId::FilterReleaseTime,
        );

        let oscillator =
            Wavetable::with_waveform(sample_rate, config.waveform, config.table_len, config.harmonics);

        let mut filter = SVFilter::new(sample_rate, config.filter_type);
        filter.set_frequency(params.filter_base);
        filter.set_q(params.filter_q);

        info!(
            sample_rate,
            channels = config.channels,
            waveform = ?config.waveform,
            "voice engine ready"
        );

        Ok(Self {
            processor: VoiceProcessor::new(
                sample_rate,
                config.channels,
                config.output_scale,
                Arc::clone(&voice),
                amplitude_env,
                filter_env,
                oscillator,
                filter,
            ),
            input: NoteInput::new(voice, config.midi_channel),
        })
    }

    pub fn split(self) -> (VoiceProcessor, NoteInput) {
        (self.processor, self.input)
    }
}
