use saavy_mono::{
    dsp::envelope::EnvelopeState,
    io::MidiEvent,
    synth::voice::note_to_freq,
    EngineConfig, MonoSynth, ParamId, ScopeFrame, SynthParams,
};

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK: usize = 256;

fn mono_synth() -> MonoSynth {
    MonoSynth::new(EngineConfig {
        sample_rate: SAMPLE_RATE,
        channels: 1,
        ..EngineConfig::default()
    })
    .expect("valid config")
}

fn seconds_to_blocks(seconds: f32) -> usize {
    (seconds * SAMPLE_RATE / BLOCK as f32).ceil() as usize
}

/// Render `blocks` blocks and return the last one.
fn render(synth: &mut MonoSynth, params: &SynthParams, blocks: usize) -> Vec<f32> {
    let mut block = vec![0.0f32; BLOCK];
    for _ in 0..blocks {
        synth.processor.process_block(params, &mut block, &mut ());
    }
    block
}

fn peak(block: &[f32]) -> f32 {
    block.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

#[test]
fn note_reaches_sustain_then_fades_out() {
    let mut synth = mono_synth();
    let params = SynthParams::default();
    let attack = params.get(ParamId::AmplitudeAttackTime);
    let decay = params.get(ParamId::AmplitudeDecayTime);
    let sustain = params.get(ParamId::AmplitudeSustainLevel);
    let release = params.get(ParamId::AmplitudeReleaseTime);

    synth.input.handle(&MidiEvent::NoteOn {
        channel: 0,
        key: 69,
        velocity: 127,
    });
    assert_eq!(synth.processor.voice_state().centre_frequency(), 440.0);

    let held = render(&mut synth, &params, seconds_to_blocks(attack + decay) + 4);
    assert_eq!(synth.processor.amplitude_envelope().state(), EnvelopeState::Sustain);
    assert!((synth.processor.amplitude_envelope().level() - sustain).abs() < 1e-3);
    assert!(peak(&held) > 0.01, "held note is audible");
    assert!(held.iter().all(|s| s.is_finite() && s.abs() <= 1.0));

    synth.input.handle(&MidiEvent::NoteOff {
        channel: 0,
        key: 69,
        velocity: 0,
    });
    // Keep rendering until the slower filter envelope has finished too
    let filter_release = params.get(ParamId::FilterReleaseTime);
    let mut tail = Vec::new();
    let mut block = vec![0.0f32; BLOCK];
    for _ in 0..seconds_to_blocks(filter_release) + 1 {
        synth.processor.process_block(&params, &mut block, &mut ());
        tail.extend_from_slice(&block);
    }

    let release_samples = (release * SAMPLE_RATE).round() as usize;
    let after_release = &tail[release_samples..];
    assert!(
        peak(after_release) < 1e-3,
        "output {} after the release time",
        peak(after_release)
    );
    assert_eq!(synth.processor.amplitude_envelope().state(), EnvelopeState::Idle);
    assert_eq!(synth.processor.filter_envelope().state(), EnvelopeState::Idle);
}

#[test]
fn falling_back_to_a_held_note_does_not_retrigger() {
    let mut synth = mono_synth();
    let params = SynthParams::default();

    synth.input.note_on(60, 100);
    render(&mut synth, &params, seconds_to_blocks(0.2));
    assert_eq!(synth.processor.amplitude_envelope().state(), EnvelopeState::Sustain);

    synth.input.note_on(64, 100);
    render(&mut synth, &params, 1);
    assert_eq!(synth.processor.voice_state().note(), Some(64));
    assert_eq!(synth.processor.voice_state().centre_frequency(), note_to_freq(64));
    assert_eq!(synth.processor.amplitude_envelope().state(), EnvelopeState::Sustain);

    synth.input.note_off(64);
    let block = render(&mut synth, &params, 1);
    assert_eq!(synth.processor.voice_state().note(), Some(60));
    assert_eq!(synth.processor.voice_state().centre_frequency(), note_to_freq(60));
    assert_eq!(synth.processor.amplitude_envelope().state(), EnvelopeState::Sustain);
    assert_eq!(synth.processor.filter_envelope().state(), EnvelopeState::Sustain);
    assert!(peak(&block) > 0.0);

    synth.input.note_off(60);
    render(&mut synth, &params, 1);
    assert_eq!(synth.processor.amplitude_envelope().state(), EnvelopeState::Release);
    assert!(!synth.processor.voice_state().is_active());
}

#[test]
fn release_lasts_exactly_the_release_time() {
    let mut synth = mono_synth();
    let params = SynthParams::default().with(ParamId::AmplitudeReleaseTime, 0.05);
    let expected = (0.05 * SAMPLE_RATE).round() as usize;

    synth.input.note_on(57, 90);
    render(&mut synth, &params, seconds_to_blocks(0.2));
    synth.input.note_off(57);

    // One-frame blocks so the envelope can be watched sample by sample
    let mut frame = [0.0f32; 1];
    let mut samples = 0;
    while synth.processor.amplitude_envelope().is_active() {
        synth.processor.process_block(&params, &mut frame, &mut ());
        samples += 1;
        assert!(samples <= expected, "release ran past {expected} samples");
    }
    assert_eq!(samples, expected);
}

#[test]
fn other_channels_are_ignored_when_filtered() {
    let mut synth = MonoSynth::new(EngineConfig {
        sample_rate: SAMPLE_RATE,
        channels: 1,
        midi_channel: Some(2),
        ..EngineConfig::default()
    })
    .expect("valid config");
    let params = SynthParams::default();

    synth.input.handle(&MidiEvent::NoteOn {
        channel: 0,
        key: 60,
        velocity: 100,
    });
    assert!(peak(&render(&mut synth, &params, 4)) == 0.0);

    synth.input.handle(&MidiEvent::NoteOn {
        channel: 2,
        key: 60,
        velocity: 100,
    });
    assert!(peak(&render(&mut synth, &params, 4)) > 0.0);
}

#[test]
fn all_notes_off_releases_the_voice() {
    let mut synth = mono_synth();
    let params = SynthParams::default();

    for key in [48, 52, 55] {
        synth.input.handle(&MidiEvent::NoteOn {
            channel: 0,
            key,
            velocity: 100,
        });
    }
    render(&mut synth, &params, 8);

    synth.input.handle(&MidiEvent::ControlChange {
        channel: 0,
        controller: 123,
        value: 0,
    });
    render(&mut synth, &params, 1);
    assert!(synth.input.held_notes().is_empty());
    assert_eq!(synth.processor.amplitude_envelope().state(), EnvelopeState::Release);
}

#[test]
fn velocity_scales_the_amplitude_trace() {
    let loudest = |velocity: u8| {
        let mut synth = mono_synth();
        synth.input.note_on(60, velocity);
        let mut frames: Vec<ScopeFrame> = Vec::new();
        let mut block = vec![0.0f32; BLOCK];
        for _ in 0..seconds_to_blocks(0.02) {
            synth
                .processor
                .process_block(&SynthParams::default(), &mut block, &mut frames);
        }
        frames.iter().fold(0.0f32, |acc, f| acc.max(f.amplitude))
    };

    let soft = loudest(1);
    let hard = loudest(127);
    assert!((hard - 1.0).abs() < 1e-4);
    assert!(soft < 0.02 && soft > 0.0);
}

/// Note edges pile up on the MIDI side while the audio side renders
/// nothing; the envelopes must end up matching whatever is held now.
#[test]
fn backlog_of_note_edges_settles_on_held_note() {
    let mut synth = mono_synth();
    let params = SynthParams::default();

    for _ in 0..31 {
        synth.input.note_on(60, 100);
        synth.input.note_off(60);
    }
    synth.input.note_on(62, 100);
    synth.input.note_on(64, 100);
    synth.input.note_off(64);
    synth.input.note_off(62);
    synth.input.note_on(65, 100);
    synth.input.note_off(65);
    synth.input.note_on(67, 100);

    render(&mut synth, &params, 40);

    assert_eq!(synth.input.held_notes(), &[67]);
    assert_eq!(synth.processor.voice_state().note(), Some(67));
    assert_eq!(synth.processor.amplitude_envelope().state(), EnvelopeState::Sustain);
    assert_eq!(synth.processor.filter_envelope().state(), EnvelopeState::Sustain);
}

#[test]
fn backlog_ending_in_note_off_does_not_hang() {
    let mut synth = mono_synth();
    let params = SynthParams::default();

    synth.input.note_on(60, 100);
    render(&mut synth, &params, seconds_to_blocks(0.2));
    assert_eq!(synth.processor.amplitude_envelope().state(), EnvelopeState::Sustain);

    synth.input.note_off(60);
    for note in 0..100u8 {
        synth.input.note_on(note, 100);
        synth.input.note_off(note);
    }

    render(&mut synth, &params, 1);
    assert_eq!(synth.processor.amplitude_envelope().state(), EnvelopeState::Release);
    assert_eq!(synth.processor.filter_envelope().state(), EnvelopeState::Release);

    let filter_release = params.get(ParamId::FilterReleaseTime);
    let tail = render(&mut synth, &params, seconds_to_blocks(filter_release) + 1);
    assert!(!synth.processor.is_sounding());
    assert!(peak(&tail) < 1e-3);
}
