//! Full voice: gate sync, parameter snapshot, oscillator, two envelopes,
//! filter, interleaved output.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use rtrb::RingBuffer;
use saavy_mono::{EngineConfig, MonoSynth, ScopeFrame, SharedParams, SynthParams};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn new_synth() -> MonoSynth {
    MonoSynth::new(EngineConfig {
        sample_rate: SAMPLE_RATE,
        channels: 2,
        ..EngineConfig::default()
    })
    .expect("default config is valid")
}

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voice");

    for &size in BLOCK_SIZES {
        let mut output = vec![0.0f32; size * 2];

        // Held note, plain parameter snapshot, no telemetry
        let mut synth = new_synth();
        synth.input.note_on(45, 100);
        let params = SynthParams::default();
        group.bench_with_input(BenchmarkId::new("held_note", size), &size, |b, _| {
            b.iter(|| {
                synth
                    .processor
                    .process_block(&params, black_box(&mut output), &mut ());
            })
        });

        // As wired in the app: atomic params and a scope ring the UI drains
        let mut synth = new_synth();
        synth.input.note_on(45, 100);
        let shared = Arc::new(SharedParams::default());
        let (mut scope_tx, mut scope_rx) = RingBuffer::<ScopeFrame>::new(size);
        group.bench_with_input(BenchmarkId::new("shared_params_scope", size), &size, |b, _| {
            b.iter(|| {
                synth
                    .processor
                    .process_block(shared.as_ref(), black_box(&mut output), &mut scope_tx);
                while scope_rx.pop().is_ok() {}
            })
        });

        // Legato playing: a note change on the MIDI side every block
        let mut synth = new_synth();
        synth.input.note_on(48, 100);
        let mut toggle = false;
        group.bench_with_input(BenchmarkId::new("legato", size), &size, |b, _| {
            b.iter(|| {
                toggle = !toggle;
                if toggle {
                    synth.input.note_on(55, 90);
                } else {
                    synth.input.note_off(55);
                }
                synth
                    .processor
                    .process_block(&params, black_box(&mut output), &mut ());
            })
        });
    }

    group.finish();
}
