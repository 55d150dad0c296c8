//! Benchmarks for wavetable playback.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_mono::dsp::oscillator::{OscillatorWaveform, Wavetable, DEFAULT_HARMONICS};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/wavetable");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Default 512-sample sawtooth table
        let mut osc = Wavetable::sawtooth(SAMPLE_RATE);
        osc.set_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("saw_512", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });

        // Larger table - same per-sample work, more cache pressure
        let mut osc = Wavetable::with_waveform(
            SAMPLE_RATE,
            OscillatorWaveform::Square,
            4096,
            DEFAULT_HARMONICS,
        );
        osc.set_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("square_4096", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });

        // Per-sample frequency updates, as the voice does
        let mut osc = Wavetable::sawtooth(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("saw_retuned", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    osc.set_frequency(black_box(261.63));
                    *sample = osc.process();
                }
            })
        });
    }

    // Table construction happens once per session but is not free
    group.bench_function("build_saw_table", |b| {
        b.iter(|| OscillatorWaveform::Saw.build_table(black_box(512), black_box(DEFAULT_HARMONICS)))
    });

    group.finish();
}
