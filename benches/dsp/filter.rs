//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_mono::dsp::filter::{FilterType, SVFilter};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for (name, filter_type) in [
            ("lowpass", FilterType::LowPass),
            ("highpass", FilterType::HighPass),
            ("bandpass", FilterType::BandPass),
            ("notch", FilterType::Notch),
        ] {
            let mut filter = SVFilter::new(SAMPLE_RATE, filter_type);
            filter.set_frequency(1000.0);
            filter.set_q(4.0);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer));
                })
            });
        }

        // Cutoff moved every sample, as the filter envelope drives it
        let mut filter = SVFilter::lowpass(SAMPLE_RATE, 200.0);
        filter.set_q(4.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass_swept", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    filter.set_frequency(200.0 + 10.0 * i as f32);
                    *sample = filter.process(input[i]);
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
