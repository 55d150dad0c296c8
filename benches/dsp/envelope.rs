//! Benchmarks for the ADSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_mono::dsp::envelope::{Envelope, EnvelopeCurve};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (curve_name, curve) in [
            ("exp", EnvelopeCurve::Exponential),
            ("linear", EnvelopeCurve::Linear),
        ] {
            // Attack phase (ramping up)
            let mut env = Envelope::adsr(SAMPLE_RATE, 10.0, 0.1, 0.7, 0.3).with_curve(curve);
            env.trigger();
            group.bench_with_input(
                BenchmarkId::new(format!("attack_{curve_name}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        env.render(black_box(&mut buffer));
                    })
                },
            );

            // Release phase (ramping down)
            let mut env = Envelope::adsr(SAMPLE_RATE, 0.001, 0.001, 0.7, 10.0).with_curve(curve);
            env.trigger();
            for _ in 0..200 {
                env.process();
            }
            env.release();
            group.bench_with_input(
                BenchmarkId::new(format!("release_{curve_name}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        env.render(black_box(&mut buffer));
                    })
                },
            );
        }

        // Sustain phase (holding steady)
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.001, 0.001, 0.7, 0.3);
        env.trigger();
        // Advance past attack/decay
        for _ in 0..200 {
            env.process();
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
