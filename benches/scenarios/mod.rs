//! Whole-voice benchmarks: what the audio callback actually pays per block.

mod voice;

pub use voice::bench_voice;
