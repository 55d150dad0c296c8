//! Low-level DSP primitives used by the voice.
//!
//! These components are allocation-free and realtime-safe once constructed,
//! so the audio thread can own them outright. They stay focused on the
//! signal-processing math; note handling and parameter plumbing live in
//! `synth`.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Resonant state-variable filter with multiple responses.
pub mod filter;
/// Additive wavetable oscillator.
pub mod oscillator;

pub use envelope::{Envelope, EnvelopeCurve, EnvelopeState};
pub use filter::{FilterType, SVFilter};
pub use oscillator::{OscillatorWaveform, Wavetable};
