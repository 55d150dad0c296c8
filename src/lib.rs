pub mod dsp; // Allocation-free signal primitives
pub mod error;
pub mod io; // MIDI and device-facing types
pub mod synth; // Note priority, engine halves, control surface

pub use error::{Error, Result};
pub use synth::engine::{EngineConfig, MonoSynth};
pub use synth::ingress::NoteInput;
pub use synth::params::{ControlSurface, ParamId, SharedParams, SynthParams};
pub use synth::processor::VoiceProcessor;
pub use synth::telemetry::{ScopeFrame, TelemetrySink};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
