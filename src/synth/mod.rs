// Purpose: note priority, the two engine halves, and the control surface
// This layer sits above the dsp primitives and owns all cross-thread plumbing

pub mod engine;
pub mod ingress;
pub mod message;
pub mod note_stack;
pub mod params;
pub mod processor;
pub mod telemetry;
pub mod voice;
