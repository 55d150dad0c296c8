// Purpose - external interfaces, format conversions

pub mod converter;
#[cfg(feature = "midi-io")]
pub mod input;
pub mod midi;

pub use midi::{ChannelMessage, MessageKind, MidiEvent};
