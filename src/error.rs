//! Setup-time errors.
//!
//! Only session construction can fail. Once the audio and MIDI halves are
//! running, every fault degrades to silence or a dropped event instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to initialise MIDI input: {0}")]
    MidiInit(String),

    #[error("no MIDI input port matching {0:?}")]
    MidiPortNotFound(String),

    #[error("failed to connect to MIDI port {port:?}: {reason}")]
    MidiConnect { port: String, reason: String },

    #[error("invalid engine config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
