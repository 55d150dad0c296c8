//! MIDI input via `midir`.
//!
//! Opening the port is the only fallible step; a missing device fails the
//! whole session instead of retrying. Once connected, `midir` calls back on
//! its own thread and every message goes straight into [`NoteInput`].

use midir::{Ignore, MidiInput, MidiInputConnection};
use tracing::info;

use crate::{
    error::{Error, Result},
    io::midi::MidiEvent,
    synth::ingress::NoteInput,
};

const CLIENT_NAME: &str = "saavy-mono";

/// A live MIDI connection feeding a [`NoteInput`]. Dropping it disconnects.
pub struct MidiConnection {
    connection: MidiInputConnection<NoteInput>,
    port_name: String,
}

impl MidiConnection {
    /// Names of the MIDI input ports currently visible.
    pub fn port_names() -> Result<Vec<String>> {
        let midi_in = MidiInput::new(CLIENT_NAME).map_err(|e| Error::MidiInit(e.to_string()))?;
        Ok(midi_in
            .ports()
            .iter()
            .filter_map(|port| midi_in.port_name(port).ok())
            .collect())
    }

    /// Connect the first port whose name contains `filter` (or the first
    /// port at all when `filter` is `None`) and route it into `input`.
    pub fn open(filter: Option<&str>, input: NoteInput) -> Result<Self> {
        let mut midi_in = MidiInput::new(CLIENT_NAME).map_err(|e| Error::MidiInit(e.to_string()))?;
        midi_in.ignore(Ignore::All);

        let ports = midi_in.ports();
        let (port, port_name) = ports
            .iter()
            .filter_map(|port| midi_in.port_name(port).ok().map(|name| (port, name)))
            .find(|(_, name)| filter.map_or(true, |f| name.contains(f)))
            .ok_or_else(|| Error::MidiPortNotFound(filter.unwrap_or("<any>").to_string()))?;

        let connection = midi_in
            .connect(
                port,
                "saavy-mono-in",
                |_timestamp, bytes, input: &mut NoteInput| {
                    if let Some(event) = MidiEvent::from_bytes(bytes) {
                        input.handle(&event);
                    }
                },
                input,
            )
            .map_err(|e| Error::MidiConnect {
                port: port_name.clone(),
                reason: e.to_string(),
            })?;

        info!(port = %port_name, "MIDI input connected");

        Ok(Self {
            connection,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Disconnect and hand back the note input.
    pub fn close(self) -> NoteInput {
        let (_midi_in, input) = self.connection.close();
        input
    }
}
