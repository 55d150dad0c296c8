/// Discriminant of a channel voice message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    NoteOff,
    NoteOn,
    ControlChange,
    ProgramChange,
    PitchBend,
}

/// A decoded MIDI channel message: a kind plus up to two 7-bit data bytes.
///
/// This is all the engine needs from a MIDI source. Anything that can
/// answer these three questions can drive [`NoteInput`].
///
/// [`NoteInput`]: crate::synth::ingress::NoteInput
pub trait ChannelMessage {
    fn kind(&self) -> MessageKind;

    /// MIDI channel, 0-15.
    fn channel(&self) -> u8;

    /// Data byte `index` (0 or 1). Missing bytes read as 0.
    fn data_byte(&self, index: usize) -> u8;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Decode a single channel voice message.
    ///
    /// System messages, running status and truncated messages yield `None`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status & 0x80 == 0 {
            return None;
        }

        let channel = status & 0x0F;
        let byte = |i: usize| data.get(i).map(|b| b & 0x7F);

        let event = match status & 0xF0 {
            0x80 => MidiEvent::NoteOff {
                channel,
                key: byte(0)?,
                velocity: byte(1)?,
            },
            0x90 => MidiEvent::NoteOn {
                channel,
                key: byte(0)?,
                velocity: byte(1)?,
            },
            0xB0 => MidiEvent::ControlChange {
                channel,
                controller: byte(0)?,
                value: byte(1)?,
            },
            0xC0 => MidiEvent::ProgramChange {
                channel,
                program: byte(0)?,
            },
            0xE0 => {
                let raw = (byte(1)? as i16) << 7 | byte(0)? as i16;
                MidiEvent::PitchBend {
                    channel,
                    value: raw - 8192,
                }
            }
            _ => return None,
        };

        Some(event)
    }
}

impl ChannelMessage for MidiEvent {
    fn kind(&self) -> MessageKind {
        match self {
            MidiEvent::NoteOn { .. } => MessageKind::NoteOn,
            MidiEvent::NoteOff { .. } => MessageKind::NoteOff,
            MidiEvent::ControlChange { .. } => MessageKind::ControlChange,
            MidiEvent::PitchBend { .. } => MessageKind::PitchBend,
            MidiEvent::ProgramChange { .. } => MessageKind::ProgramChange,
        }
    }

    fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }

    fn data_byte(&self, index: usize) -> u8 {
        let bytes = match *self {
            MidiEvent::NoteOn { key, velocity, .. } | MidiEvent::NoteOff { key, velocity, .. } => {
                [key, velocity]
            }
            MidiEvent::ControlChange {
                controller, value, ..
            } => [controller, value],
            MidiEvent::ProgramChange { program, .. } => [program, 0],
            MidiEvent::PitchBend { value, .. } => {
                let raw = (value + 8192).clamp(0, 0x3FFF) as u16;
                [(raw & 0x7F) as u8, (raw >> 7) as u8]
            }
        };
        bytes.get(index).copied().unwrap_or(0)
    }
}
