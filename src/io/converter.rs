use crate::{
    io::midi::{ChannelMessage, MessageKind},
    synth::message::SynthMessage,
};

/// Controller number of the "All Notes Off" channel mode message.
pub const ALL_NOTES_OFF_CC: u8 = 123;

/// Bend range used when reporting pitch bend, in cents each way.
pub const PITCH_BEND_RANGE_CENTS: f32 = 200.0;

/// Translate a channel message into a note-level command.
///
/// A note-on with velocity 0 is a note-off by MIDI convention and comes out
/// as [`SynthMessage::NoteOff`]. Messages on other channels (when
/// `channel_filter` is set) and message kinds the voice does not use map to
/// `None`.
pub fn midi_to_synth<M>(message: &M, channel_filter: Option<u8>) -> Option<SynthMessage>
where
    M: ChannelMessage + ?Sized,
{
    if channel_filter.is_some_and(|channel| channel != message.channel()) {
        return None;
    }

    let note = message.data_byte(0);
    match message.kind() {
        MessageKind::NoteOn => match message.data_byte(1) {
            0 => Some(SynthMessage::NoteOff { note }),
            velocity => Some(SynthMessage::NoteOn { note, velocity }),
        },
        MessageKind::NoteOff => Some(SynthMessage::NoteOff { note }),
        MessageKind::ControlChange if message.data_byte(0) == ALL_NOTES_OFF_CC => {
            Some(SynthMessage::AllNotesOff)
        }
        MessageKind::PitchBend => {
            let raw = (message.data_byte(1) as i32) << 7 | message.data_byte(0) as i32;
            let cents = (raw - 8192) as f32 / 8192.0 * PITCH_BEND_RANGE_CENTS;
            Some(SynthMessage::PitchBend { cents })
        }
        _ => None,
    }
}
