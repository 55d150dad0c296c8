use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::{
    io::{converter::midi_to_synth, midi::ChannelMessage},
    synth::{
        message::SynthMessage,
        note_stack::{NoteStack, Push, Remove},
        voice::{velocity_to_amplitude, VoiceState},
    },
};

/// The MIDI-thread half of the engine.
///
/// Owns the note stack and is the only writer of [`VoiceState`], gate
/// included. Runs on whatever thread delivers MIDI; it never blocks and
/// never waits on the audio thread, so neither side can stall the other.
pub struct NoteInput {
    stack: NoteStack,
    voice: Arc<VoiceState>,
    channel: Option<u8>,
}

impl NoteInput {
    pub(crate) fn new(voice: Arc<VoiceState>, channel: Option<u8>) -> Self {
        Self {
            stack: NoteStack::new(),
            voice,
            channel,
        }
    }

    /// Dispatch a decoded channel message.
    pub fn handle<M: ChannelMessage + ?Sized>(&mut self, message: &M) {
        match midi_to_synth(message, self.channel) {
            Some(command) => self.apply(command),
            None => trace!(kind = ?message.kind(), "ignoring MIDI message"),
        }
    }

    pub fn apply(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
            SynthMessage::NoteOff { note } => self.note_off(note),
            SynthMessage::AllNotesOff => self.all_notes_off(),
            // Bend has no composition stage yet; the voice plays the centre pitch
            SynthMessage::PitchBend { cents } => trace!(cents, "pitch bend not applied"),
        }
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) {
        if velocity == 0 {
            self.note_off(note);
            return;
        }
        if note > 127 {
            warn!(note, "note number out of MIDI range");
            return;
        }

        match self.stack.push(note) {
            Push::Full => {
                warn!(note, held = self.stack.len(), "note stack full, dropping note");
            }
            Push::Duplicate => {
                debug!(note, "note already held");
            }
            outcome => {
                // Pitch and level first, gate last, so a trigger never
                // reaches the audio thread ahead of the note it belongs to
                self.voice.set_note(note);
                self.voice.set_amplitude(velocity_to_amplitude(velocity));
                debug!(note, velocity, held = self.stack.len(), "note on");

                if outcome == Push::Started {
                    self.voice.trigger();
                }
            }
        }
    }

    pub fn note_off(&mut self, note: u8) {
        match self.stack.remove(note) {
            Remove::NotHeld => trace!(note, "note off for a note not held"),
            Remove::Buried => debug!(note, "note off (buried)"),
            Remove::NewTop(top) => {
                // Glide-free jump back to the previous note, no retrigger
                self.voice.set_note(top);
                debug!(note, now = top, "note off, previous note resumes");
            }
            Remove::Emptied => {
                self.voice.set_active(false);
                debug!(note, "note off, voice released");
            }
        }
    }

    pub fn all_notes_off(&mut self) {
        if self.stack.is_empty() {
            return;
        }
        self.stack.clear();
        self.voice.set_active(false);
        debug!("all notes off");
    }

    /// Held notes in onset order, oldest first.
    pub fn held_notes(&self) -> &[u8] {
        self.stack.as_slice()
    }

    pub fn voice_state(&self) -> &Arc<VoiceState> {
        &self.voice
    }

    pub fn set_channel(&mut self, channel: Option<u8>) {
        self.channel = channel;
    }
}
