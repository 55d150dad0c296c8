/// Note-level commands decoded from MIDI, consumed by [`NoteInput`].
///
/// [`NoteInput`]: crate::synth::ingress::NoteInput
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    /// Decoded but not applied yet; the voice has no bend stage.
    PitchBend { cents: f32 },
    AllNotesOff,
}
