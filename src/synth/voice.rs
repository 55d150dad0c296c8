use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Lowest velocity maps to this gain, in decibels.
pub const VELOCITY_FLOOR_DB: f32 = -40.0;

/// Marker stored in [`VoiceState`] when no note is held.
const NO_NOTE: u8 = u8::MAX;

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Linear remap of `value` from one range into another, unclamped.
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

/// Map a note-on velocity (1-127) onto a -40..0 dB curve, as linear gain.
#[inline]
pub fn velocity_to_amplitude(velocity: u8) -> f32 {
    let velocity = velocity.clamp(1, 127) as f32;
    let decibels = map_range(velocity, 1.0, 127.0, VELOCITY_FLOOR_DB, 0.0);
    10.0_f32.powf(decibels / 20.0)
}

/// State shared between the MIDI thread (writer) and the audio thread
/// (reader).
///
/// Every field is its own atomic. A block may see a new amplitude with the
/// old frequency or vice versa; that is a one-block artifact at most, and
/// it keeps the audio thread free of locks.
///
/// The envelope gate is carried as state, not as events: `active` is the
/// gate level and `trigger_generation` counts note-on edges. The audio side
/// compares both against its envelopes once per block, so however far it
/// falls behind it converges on the latest gate instead of losing edges.
#[derive(Debug)]
pub struct VoiceState {
    centre_frequency: AtomicU32,
    amplitude: AtomicU32,
    note: AtomicU8,
    active: AtomicBool,
    trigger_generation: AtomicU32,
}

impl VoiceState {
    pub fn new() -> Self {
        Self {
            centre_frequency: AtomicU32::new(440.0_f32.to_bits()),
            amplitude: AtomicU32::new(0.0_f32.to_bits()),
            note: AtomicU8::new(NO_NOTE),
            active: AtomicBool::new(false),
            trigger_generation: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn centre_frequency(&self) -> f32 {
        f32::from_bits(self.centre_frequency.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn amplitude(&self) -> f32 {
        f32::from_bits(self.amplitude.load(Ordering::Relaxed))
    }

    /// The note currently owning the voice, if any key is held.
    pub fn note(&self) -> Option<u8> {
        match self.note.load(Ordering::Relaxed) {
            NO_NOTE => None,
            note => Some(note),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Number of note-on edges so far. Wraps.
    #[inline]
    pub fn trigger_generation(&self) -> u32 {
        self.trigger_generation.load(Ordering::Acquire)
    }

    /// Raise the gate and record a new note-on edge. Pitch and level must
    /// already be stored; the Release ordering publishes them with the edge.
    pub(crate) fn trigger(&self) {
        self.active.store(true, Ordering::Relaxed);
        self.trigger_generation.fetch_add(1, Ordering::Release);
    }

    pub(crate) fn set_note(&self, note: u8) {
        self.centre_frequency
            .store(note_to_freq(note).to_bits(), Ordering::Relaxed);
        self.note.store(note, Ordering::Relaxed);
    }

    pub(crate) fn set_amplitude(&self, amplitude: f32) {
        self.amplitude.store(amplitude.to_bits(), Ordering::Relaxed);
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
        if !active {
            self.note.store(NO_NOTE, Ordering::Relaxed);
        }
    }
}

impl Default for VoiceState {
    fn default() -> Self {
        Self::new()
    }
}
