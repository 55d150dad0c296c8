/*
Note Stack (Last-Note Priority)
===============================

A monophonic synth has one oscillator but the player has ten fingers. The
note stack remembers every key that is still held, in the order it was
pressed, so the voice can decide which one it should be sounding.

  ┌────┬────┬────┬────┐
  │ 60 │ 64 │ 67 │    │   ← push appends, top = most recent = 67
  └────┴────┴────┴────┘

Rules
-----

  push      Append the note. A full stack drops the note silently; a note
            that is already held is not pushed twice.

  remove    Delete EVERY occurrence of the note, keeping the others in
            order. If the removed note was on top, the next most recent
            held note becomes the top and the voice glides to it without
            retriggering. If it was buried, nothing audible changes.

The stack is a fixed array so it never allocates; it lives on the MIDI
thread, not the audio thread, but it is cheap enough for either.
*/

/// Maximum number of simultaneously held notes.
pub const MAX_ACTIVE_NOTES: usize = 16;

/// What a push did to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Push {
    /// First note on an empty stack; the envelopes should trigger.
    Started,
    /// Pushed on top of other held notes.
    Stacked,
    /// The note was already held.
    Duplicate,
    /// No room left; the note was dropped.
    Full,
}

/// What a removal did to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remove {
    /// The note was not held.
    NotHeld,
    /// A note below the top was removed.
    Buried,
    /// The top note was removed; this is the new top.
    NewTop(u8),
    /// The last held note was removed; the envelopes should release.
    Emptied,
}

#[derive(Debug, Clone)]
pub struct NoteStack<const N: usize = MAX_ACTIVE_NOTES> {
    notes: [u8; N],
    len: usize,
}

impl<const N: usize> NoteStack<N> {
    pub const fn new() -> Self {
        Self {
            notes: [0; N],
            len: 0,
        }
    }

    pub fn push(&mut self, note: u8) -> Push {
        if self.contains(note) {
            return Push::Duplicate;
        }
        if self.len >= N {
            return Push::Full;
        }

        self.notes[self.len] = note;
        self.len += 1;

        if self.len == 1 {
            Push::Started
        } else {
            Push::Stacked
        }
    }

    pub fn remove(&mut self, note: u8) -> Remove {
        let Some(top) = self.top() else {
            return Remove::NotHeld;
        };

        let mut kept = 0;
        for i in 0..self.len {
            let held = self.notes[i];
            if held != note {
                self.notes[kept] = held;
                kept += 1;
            }
        }

        if kept == self.len {
            return Remove::NotHeld;
        }
        self.len = kept;

        match self.top() {
            None => Remove::Emptied,
            Some(_) if top != note => Remove::Buried,
            Some(new_top) => Remove::NewTop(new_top),
        }
    }

    /// Most recently pressed note that is still held.
    pub fn top(&self) -> Option<u8> {
        self.as_slice().last().copied()
    }

    pub fn contains(&self, note: u8) -> bool {
        self.as_slice().contains(&note)
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len >= N
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Held notes in onset order, oldest first.
    pub fn as_slice(&self) -> &[u8] {
        &self.notes[..self.len]
    }
}

impl<const N: usize> Default for NoteStack<N> {
    fn default() -> Self {
        Self::new()
    }
}
