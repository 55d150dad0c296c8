use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Wavetable Oscillator
====================

Instead of evaluating a waveform formula every sample, a wavetable oscillator
computes ONE cycle of the waveform up front and then reads it back at
whatever speed gives the requested pitch.

Vocabulary
----------

  table       One period of the waveform, `len` samples long. Filled once at
              setup, never touched on the audio thread.

  phase       Fractional read position into the table, 0.0 <= phase < len.

  increment   How far the phase moves per output sample:

                  increment = frequency * len / sample_rate

              A 512-sample table at 48 kHz playing 440 Hz moves ~4.69
              table slots per sample.


Building the Table (Additive Synthesis)
---------------------------------------

A sawtooth is the sum of every harmonic with amplitude 1/h:

    saw(n) = Σ  sin(2π · h · n / len) / h        h = 1, 2, 3, ...

Summing a finite number of harmonics (48 by default) gives a band-limited
saw. The sum is scaled by 0.5 to leave headroom, since the Gibbs overshoot
pushes the raw sum past ±0.9.

Square keeps only the odd harmonics with the same 1/h rolloff.


Reading the Table
-----------------

The read position almost never lands on a whole index, so we linearly
interpolate between the two neighbouring slots:

    i0 = floor(phase), i1 = (i0 + 1) mod len, frac = phase - i0
    out = table[i0] + frac * (table[i1] - table[i0])

then advance the phase and wrap it back into [0, len).
*/

pub const DEFAULT_TABLE_LEN: usize = 512;
pub const DEFAULT_HARMONICS: u32 = 48;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscillatorWaveform {
    Sine,
    #[default]
    Saw,
    Square,
}

impl OscillatorWaveform {
    /// Build one period of this waveform from `harmonics` partials.
    pub fn build_table(self, len: usize, harmonics: u32) -> Vec<f32> {
        match self {
            OscillatorWaveform::Sine => additive_table(len, 1, |_| 1.0),
            OscillatorWaveform::Saw => additive_table(len, harmonics, |h| 0.5 / h as f32),
            OscillatorWaveform::Square => additive_table(len, harmonics, |h| {
                if h % 2 == 1 {
                    0.5 / h as f32
                } else {
                    0.0
                }
            }),
        }
    }
}

/// Sum `harmonics` sine partials into a single-cycle table.
pub fn additive_table(len: usize, harmonics: u32, amplitude: impl Fn(u32) -> f32) -> Vec<f32> {
    let len = len.max(2);
    (0..len)
        .map(|n| {
            (1..=harmonics)
                .map(|h| amplitude(h) * (TAU * h as f32 * n as f32 / len as f32).sin())
                .sum()
        })
        .collect()
}

pub struct Wavetable {
    table: Box<[f32]>,
    sample_rate: f32,
    phase: f32,
    increment: f32,
}

impl Wavetable {
    /// Wrap an existing single-cycle table. Allocates once, here.
    pub fn new(sample_rate: f32, table: Vec<f32>) -> Self {
        let table = if table.is_empty() {
            vec![0.0; 2]
        } else {
            table
        };

        Self {
            table: table.into_boxed_slice(),
            sample_rate: sample_rate.max(1.0),
            phase: 0.0,
            increment: 0.0,
        }
    }

    /// The default voice table: a 48-harmonic additive sawtooth.
    pub fn sawtooth(sample_rate: f32) -> Self {
        Self::with_waveform(sample_rate, OscillatorWaveform::Saw, DEFAULT_TABLE_LEN, DEFAULT_HARMONICS)
    }

    pub fn with_waveform(
        sample_rate: f32,
        waveform: OscillatorWaveform,
        len: usize,
        harmonics: u32,
    ) -> Self {
        Self::new(sample_rate, waveform.build_table(len, harmonics))
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        let increment = frequency * self.table.len() as f32 / self.sample_rate;
        self.increment = if increment.is_finite() { increment } else { 0.0 };
    }

    pub fn frequency(&self) -> f32 {
        self.increment * self.sample_rate / self.table.len() as f32
    }

    /// Read one interpolated sample and advance the phase.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let len = self.table.len();
        let index0 = self.phase as usize % len;
        let index1 = (index0 + 1) % len;
        let frac = self.phase - self.phase.floor();

        let a = self.table[index0];
        let b = self.table[index1];
        let out = a + frac * (b - a);

        self.phase += self.increment;
        let len = len as f32;
        if self.phase >= len {
            self.phase -= len;
            // Increments above one full table per sample need a real modulo
            if self.phase >= len {
                self.phase %= len;
            }
        } else if self.phase < 0.0 {
            self.phase = self.phase.rem_euclid(len);
        }

        out
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process();
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn table(&self) -> &[f32] {
        &self.table
    }
}
