use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Resonant State-Variable Filter
==============================

A second-order TPT (topology-preserving transform) state-variable filter.
One structure yields low-pass, band-pass, high-pass and notch at once; the
voice uses the low-pass output, swept by the filter envelope.

| type              | passes          | rejects      |
| ----------------- | --------------- | ------------ |
| low-pass          | below cutoff    | above cutoff |
| high-pass         | above cutoff    | below cutoff |
| band-pass         | around cutoff   | both sides   |
| notch / band-stop | outside         | at cutoff    |

Coefficients
------------

    g = tan(π · cutoff / sample_rate)     prewarped integrator gain
    k = 1 / Q                             damping (lower = more resonance)
    h = 1 / (1 + g · (g + k))

g blows up as cutoff approaches Nyquist (tan(π/2) = ∞), so the cutoff is
clamped to [MIN_CUTOFF_HZ, MAX_CUTOFF_RATIO · sample_rate] BEFORE g is
computed. Q is clamped to a small positive minimum so k stays finite.

Coefficients are only recomputed in `set_frequency` / `set_q`, never inside
`process`. The voice calls `set_frequency` every sample while the filter
envelope moves, which costs one tan() per sample.
*/

pub const MIN_CUTOFF_HZ: f32 = 20.0;
/// Highest cutoff as a fraction of the sample rate (just below Nyquist).
pub const MAX_CUTOFF_RATIO: f32 = 0.45;
pub const MIN_Q: f32 = 0.1;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    #[default]
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    sample_rate: f32,
    cutoff_hz: f32,
    q: f32,
    filter_type: FilterType,

    // Cached coefficients
    g: f32,
    k: f32,
    h: f32,
}

impl SVFilter {
    pub fn new(sample_rate: f32, filter_type: FilterType) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            sample_rate: sample_rate.max(1.0),
            cutoff_hz: 1000.0,
            q: std::f32::consts::FRAC_1_SQRT_2,
            filter_type,
            g: 0.0,
            k: 0.0,
            h: 0.0,
        };
        filter.update_coefficients();
        filter
    }

    pub fn lowpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self::new(sample_rate, FilterType::LowPass);
        filter.set_frequency(cutoff_hz);
        filter
    }

    pub fn highpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self::new(sample_rate, FilterType::HighPass);
        filter.set_frequency(cutoff_hz);
        filter
    }

    pub fn bandpass(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self::new(sample_rate, FilterType::BandPass);
        filter.set_frequency(cutoff_hz);
        filter
    }

    pub fn notch(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self::new(sample_rate, FilterType::Notch);
        filter.set_frequency(cutoff_hz);
        filter
    }

    /// Clamp a requested cutoff into the stable range for this sample rate.
    #[inline]
    pub fn clamp_cutoff(&self, cutoff_hz: f32) -> f32 {
        let max = (self.sample_rate * MAX_CUTOFF_RATIO).max(MIN_CUTOFF_HZ);
        if cutoff_hz.is_nan() {
            return MIN_CUTOFF_HZ;
        }
        cutoff_hz.clamp(MIN_CUTOFF_HZ, max)
    }

    #[inline]
    pub fn set_frequency(&mut self, cutoff_hz: f32) {
        let cutoff = self.clamp_cutoff(cutoff_hz);
        if cutoff != self.cutoff_hz {
            self.cutoff_hz = cutoff;
            self.update_coefficients();
        }
    }

    pub fn set_q(&mut self, q: f32) {
        let q = if q.is_finite() { q.max(MIN_Q) } else { MIN_Q };
        if q != self.q {
            self.q = q;
            self.update_coefficients();
        }
    }

    pub fn set_filter_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
    }

    #[inline]
    fn update_coefficients(&mut self) {
        self.g = (PI * self.cutoff_hz / self.sample_rate).tan();
        self.k = 1.0 / self.q;
        self.h = 1.0 / (1.0 + self.g * (self.g + self.k));
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> FilterOutputs {
        let v3 = sample - self.ic2eq;
        let v1 = self.h * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - self.k * v1 - v2,
            notch: sample - self.k * v1,
        }
    }

    /// Filter one sample. A non-finite result clears the state and yields
    /// silence so a bad input cannot poison every later sample.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let outputs = self.next_sample(sample);
        let out = match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::BandPass => outputs.bandpass,
            FilterType::Notch => outputs.notch,
        };

        if out.is_finite() && self.ic1eq.is_finite() && self.ic2eq.is_finite() {
            out
        } else {
            self.reset();
            0.0
        }
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }
}
