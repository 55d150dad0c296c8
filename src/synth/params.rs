//! The control surface: eleven block-rate parameters.
//!
//! The audio thread reads these once per block. [`SynthParams`] is a plain
//! snapshot; [`SharedParams`] is the lock-free version a UI thread writes to
//! while the audio thread reads it.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::envelope::Envelope;

/// Every parameter, in control-surface order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    AmplitudeAttackTime,
    AmplitudeDecayTime,
    AmplitudeSustainLevel,
    AmplitudeReleaseTime,
    FilterBaseFrequency,
    FilterSensitivity,
    FilterQ,
    FilterAttackTime,
    FilterDecayTime,
    FilterSustainLevel,
    FilterReleaseTime,
}

/// Bounds and default of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub default: f32,
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    const fn new(default: f32, min: f32, max: f32) -> Self {
        Self { default, min, max }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }

    /// Increment used by step-wise editors: 1% of the span.
    pub fn step(&self) -> f32 {
        (self.max - self.min) / 100.0
    }

    /// Position of `value` within the range, 0.0 to 1.0.
    pub fn normalize(&self, value: f32) -> f32 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

impl ParamId {
    pub const COUNT: usize = 11;

    pub const ALL: [ParamId; ParamId::COUNT] = [
        ParamId::AmplitudeAttackTime,
        ParamId::AmplitudeDecayTime,
        ParamId::AmplitudeSustainLevel,
        ParamId::AmplitudeReleaseTime,
        ParamId::FilterBaseFrequency,
        ParamId::FilterSensitivity,
        ParamId::FilterQ,
        ParamId::FilterAttackTime,
        ParamId::FilterDecayTime,
        ParamId::FilterSustainLevel,
        ParamId::FilterReleaseTime,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamId::AmplitudeAttackTime => "Amplitude Attack time",
            ParamId::AmplitudeDecayTime => "Amplitude Decay time",
            ParamId::AmplitudeSustainLevel => "Amplitude Sustain level",
            ParamId::AmplitudeReleaseTime => "Amplitude Release time",
            ParamId::FilterBaseFrequency => "Filter base frequency",
            ParamId::FilterSensitivity => "Filter sensitivity",
            ParamId::FilterQ => "Filter Q",
            ParamId::FilterAttackTime => "Filter Attack time",
            ParamId::FilterDecayTime => "Filter Decay time",
            ParamId::FilterSustainLevel => "Filter Sustain level",
            ParamId::FilterReleaseTime => "Filter Release time",
        }
    }

    /// Display unit, empty for plain ratios.
    pub fn unit(self) -> &'static str {
        match self {
            ParamId::AmplitudeSustainLevel | ParamId::FilterSustainLevel | ParamId::FilterQ => "",
            ParamId::FilterBaseFrequency | ParamId::FilterSensitivity => "Hz",
            _ => "s",
        }
    }

    pub fn range(self) -> ParamRange {
        match self {
            ParamId::AmplitudeAttackTime => ParamRange::new(0.01, 0.001, 0.1),
            ParamId::AmplitudeDecayTime => ParamRange::new(0.05, 0.01, 0.3),
            ParamId::AmplitudeSustainLevel => ParamRange::new(0.3, 0.0, 1.0),
            ParamId::AmplitudeReleaseTime => ParamRange::new(0.2, 0.001, 2.0),
            ParamId::FilterBaseFrequency => ParamRange::new(200.0, 50.0, 1000.0),
            ParamId::FilterSensitivity => ParamRange::new(3000.0, 0.0, 10_000.0),
            ParamId::FilterQ => ParamRange::new(4.0, 0.5, 10.0),
            ParamId::FilterAttackTime => ParamRange::new(0.05, 0.001, 0.1),
            ParamId::FilterDecayTime => ParamRange::new(0.1, 0.01, 0.3),
            ParamId::FilterSustainLevel => ParamRange::new(0.6, 0.0, 1.0),
            ParamId::FilterReleaseTime => ParamRange::new(0.3, 0.001, 2.0),
        }
    }
}

/// Shape of one ADSR envelope.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeParams {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl EnvelopeParams {
    pub fn apply_to(&self, env: &mut Envelope) {
        env.set_attack_time(self.attack);
        env.set_decay_time(self.decay);
        env.set_sustain_level(self.sustain);
        env.set_release_time(self.release);
    }
}

/// A snapshot of the whole control surface.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    pub amplitude: EnvelopeParams,
    pub filter: EnvelopeParams,
    pub filter_base: f32,
    pub filter_sensitivity: f32,
    pub filter_q: f32,
}

impl SynthParams {
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::AmplitudeAttackTime => self.amplitude.attack,
            ParamId::AmplitudeDecayTime => self.amplitude.decay,
            ParamId::AmplitudeSustainLevel => self.amplitude.sustain,
            ParamId::AmplitudeReleaseTime => self.amplitude.release,
            ParamId::FilterBaseFrequency => self.filter_base,
            ParamId::FilterSensitivity => self.filter_sensitivity,
            ParamId::FilterQ => self.filter_q,
            ParamId::FilterAttackTime => self.filter.attack,
            ParamId::FilterDecayTime => self.filter.decay,
            ParamId::FilterSustainLevel => self.filter.sustain,
            ParamId::FilterReleaseTime => self.filter.release,
        }
    }

    /// Set a parameter, clamped to its range.
    pub fn set(&mut self, id: ParamId, value: f32) {
        let value = id.range().clamp(value);
        let slot = match id {
            ParamId::AmplitudeAttackTime => &mut self.amplitude.attack,
            ParamId::AmplitudeDecayTime => &mut self.amplitude.decay,
            ParamId::AmplitudeSustainLevel => &mut self.amplitude.sustain,
            ParamId::AmplitudeReleaseTime => &mut self.amplitude.release,
            ParamId::FilterBaseFrequency => &mut self.filter_base,
            ParamId::FilterSensitivity => &mut self.filter_sensitivity,
            ParamId::FilterQ => &mut self.filter_q,
            ParamId::FilterAttackTime => &mut self.filter.attack,
            ParamId::FilterDecayTime => &mut self.filter.decay,
            ParamId::FilterSustainLevel => &mut self.filter.sustain,
            ParamId::FilterReleaseTime => &mut self.filter.release,
        };
        *slot = value;
    }

    pub fn with(mut self, id: ParamId, value: f32) -> Self {
        self.set(id, value);
        self
    }
}

impl Default for SynthParams {
    fn default() -> Self {
        let mut params = Self {
            amplitude: EnvelopeParams {
                attack: 0.0,
                decay: 0.0,
                sustain: 0.0,
                release: 0.0,
            },
            filter: EnvelopeParams {
                attack: 0.0,
                decay: 0.0,
                sustain: 0.0,
                release: 0.0,
            },
            filter_base: 0.0,
            filter_sensitivity: 0.0,
            filter_q: 0.0,
        };
        for id in ParamId::ALL {
            params.set(id, id.range().default);
        }
        params
    }
}

/// Ordered numeric read access to the parameters, polled once per block.
pub trait ControlSurface {
    fn value(&self, id: ParamId) -> f32;

    fn snapshot(&self) -> SynthParams {
        let mut params = SynthParams::default();
        for id in ParamId::ALL {
            params.set(id, self.value(id));
        }
        params
    }
}

impl ControlSurface for SynthParams {
    fn value(&self, id: ParamId) -> f32 {
        self.get(id)
    }

    fn snapshot(&self) -> SynthParams {
        *self
    }
}

impl<T: ControlSurface + ?Sized> ControlSurface for Arc<T> {
    fn value(&self, id: ParamId) -> f32 {
        (**self).value(id)
    }

    fn snapshot(&self) -> SynthParams {
        (**self).snapshot()
    }
}

/// Lock-free parameter store. Any thread may write; the audio thread reads.
#[derive(Debug)]
pub struct SharedParams {
    values: [AtomicU32; ParamId::COUNT],
}

impl SharedParams {
    pub fn new(initial: &SynthParams) -> Self {
        Self {
            values: ParamId::ALL.map(|id| AtomicU32::new(initial.get(id).to_bits())),
        }
    }

    /// Store a value, clamped to the parameter's range. Returns what was stored.
    pub fn set(&self, id: ParamId, value: f32) -> f32 {
        let value = id.range().clamp(value);
        self.values[id.index()].store(value.to_bits(), Ordering::Relaxed);
        value
    }

    /// Move a parameter by whole steps of its range.
    pub fn nudge(&self, id: ParamId, steps: i32) -> f32 {
        let range = id.range();
        self.set(id, self.value(id) + steps as f32 * range.step())
    }

    pub fn reset(&self) {
        for id in ParamId::ALL {
            self.set(id, id.range().default);
        }
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new(&SynthParams::default())
    }
}

impl ControlSurface for SharedParams {
    fn value(&self, id: ParamId) -> f32 {
        f32::from_bits(self.values[id.index()].load(Ordering::Relaxed))
    }
}
