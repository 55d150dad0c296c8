#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MIN_TIME;

/*
ADSR Envelope Implementation
============================

This module implements the ADSR envelope generator used twice by the voice:
once for amplitude and once for filter cutoff.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0).

  stage       Which phase of the envelope we're in: Idle, Attack, Decay,
              Sustain, or Release. A state machine governs transitions.

  segment     One timed ramp from a start level to a target level. Attack,
              Decay and Release are each a single segment.

  trigger     Gate high. Enters Attack from the CURRENT level, not from zero,
              so a retrigger during Decay or Release does not click.

  release     Gate low. Enters Release from the current level, whatever the
              stage.


The Shape
---------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release

Segments are either LINEAR or EXPONENTIAL. The exponential curve is the
normalised RC charge shape

    shape(p) = (1 - e^(-k·p)) / (1 - e^(-k))      p = elapsed / total

which starts steep and flattens into the target, like an analog envelope,
yet still lands EXACTLY on the target after `total` samples. Instead of
calling exp() every sample we keep the running term e^(-k·p) and multiply it
by e^(-k/total) once per sample.


Timing
------

Each segment snapshots its duration in samples when it starts:

    total = round(time_seconds * sample_rate)

Setters only store the new time. A segment already in flight keeps the
duration it started with, so turning a knob mid-stage never rewrites time
that has already elapsed; it only shapes the next segment.

Attack is the one exception to "start at the beginning": when triggered from
a level L > 0, the attack resumes on the 0 → 1 attack curve at the point a
full attack would have reached L. The next sample is then at most one natural
attack step above L, for either curve.

Sustain follows the sustain level with a short one-pole glide so a moving
sustain control does not step.
*/

/// Curvature of the exponential segment shape. Higher is more "snappy".
const EXP_CURVATURE: f32 = 5.0;

/// Time constant of the glide applied when the sustain level moves.
const SUSTAIN_GLIDE_TIME: f32 = 0.005;

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Gate low, envelope inactive, level = 0
    Attack,  // Gate high, ramping up to 1.0
    Decay,   // Reached peak, ramping down to sustain level
    Sustain, // Holding at sustain level while gate is high
    Release, // Gate went low, ramping down to 0
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeCurve {
    Linear,
    #[default]
    Exponential,
}

impl EnvelopeCurve {
    /// Inverse of the segment shape: how far along a 0 → 1 segment the
    /// curve is when it reaches `level`.
    fn progress_at(self, level: f32) -> f32 {
        let level = level.clamp(0.0, 1.0);
        match self {
            EnvelopeCurve::Linear => level,
            EnvelopeCurve::Exponential => {
                -(1.0 - level * (1.0 - (-EXP_CURVATURE).exp())).ln() / EXP_CURVATURE
            }
        }
    }
}

/// A single timed ramp between two levels.
#[derive(Debug, Clone, Copy)]
struct Segment {
    start: f32,
    target: f32,
    total: u32,
    elapsed: u32,
    // Running e^(-k * elapsed / total) and its per-sample multiplier
    term: f32,
    ratio: f32,
}

impl Segment {
    fn idle() -> Self {
        Self {
            start: 0.0,
            target: 0.0,
            total: 1,
            elapsed: 0,
            term: 1.0,
            ratio: 1.0,
        }
    }

    fn begin(start: f32, target: f32, seconds: f32, sample_rate: f32) -> Self {
        Self::resume(start, target, 0.0, seconds, sample_rate)
    }

    /// Start part-way through a segment. `progress` is the fraction of the
    /// full duration already covered; the next step lands just past it.
    fn resume(start: f32, target: f32, progress: f32, seconds: f32, sample_rate: f32) -> Self {
        let total = (seconds * sample_rate).round().max(1.0) as u32;
        let elapsed = ((progress.clamp(0.0, 1.0) * total as f32).floor() as u32).min(total - 1);
        Self {
            start,
            target,
            total,
            elapsed,
            term: (-EXP_CURVATURE * elapsed as f32 / total as f32).exp(),
            ratio: (-EXP_CURVATURE / total as f32).exp(),
        }
    }

    /// Step one sample. Returns the new level and whether the segment is done.
    #[inline]
    fn advance(&mut self, curve: EnvelopeCurve) -> (f32, bool) {
        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed >= self.total {
            return (self.target, true);
        }

        let shape = match curve {
            EnvelopeCurve::Linear => self.elapsed as f32 / self.total as f32,
            EnvelopeCurve::Exponential => {
                self.term *= self.ratio;
                (1.0 - self.term) / (1.0 - (-EXP_CURVATURE).exp())
            }
        };

        (self.start + (self.target - self.start) * shape, false)
    }
}

pub struct Envelope {
    // Shape parameters (block-rate, applied to future segments)
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,
    curve: EnvelopeCurve,

    sample_rate: f32,
    sustain_coeff: f32,

    // Runtime state
    stage: EnvelopeState,
    level: f32,
    segment: Segment,
}

impl Envelope {
    pub fn new(sample_rate: f32) -> Self {
        Self::adsr(sample_rate, 0.01, 0.1, 0.7, 0.3)
    }

    pub fn adsr(sample_rate: f32, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let mut env = Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            sustain_level: sustain.clamp(0.0, 1.0),
            release_time: release.max(MIN_TIME),
            curve: EnvelopeCurve::default(),

            sample_rate: 48_000.0,
            sustain_coeff: 1.0,

            stage: EnvelopeState::Idle,
            level: 0.0,
            segment: Segment::idle(),
        };
        env.set_sample_rate(sample_rate);
        env
    }

    pub fn with_curve(mut self, curve: EnvelopeCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
        self.sustain_coeff = 1.0 - (-1.0 / (SUSTAIN_GLIDE_TIME * self.sample_rate)).exp();
    }

    pub fn set_attack_time(&mut self, seconds: f32) {
        self.attack_time = seconds.max(MIN_TIME);
    }

    pub fn set_decay_time(&mut self, seconds: f32) {
        self.decay_time = seconds.max(MIN_TIME);
    }

    pub fn set_sustain_level(&mut self, level: f32) {
        self.sustain_level = level.clamp(0.0, 1.0);
    }

    pub fn set_release_time(&mut self, seconds: f32) {
        self.release_time = seconds.max(MIN_TIME);
    }

    pub fn set_curve(&mut self, curve: EnvelopeCurve) {
        self.curve = curve;
    }

    /// Gate high: enter Attack from wherever the level currently is.
    pub fn trigger(&mut self) {
        if self.level >= 1.0 - f32::EPSILON {
            self.enter_decay();
            return;
        }

        self.segment = Segment::resume(
            0.0,
            1.0,
            self.curve.progress_at(self.level),
            self.attack_time,
            self.sample_rate,
        );
        self.stage = EnvelopeState::Attack;
    }

    /// Gate low: enter Release from the current level.
    pub fn release(&mut self) {
        if self.stage == EnvelopeState::Idle {
            return;
        }

        self.segment = Segment::begin(self.level, 0.0, self.release_time, self.sample_rate);
        self.stage = EnvelopeState::Release;
    }

    fn enter_decay(&mut self) {
        self.level = 1.0;
        self.segment = Segment::begin(1.0, self.sustain_level, self.decay_time, self.sample_rate);
        self.stage = EnvelopeState::Decay;
    }

    /// Advance the envelope by one sample and return the new level.
    #[inline]
    pub fn process(&mut self) -> f32 {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                let (level, done) = self.segment.advance(self.curve);
                self.level = level;
                if done {
                    self.enter_decay();
                }
            }

            EnvelopeState::Decay => {
                let (level, done) = self.segment.advance(self.curve);
                self.level = level;
                if done {
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                let diff = self.sustain_level - self.level;
                if diff.abs() < 1e-6 {
                    self.level = self.sustain_level;
                } else {
                    self.level += diff * self.sustain_coeff;
                }
            }

            EnvelopeState::Release => {
                let (level, done) = self.segment.advance(self.curve);
                self.level = level;
                if done {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        self.level = self.level.clamp(0.0, 1.0);
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process();
        }
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    /// Reset to idle state.
    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.segment = Segment::idle();
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    pub fn sustain_level(&self) -> f32 {
        self.sustain_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn render_samples(env: &mut Envelope, samples: usize) {
        for _ in 0..samples {
            env.process();
        }
    }

    /// Steepest step a full attack takes (its first sample from zero).
    fn first_attack_step(attack: f32) -> f32 {
        let mut fresh = Envelope::adsr(SAMPLE_RATE, attack, 0.1, 0.5, 0.1);
        fresh.trigger();
        fresh.process()
    }

    #[test]
    fn attack_reaches_full_level() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.1, 0.7, 0.2);

        env.trigger();
        render_samples(&mut env, 10);

        assert!(env.level() > 0.99, "expected attack to reach full level");
        assert_eq!(env.state(), EnvelopeState::Decay);
    }

    #[test]
    fn sustain_holds_target_level() {
        let sustain = 0.6;
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.05, sustain, 0.2);

        env.trigger();
        render_samples(&mut env, 60 + 5);

        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert!((env.level() - sustain).abs() < 1e-4, "sustain level should be held");
    }

    #[test]
    fn release_reaches_zero_within_release_time() {
        for curve in [EnvelopeCurve::Linear, EnvelopeCurve::Exponential] {
            let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.05, 0.5, 0.03).with_curve(curve);

            env.trigger();
            render_samples(&mut env, 20);

            env.release();
            assert_eq!(env.state(), EnvelopeState::Release);
            render_samples(&mut env, 29);
            assert!(env.level() > 0.0, "{curve:?} released too early");

            render_samples(&mut env, 1);
            assert_eq!(env.level(), 0.0);
            assert_eq!(env.state(), EnvelopeState::Idle);
        }
    }

    #[test]
    fn retrigger_mid_decay_starts_from_current_level() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.01, 0.1, 0.2, 0.2);

        env.trigger();
        render_samples(&mut env, 10 + 30);
        assert_eq!(env.state(), EnvelopeState::Decay);
        let before = env.level();
        assert!(before < 1.0 && before > 0.2);

        env.trigger();
        assert_eq!(env.state(), EnvelopeState::Attack);
        let after = env.process();

        assert!(after >= before, "attack must not drop back toward zero");
        assert!(after - before <= first_attack_step(0.01) + 1e-6, "jump {} too large", after - before);
    }

    #[test]
    fn retrigger_during_release_does_not_click() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.02, 0.05, 0.8, 0.5);

        env.trigger();
        render_samples(&mut env, 100);
        env.release();
        render_samples(&mut env, 50);
        let before = env.level();

        env.trigger();
        let after = env.process();
        assert!(after >= before);
        assert!(after - before <= first_attack_step(0.02) + 1e-6);
    }

    #[test]
    fn parameter_change_does_not_rewrite_current_segment() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.1, 0.1, 0.5, 0.1).with_curve(EnvelopeCurve::Linear);

        env.trigger();
        render_samples(&mut env, 50);
        let halfway = env.level();
        assert!((halfway - 0.5).abs() < 1e-3);

        // A much shorter attack must not make the in-flight ramp jump to 1.0
        env.set_attack_time(0.001);
        let next = env.process();
        assert!((next - 0.51).abs() < 1e-3, "got {next}");

        render_samples(&mut env, 49);
        assert_eq!(env.state(), EnvelopeState::Decay);
    }

    #[test]
    fn sustain_change_glides() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.001, 0.001, 0.8, 0.1);
        env.trigger();
        render_samples(&mut env, 10);
        assert_eq!(env.state(), EnvelopeState::Sustain);

        env.set_sustain_level(0.2);
        let first = env.process();
        assert!(first < 0.8 && first > 0.2, "sustain should glide, got {first}");

        render_samples(&mut env, 200);
        assert!((env.level() - 0.2).abs() < 1e-3);
    }

    #[test]
    fn exponential_attack_is_monotonic_and_concave() {
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.1, 0.1, 0.5, 0.1);
        env.trigger();

        let mut levels = vec![0.0f32; 100];
        env.render(&mut levels);

        assert!(levels.windows(2).all(|w| w[1] >= w[0]));
        // Front-loaded: more than half way after a quarter of the time
        assert!(levels[24] > 0.5);
        assert!((levels[99] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn release_from_idle_is_noop() {
        let mut env = Envelope::new(SAMPLE_RATE);
        env.release();
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert_eq!(env.process(), 0.0);
    }
}
