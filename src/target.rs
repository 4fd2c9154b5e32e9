use std::fmt;

use rand::Rng;

/// Duration in seconds the player tries to hit.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Target(f64);

impl Target {
    pub const MIN: f64 = 2.0;
    pub const MAX: f64 = 5.0;

    /// Clamp `secs` into `[MIN, MAX]`. NaN is treated as the lower bound.
    pub fn clamped(secs: f64) -> Self {
        if secs.is_nan() {
            return Self(Self::MIN);
        }
        Self(secs.clamp(Self::MIN, Self::MAX))
    }

    /// Uniformly sampled target, rounded to hundredths
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::clamped(round_hundredths(rng.gen_range(Self::MIN..=Self::MAX)))
    }

    /// Move by `step` seconds (negative moves down), as the tuner slider does.
    pub fn nudged(&self, step: f64) -> Self {
        Self::clamped(round_hundredths(self.0 + step))
    }

    pub fn secs(&self) -> f64 {
        self.0
    }
}

impl Default for Target {
    fn default() -> Self {
        Self(3.0)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}s", self.0)
    }
}

fn round_hundredths(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
