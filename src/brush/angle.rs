// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Dab orientation

use rand::Rng;

/// Whether dabs turn with the stroke, and how much random rotation they get
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSettings {
    pub angle_aware: bool,
    /// Maximum random deviation in radians
    pub max_jitter: f64,
}

impl AngleSettings {
    pub const NOT_ANGLE_AWARE: AngleSettings = AngleSettings {
        angle_aware: false,
        max_jitter: 0.0,
    };

    pub fn new(angle_aware: bool, max_jitter_degrees: f64) -> Self {
        Self {
            angle_aware,
            max_jitter: max_jitter_degrees.abs().to_radians(),
        }
    }

    pub fn is_jittered(&self) -> bool {
        self.max_jitter > 0.0
    }

    /// Perturb `angle` uniformly within `±max_jitter`
    pub fn jitter(&self, angle: f64, rng: &mut impl Rng) -> f64 {
        if !self.is_jittered() {
            return angle;
        }
        angle + (2.0 * rng.random::<f64>() - 1.0) * self.max_jitter
    }
}

impl Default for AngleSettings {
    fn default() -> Self {
        Self::NOT_ANGLE_AWARE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn no_jitter_keeps_angle() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(AngleSettings::new(true, 0.0).jitter(0.75, &mut rng), 0.75);
    }

    #[test]
    fn jitter_stays_in_range() {
        let settings = AngleSettings::new(true, 10.0);
        let max = 10f64.to_radians();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let a = settings.jitter(1.0, &mut rng);
            assert!((a - 1.0).abs() <= max);
        }
    }

    #[test]
    fn jitter_is_reproducible_with_seed() {
        let settings = AngleSettings::new(true, 30.0);
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(settings.jitter(0.0, &mut a), settings.jitter(0.0, &mut b));
    }
}
