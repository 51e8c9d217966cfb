// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Distance between consecutive dabs

use crate::settings;
use serde::Deserialize;

/// How far apart dabs are placed along the stroke
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    /// A fixed distance in image pixels
    Fixed(f64),
    /// A multiple of the brush radius
    RadiusRatio(f64),
}

impl Spacing {
    pub fn spacing(self, radius: f64) -> f64 {
        match self {
            Spacing::Fixed(distance) => distance,
            Spacing::RadiusRatio(ratio) => radius * ratio,
        }
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing::RadiusRatio(settings::brush::DEFAULT_SPACING_RATIO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_ignores_radius() {
        assert_eq!(Spacing::Fixed(4.0).spacing(1.0), 4.0);
        assert_eq!(Spacing::Fixed(4.0).spacing(90.0), 4.0);
    }

    #[test]
    fn ratio_scales_with_radius() {
        assert_eq!(Spacing::RadiusRatio(0.5).spacing(10.0), 5.0);
        assert_eq!(Spacing::RadiusRatio(2.0).spacing(3.0), 6.0);
    }
}
