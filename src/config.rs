// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration loaded from TOML.
//!
//! Every field is optional in the file; missing values fall back to the
//! defaults in `settings.rs`.
//!
//! ```toml
//! [path]
//! handle_radius = 6.0
//! rubber_band = true
//!
//! [path.tolerances]
//! merge_distance = 0.5
//!
//! [brush]
//! kind = "dabs"
//! radius = 12.0
//! spacing = { radius_ratio = 0.25 }
//! angle_aware = true
//! max_jitter_degrees = 15.0
//! symmetry = "two_mirrors"
//! ```

use crate::brush::{BrushKind, Spacing, Symmetry};
use crate::path::Tolerances;
use crate::settings;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path as FsPath;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub path: PathConfig,
    pub brush: BrushConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub tolerances: Tolerances,
    /// Half-size of the handle hit box in component pixels
    pub handle_radius: f64,
    /// Draw the preview curve towards the pointer while building
    pub rubber_band: bool,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            handle_radius: settings::handles::RADIUS,
            rubber_band: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub kind: BrushKind,
    pub radius: f64,
    pub spacing: Spacing,
    pub angle_aware: bool,
    pub max_jitter_degrees: f64,
    /// Per-segment dab cap; `None` disables the guard
    pub max_dabs_per_segment: Option<usize>,
    pub symmetry: Symmetry,
    pub seed: u64,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            kind: BrushKind::default(),
            radius: settings::brush::DEFAULT_RADIUS,
            spacing: Spacing::default(),
            angle_aware: false,
            max_jitter_degrees: 0.0,
            max_dabs_per_segment: Some(settings::brush::MAX_DABS_PER_SEGMENT),
            symmetry: Symmetry::default(),
            seed: settings::brush::DEFAULT_RNG_SEED,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("invalid configuration")?;
        Ok(config)
    }

    pub fn load(path: &FsPath) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }
}
