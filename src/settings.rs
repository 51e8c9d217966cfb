// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Compile-time defaults and tuning constants.
//!
//! The path tolerances below are empirically chosen "feel" values. They
//! are the defaults of the runtime `Config` (see `config.rs`), which can
//! override them from a TOML file.

// ============================================================================
// PATH TOLERANCES
// ============================================================================
/// A control point closer than this (per axis) to its anchor is retracted
const RETRACTION_TOLERANCE: f64 = 1.0;

/// Max per-axis deviation of `dOut + dIn` for a pair to count as symmetric
const SYMMETRY_THRESHOLD: f64 = 2.0;

/// Max cross product of the two handle vectors for a pair to be collinear
const COLLINEARITY_THRESHOLD: f64 = 0.1;

/// Adjacent anchors closer than this (per axis) are merged on import
const MERGE_DISTANCE: f64 = 1.0;

// ============================================================================
// HANDLE INTERACTION
// ============================================================================
/// Half-size of the square hit box around a handle (component pixels)
const HANDLE_RADIUS: f64 = 5.0;

/// Arrow key nudge in image pixels
const NUDGE_BASE: f64 = 1.0;

/// Shift-arrow nudge in image pixels
const NUDGE_SHIFT: f64 = 10.0;

/// Distance of the rotate handle above a transform box (component pixels)
const ROTATE_HANDLE_OFFSET: f64 = 20.0;

// ============================================================================
// VIEW
// ============================================================================
/// Minimum zoom level (2% of original size)
const MIN_ZOOM: f64 = 0.02;

/// Maximum zoom level (50x original size)
const MAX_ZOOM: f64 = 50.0;

// ============================================================================
// BRUSH SETTINGS
// ============================================================================
const BRUSH_MIN_RADIUS: f64 = 1.0;
const BRUSH_MAX_RADIUS: f64 = 100.0;
const BRUSH_DEFAULT_RADIUS: f64 = 10.0;

/// Default spacing as a multiple of the brush radius
const BRUSH_DEFAULT_SPACING_RATIO: f64 = 0.5;

/// Angle-aware strokes seed the carried distance with this share of the
/// spacing, so the first dab lands once a direction is known
const ANGLE_AWARE_SEED_FACTOR: f64 = 0.8;

/// Per-segment dab cap guarding against runaway loops
const MAX_DABS_PER_SEGMENT: usize = 1000;

/// Extra pixels added around the stroke bounds for the undo region
const AFFECTED_AREA_MARGIN: f64 = 2.0;

/// Flattening tolerance used when tracing a path with a brush
const TRACE_FLATTEN_TOLERANCE: f64 = 1.0;

/// Spray burst interval in milliseconds
const SPRAY_INTERVAL_MS: u64 = 25;

/// Dabs emitted per spray burst
const SPRAY_DABS_PER_TICK: usize = 8;

/// Earlier points closer than this multiple of the radius get connected
const CONNECT_REACH_FACTOR: f64 = 5.0;

/// Seed used for jitter and spray when no seed is configured
const DEFAULT_RNG_SEED: u64 = 0x5eed_d4b5;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Geometric tolerances of the path model
pub mod path {
    pub const RETRACTION_TOLERANCE: f64 = super::RETRACTION_TOLERANCE;
    pub const SYMMETRY_THRESHOLD: f64 = super::SYMMETRY_THRESHOLD;
    pub const COLLINEARITY_THRESHOLD: f64 = super::COLLINEARITY_THRESHOLD;
    pub const MERGE_DISTANCE: f64 = super::MERGE_DISTANCE;
}

/// Handle hit testing and keyboard nudging
pub mod handles {
    /// Half-size of the handle hit box
    pub const RADIUS: f64 = super::HANDLE_RADIUS;

    /// Rotate handle offset above a transform box
    pub const ROTATE_OFFSET: f64 = super::ROTATE_HANDLE_OFFSET;

    pub mod nudge {
        pub const BASE: f64 = super::super::NUDGE_BASE;
        pub const SHIFT: f64 = super::super::NUDGE_SHIFT;
    }
}

/// Viewport zoom bounds
pub mod view {
    pub const MIN_ZOOM: f64 = super::MIN_ZOOM;
    pub const MAX_ZOOM: f64 = super::MAX_ZOOM;
}

/// Brush defaults and stroke sampling limits
pub mod brush {
    pub const MIN_RADIUS: f64 = super::BRUSH_MIN_RADIUS;
    pub const MAX_RADIUS: f64 = super::BRUSH_MAX_RADIUS;
    pub const DEFAULT_RADIUS: f64 = super::BRUSH_DEFAULT_RADIUS;
    pub const DEFAULT_SPACING_RATIO: f64 = super::BRUSH_DEFAULT_SPACING_RATIO;
    pub const ANGLE_AWARE_SEED_FACTOR: f64 = super::ANGLE_AWARE_SEED_FACTOR;
    pub const MAX_DABS_PER_SEGMENT: usize = super::MAX_DABS_PER_SEGMENT;
    pub const AFFECTED_AREA_MARGIN: f64 = super::AFFECTED_AREA_MARGIN;
    pub const TRACE_FLATTEN_TOLERANCE: f64 = super::TRACE_FLATTEN_TOLERANCE;
    pub const DEFAULT_RNG_SEED: u64 = super::DEFAULT_RNG_SEED;

    /// Timer-driven spray brush
    pub mod spray {
        pub const INTERVAL_MS: u64 = super::super::SPRAY_INTERVAL_MS;
        pub const DABS_PER_TICK: usize = super::super::SPRAY_DABS_PER_TICK;
    }

    /// Connect brush
    pub mod connect {
        pub const REACH_FACTOR: f64 = super::super::CONNECT_REACH_FACTOR;
    }
}
