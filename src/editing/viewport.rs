// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Mapping between component space (screen pixels of the canvas widget)
//! and image space (pixels of the edited image).
//!
//! Path geometry is stored in image space. Component-space coordinates are
//! a derived cache refreshed whenever the view changes, and are what pointer
//! events and handle hit testing work with.

use crate::settings;
use kurbo::{Affine, Point, Vec2};

/// Converts between component and image coordinates for the current view
pub trait ViewTransform {
    fn component_to_image(&self, p: Point) -> Point;
    fn image_to_component(&self, p: Point) -> Point;
}

/// Zoom, pan and rotation of the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPort {
    zoom: f64,
    /// Component-space position of the image origin
    offset: Vec2,
    /// Canvas rotation in radians
    rotation: f64,
}

impl ViewPort {
    pub fn new(zoom: f64, offset: Vec2) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            offset,
            rotation: 0.0,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Zoom while keeping the image point under `anchor` fixed on screen
    pub fn zoom_around(&mut self, zoom: f64, anchor: Point) {
        let im = self.component_to_image(anchor);
        self.zoom = clamp_zoom(zoom);
        let moved = self.image_to_component(im);
        self.offset += anchor - moved;
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub fn set_rotation(&mut self, radians: f64) {
        self.rotation = radians;
    }

    /// The image-to-component transform
    pub fn affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::rotate(self.rotation) * Affine::scale(self.zoom)
    }
}

impl Default for ViewPort {
    fn default() -> Self {
        Self::new(1.0, Vec2::ZERO)
    }
}

impl ViewTransform for ViewPort {
    fn component_to_image(&self, p: Point) -> Point {
        self.affine().inverse() * p
    }

    fn image_to_component(&self, p: Point) -> Point {
        self.affine() * p
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    if !zoom.is_finite() {
        return 1.0;
    }
    zoom.clamp(settings::view::MIN_ZOOM, settings::view::MAX_ZOOM)
}
