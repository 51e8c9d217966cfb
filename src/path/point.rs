// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! A point tracked in both image space and component space.

use crate::editing::ViewTransform;
use kurbo::{Point, Vec2};
use std::f64::consts::FRAC_PI_4;

/// Position of a handle in image space, with its cached component-space
/// projection.
///
/// The image-space position is authoritative. `co` is refreshed by
/// `sync_co` after every view change or geometry edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualPoint {
    pub im: Point,
    pub co: Point,
}

impl DualPoint {
    /// A point whose component coordinates are computed from `view`
    pub fn new(im: Point, view: &dyn ViewTransform) -> Self {
        Self {
            im,
            co: view.image_to_component(im),
        }
    }

    /// A point with an identity projection, to be synced later
    pub fn from_image(im: Point) -> Self {
        Self { im, co: im }
    }

    pub fn sync_co(&mut self, view: &dyn ViewTransform) {
        self.co = view.image_to_component(self.im);
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.im += delta;
    }

    /// Per-axis comparison of the image positions
    pub fn same_position_as(&self, other: &DualPoint, tolerance: f64) -> bool {
        (self.im.x - other.im.x).abs() < tolerance && (self.im.y - other.im.y).abs() < tolerance
    }

    /// Whether the square handle drawn at this point contains `co_pos`
    pub fn handle_contains(&self, co_pos: Point, radius: f64) -> bool {
        (co_pos.x - self.co.x).abs() < radius && (co_pos.y - self.co.y).abs() < radius
    }

    pub fn is_finite(&self) -> bool {
        self.im.x.is_finite() && self.im.y.is_finite()
    }
}

/// Snap `p` onto the nearest 45° ray from `pivot`, keeping its distance.
pub fn constrain_to_45(pivot: Point, p: Point) -> Point {
    let v = p - pivot;
    let len = v.hypot();
    if len == 0.0 {
        return p;
    }
    let snapped = (v.atan2() / FRAC_PI_4).round() * FRAC_PI_4;
    pivot + Vec2::from_angle(snapped) * len
}
