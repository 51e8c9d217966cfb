// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Mirrored strokes.
//!
//! A `SymmetryBrush` drives up to four brushes of the same kind, each
//! receiving the pointer position mapped through one mirror of the
//! canvas. All of them extend a single affected area.

use super::affected_area::AffectedArea;
use super::angle::AngleSettings;
use super::kinds::{AnyBrush, Brush, BrushContext, BrushKind};
use super::settings::DabsBrushSettings;
use super::spacing::Spacing;
use kurbo::{Point, Rect, Size};
use serde::Deserialize;
use std::time::Duration;

pub const MAX_SYMMETRY_BRUSHES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symmetry {
    #[default]
    None,
    /// Mirror across the vertical center line
    VerticalMirror,
    /// Mirror across the horizontal center line
    HorizontalMirror,
    TwoMirrors,
    /// Point reflection through the canvas center
    Central,
}

impl Symmetry {
    pub fn brush_count(self) -> usize {
        match self {
            Symmetry::None => 1,
            Symmetry::VerticalMirror | Symmetry::HorizontalMirror | Symmetry::Central => 2,
            Symmetry::TwoMirrors => 4,
        }
    }

    /// Image position seen by replica `index` when the pointer is at `p`.
    ///
    /// Every mapping is its own inverse.
    pub fn map(self, index: usize, p: Point, canvas: Size) -> Point {
        let flip_x = Point::new(canvas.width - p.x, p.y);
        let flip_y = Point::new(p.x, canvas.height - p.y);
        let flip_both = Point::new(canvas.width - p.x, canvas.height - p.y);
        match (self, index) {
            (_, 0) => p,
            (Symmetry::VerticalMirror, 1) => flip_x,
            (Symmetry::HorizontalMirror, 1) => flip_y,
            (Symmetry::Central, 1) => flip_both,
            (Symmetry::TwoMirrors, 1) => flip_x,
            (Symmetry::TwoMirrors, 2) => flip_y,
            (Symmetry::TwoMirrors, 3) => flip_both,
            _ => {
                debug_assert!(false, "replica {index} out of range for {self:?}");
                p
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SymmetryBrush {
    symmetry: Symmetry,
    kind: BrushKind,
    radius: f64,
    canvas: Size,
    brushes: Vec<AnyBrush>,
    settings: DabsBrushSettings,
    area: AffectedArea,
    max_dabs_per_segment: Option<usize>,
    seed: u64,
}

impl SymmetryBrush {
    pub fn new(
        kind: BrushKind,
        symmetry: Symmetry,
        radius: f64,
        canvas: Size,
        settings: DabsBrushSettings,
        max_dabs_per_segment: Option<usize>,
        seed: u64,
    ) -> Self {
        let mut brush = Self {
            symmetry: Symmetry::None,
            kind,
            radius,
            canvas,
            brushes: Vec::new(),
            settings,
            area: AffectedArea::new(),
            max_dabs_per_segment,
            seed,
        };
        brush.push_brush();
        brush.set_symmetry(symmetry);
        brush
    }

    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    pub fn kind(&self) -> BrushKind {
        self.kind
    }

    pub fn brushes(&self) -> &[AnyBrush] {
        &self.brushes
    }

    pub fn settings(&self) -> &DabsBrushSettings {
        &self.settings
    }

    pub fn affected_area(&self) -> &AffectedArea {
        &self.area
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: Size) {
        self.canvas = canvas;
    }

    /// End position of the primary brush
    pub fn previous(&self) -> Option<Point> {
        self.brushes.first().and_then(Brush::previous)
    }

    fn push_brush(&mut self) {
        let slot = self.brushes.len();
        let seed = self.seed.wrapping_add(slot as u64);
        let brush = AnyBrush::new(self.kind, self.radius, &self.settings, self.max_dabs_per_segment, seed);
        if brush.kind() == BrushKind::Dabs {
            self.settings.register(slot);
        }
        self.brushes.push(brush);
    }

    /// Change the mirror set.
    ///
    /// Replicas that remain or are added take the primary brush's last
    /// position mapped through the new symmetry, so a following
    /// `continue_to` draws from the right place.
    pub fn set_symmetry(&mut self, symmetry: Symmetry) {
        let count = symmetry.brush_count().min(MAX_SYMMETRY_BRUSHES);
        while self.brushes.len() > count {
            let slot = self.brushes.len() - 1;
            if let Some(mut brush) = self.brushes.pop() {
                brush.dispose();
            }
            self.settings.unregister(slot);
        }
        while self.brushes.len() < count {
            self.push_brush();
        }
        self.symmetry = symmetry;

        if let Some(prev) = self.previous() {
            for i in 1..self.brushes.len() {
                let mapped = symmetry.map(i, prev, self.canvas);
                self.brushes[i].set_previous(mapped);
            }
        }
        tracing::debug!("symmetry set to {symmetry:?} with {count} brushes");
    }

    /// Replace every replica with a brush of another kind
    pub fn set_kind(&mut self, kind: BrushKind) {
        if kind == self.kind {
            return;
        }
        let previous = self.previous();
        self.dispose();
        self.brushes.clear();
        for slot in 0..MAX_SYMMETRY_BRUSHES {
            self.settings.unregister(slot);
        }
        self.kind = kind;
        for _ in 0..self.symmetry.brush_count() {
            self.push_brush();
        }
        if let Some(prev) = previous {
            self.set_previous(prev);
        }
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
        for brush in &mut self.brushes {
            brush.set_radius(radius);
        }
    }

    pub fn set_spacing(&mut self, spacing: Spacing) {
        self.settings.set_spacing(spacing, &mut self.brushes);
    }

    pub fn set_angle_settings(&mut self, angle: AngleSettings) {
        self.settings.set_angle(angle, &mut self.brushes);
    }

    /// Move every replica without drawing
    pub fn set_previous(&mut self, p: Point) {
        for (i, brush) in self.brushes.iter_mut().enumerate() {
            brush.set_previous(self.symmetry.map(i, p, self.canvas));
        }
    }

    /// Start a new stroke; the first replica resets the affected area
    pub fn begin_stroke(&mut self, p: Point, ctx: &mut BrushContext<'_>) {
        for (i, brush) in self.brushes.iter_mut().enumerate() {
            let q = self.symmetry.map(i, p, self.canvas);
            if i == 0 {
                self.area.init(q);
            } else {
                self.area.update(q);
            }
            brush.start_at(q, ctx);
        }
    }

    /// Start a stroke with a straight run from where the last one ended.
    /// Falls back to a plain start when no brush has painted yet.
    pub fn begin_connected(&mut self, p: Point, ctx: &mut BrushContext<'_>) {
        if self.previous().is_none() {
            self.begin_stroke(p, ctx);
            return;
        }
        let mut ends = self.brushes.iter().filter_map(|b| b.previous());
        if let Some(first) = ends.next() {
            self.area.init(first);
        }
        for end in ends {
            self.area.update(end);
        }
        self.continue_to(p, ctx);
    }

    /// Start a sub-stroke without resetting the affected area
    pub fn restart_at(&mut self, p: Point, ctx: &mut BrushContext<'_>) {
        for (i, brush) in self.brushes.iter_mut().enumerate() {
            let q = self.symmetry.map(i, p, self.canvas);
            self.area.update(q);
            brush.start_at(q, ctx);
        }
    }

    pub fn continue_to(&mut self, p: Point, ctx: &mut BrushContext<'_>) {
        for (i, brush) in self.brushes.iter_mut().enumerate() {
            let q = self.symmetry.map(i, p, self.canvas);
            self.area.update(q);
            brush.continue_to(q, ctx);
        }
    }

    pub fn tick(&mut self, elapsed: Duration, ctx: &mut BrushContext<'_>) {
        for brush in &mut self.brushes {
            brush.tick(elapsed, ctx);
        }
    }

    pub fn finish(&mut self) {
        for brush in &mut self.brushes {
            brush.finish();
        }
    }

    /// Raster region touched by the current stroke
    pub fn affected_rect(&self, margin: f64) -> Option<Rect> {
        self.area.rect_for_radius(self.radius, margin)
    }

    pub fn dispose(&mut self) {
        for brush in &mut self.brushes {
            brush.dispose();
        }
    }
}
