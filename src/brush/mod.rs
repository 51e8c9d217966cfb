// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Raster brushes: dab placement, brush kinds and mirrored strokes

mod affected_area;
mod angle;
mod dabs;
mod history;
mod kinds;
mod settings;
mod spacing;
mod symmetry;
mod timer;

pub use affected_area::AffectedArea;
pub use angle::AngleSettings;
pub use dabs::LinearDabs;
pub use history::StrokeHistory;
pub use kinds::{AnyBrush, Brush, BrushContext, BrushKind, ConnectBrush, DabsBrush, SprayBrush, StrokeBrush};
pub use settings::DabsBrushSettings;
pub use spacing::Spacing;
pub use symmetry::{MAX_SYMMETRY_BRUSHES, Symmetry, SymmetryBrush};
pub use timer::StrokeTimer;

use kurbo::Point;

/// One stamp of the brush shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dab {
    pub pos: Point,
    pub radius: f64,
    /// Rotation in radians
    pub angle: f64,
}

/// Where brushes put their marks
pub trait PaintTarget {
    fn put_dab(&mut self, dab: Dab);

    fn draw_line(&mut self, from: Point, to: Point, radius: f64);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mark {
    Dab(Dab),
    Line { from: Point, to: Point, radius: f64 },
}

/// A paint target that keeps every mark
#[derive(Debug, Clone, Default)]
pub struct MarkRecorder {
    pub marks: Vec<Mark>,
}

impl MarkRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dab_count(&self) -> usize {
        self.marks.iter().filter(|m| matches!(m, Mark::Dab(_))).count()
    }

    pub fn line_count(&self) -> usize {
        self.marks.len() - self.dab_count()
    }
}

impl PaintTarget for MarkRecorder {
    fn put_dab(&mut self, dab: Dab) {
        self.marks.push(Mark::Dab(dab));
    }

    fn draw_line(&mut self, from: Point, to: Point, radius: f64) {
        self.marks.push(Mark::Line { from, to, radius });
    }
}
