// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Segments between consecutive anchors of a subpath

use kurbo::{CubicBez, Line, ParamCurve, PathEl, Point};

/// One rendered piece of a subpath
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Both connecting handles are retracted
    Line(Line),
    Cubic(CubicBez),
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Line(line) => line.p0,
            Segment::Cubic(cubic) => cubic.p0,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line(line) => line.p1,
            Segment::Cubic(cubic) => cubic.p3,
        }
    }

    pub fn eval(&self, t: f64) -> Point {
        match self {
            Segment::Line(line) => line.eval(t),
            Segment::Cubic(cubic) => cubic.eval(t),
        }
    }

    /// The path element drawing this segment from its start point
    pub fn to_path_el(&self) -> PathEl {
        match self {
            Segment::Line(line) => PathEl::LineTo(line.p1),
            Segment::Cubic(cubic) => PathEl::CurveTo(cubic.p1, cubic.p2, cubic.p3),
        }
    }
}

/// A segment together with the indices of the anchors it connects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentInfo {
    pub segment: Segment,
    pub start_index: usize,
    pub end_index: usize,
}

/// Degree-elevate a quadratic curve.
///
/// Returns the two cubic control points; the end points are unchanged.
pub fn quad_to_cubic(q0: Point, q1: Point, q2: Point) -> (Point, Point) {
    let c1 = q0 + (q1 - q0) * (2.0 / 3.0);
    let c2 = q2 + (q1 - q2) * (2.0 / 3.0);
    (c1, c2)
}
