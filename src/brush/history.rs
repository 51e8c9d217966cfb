// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Points visited by connect-brush strokes.
//!
//! The history belongs to the editing session and is lent to the brushes
//! for each call, so every symmetry replica sees the points of the others.

use kurbo::Point;

#[derive(Debug, Clone, Default)]
pub struct StrokeHistory {
    points: Vec<Point>,
}

impl StrokeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Earlier points within `reach` of `p`, excluding `p` itself
    pub fn near(&self, p: Point, reach: f64) -> impl Iterator<Item = Point> + '_ {
        self.points
            .iter()
            .copied()
            .filter(move |q| *q != p && q.distance(p) <= reach)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_filters_by_distance() {
        let mut history = StrokeHistory::new();
        history.push(Point::new(0.0, 0.0));
        history.push(Point::new(3.0, 4.0));
        history.push(Point::new(30.0, 0.0));
        let near: Vec<_> = history.near(Point::new(0.0, 0.0), 5.0).collect();
        assert_eq!(near, vec![Point::new(3.0, 4.0)]);
    }
}
