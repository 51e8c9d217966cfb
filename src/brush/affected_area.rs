// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Running bounds of a stroke, used to size the undo region

use kurbo::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AffectedArea {
    bounds: Option<Rect>,
}

impl AffectedArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the bounds to a single point at stroke start
    pub fn init(&mut self, p: Point) {
        self.bounds = Some(Rect::from_points(p, p));
    }

    pub fn update(&mut self, p: Point) {
        match &mut self.bounds {
            Some(bounds) => *bounds = bounds.union_pt(p),
            None => {
                tracing::debug!("affected area updated before init");
                self.init(p);
            }
        }
    }

    pub fn reset(&mut self) {
        self.bounds = None;
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// The raster region a brush of `radius` may have touched
    pub fn rect_for_radius(&self, radius: f64, margin: f64) -> Option<Rect> {
        let grow = radius + margin;
        self.bounds.map(|b| b.inflate(grow, grow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_then_update_grows_bounds() {
        let mut area = AffectedArea::new();
        area.init(Point::new(10.0, 10.0));
        area.update(Point::new(20.0, 5.0));
        area.update(Point::new(15.0, 30.0));
        assert_eq!(area.bounds(), Some(Rect::new(10.0, 5.0, 20.0, 30.0)));
    }

    #[test]
    fn init_discards_previous_stroke() {
        let mut area = AffectedArea::new();
        area.init(Point::new(0.0, 0.0));
        area.update(Point::new(100.0, 100.0));
        area.init(Point::new(50.0, 50.0));
        assert_eq!(area.bounds(), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));
    }

    #[test]
    fn rect_is_expanded_by_radius_and_margin() {
        let mut area = AffectedArea::new();
        area.init(Point::new(10.0, 10.0));
        area.update(Point::new(20.0, 20.0));
        assert_eq!(area.rect_for_radius(5.0, 2.0), Some(Rect::new(3.0, 3.0, 27.0, 27.0)));
        assert_eq!(AffectedArea::new().rect_for_radius(5.0, 2.0), None);
    }
}
