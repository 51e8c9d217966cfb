// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Uniform dab placement along the straight segments of a stroke.
//!
//! Dabs sit at equal arc-length intervals. The distance travelled since the
//! last dab carries over from one segment to the next, so the spacing does
//! not depend on how often the pointer reports positions.

use super::angle::AngleSettings;
use super::spacing::Spacing;
use super::{Dab, PaintTarget};
use crate::settings;
use kurbo::Point;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub struct LinearDabs {
    spacing: Spacing,
    angle: AngleSettings,
    /// Unconsumed distance since the previous dab
    dist_from_last_dab: f64,
    prev: Option<Point>,
    /// Dabs per segment before the placement loop gives up
    max_dabs_per_segment: Option<usize>,
    rng: StdRng,
}

impl LinearDabs {
    pub fn new(spacing: Spacing, angle: AngleSettings, max_dabs_per_segment: Option<usize>, seed: u64) -> Self {
        Self {
            spacing,
            angle,
            dist_from_last_dab: 0.0,
            prev: None,
            max_dabs_per_segment,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Refresh the cached copy of the shared settings
    pub fn apply_settings(&mut self, spacing: Spacing, angle: AngleSettings) {
        self.spacing = spacing;
        self.angle = angle;
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn angle_settings(&self) -> AngleSettings {
        self.angle
    }

    pub fn dist_from_last_dab(&self) -> f64 {
        self.dist_from_last_dab
    }

    pub fn prev(&self) -> Option<Point> {
        self.prev
    }

    /// Move the reference point without drawing
    pub fn set_prev(&mut self, p: Point) {
        self.prev = Some(p);
    }

    /// Begin a stroke at `p`.
    ///
    /// Angle-aware brushes wait for a direction: the carried distance is
    /// seeded so that the first dab lands shortly after the start.
    pub fn start(&mut self, p: Point, radius: f64, target: &mut dyn PaintTarget) {
        self.prev = Some(p);
        if self.angle.angle_aware {
            self.dist_from_last_dab = settings::brush::ANGLE_AWARE_SEED_FACTOR * self.spacing.spacing(radius);
        } else {
            self.dist_from_last_dab = 0.0;
            let angle = self.angle.jitter(0.0, &mut self.rng);
            target.put_dab(Dab {
                pos: p,
                radius,
                angle,
            });
        }
    }

    /// Place the dabs between the previous point and `end`, returning how
    /// many were placed
    pub fn advance(&mut self, end: Point, radius: f64, target: &mut dyn PaintTarget) -> usize {
        let Some(start) = self.prev else {
            debug_assert!(false, "dab placement continued without a start");
            self.start(end, radius, target);
            return 0;
        };

        let spacing = self.spacing.spacing(radius);
        if !(spacing > 0.0 && spacing.is_finite()) {
            tracing::warn!("skipping segment, invalid dab spacing {spacing}");
            self.prev = Some(end);
            return 0;
        }

        let delta = end - start;
        let len = delta.hypot();
        if len == 0.0 || !len.is_finite() {
            return 0;
        }

        let mut count = ((len + self.dist_from_last_dab) / spacing).floor() as usize;
        let mut capped = false;
        if let Some(cap) = self.max_dabs_per_segment {
            if count > cap {
                tracing::warn!("dab count {count} over the per-segment cap {cap}");
                count = cap;
                capped = true;
            }
        }

        let base_angle = if self.angle.angle_aware { delta.atan2() } else { 0.0 };
        let first = spacing - self.dist_from_last_dab;
        for i in 0..count {
            let t = (first + i as f64 * spacing) / len;
            let angle = self.angle.jitter(base_angle, &mut self.rng);
            target.put_dab(Dab {
                pos: start + delta * t,
                radius,
                angle,
            });
        }

        if count > 0 {
            let last = first + (count - 1) as f64 * spacing;
            let leftover = (len - last).max(0.0);
            self.dist_from_last_dab = if capped { leftover % spacing } else { leftover };
        } else {
            self.dist_from_last_dab += len;
        }
        self.prev = Some(end);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::{Mark, MarkRecorder};
    use approx::assert_abs_diff_eq;

    fn dabs(spacing: f64) -> LinearDabs {
        LinearDabs::new(Spacing::Fixed(spacing), AngleSettings::NOT_ANGLE_AWARE, Some(1000), 1)
    }

    fn dab_positions(rec: &MarkRecorder) -> Vec<Point> {
        rec.marks
            .iter()
            .filter_map(|m| match m {
                Mark::Dab(d) => Some(d.pos),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn non_angle_aware_draws_first_dab_at_start() {
        let mut rec = MarkRecorder::default();
        let mut d = dabs(3.0);
        d.start(Point::new(5.0, 5.0), 10.0, &mut rec);
        assert_eq!(dab_positions(&rec), vec![Point::new(5.0, 5.0)]);
        assert_eq!(d.dist_from_last_dab(), 0.0);
    }

    #[test]
    fn angle_aware_seeds_distance_instead_of_drawing() {
        let mut rec = MarkRecorder::default();
        let mut d = LinearDabs::new(Spacing::Fixed(10.0), AngleSettings::new(true, 0.0), None, 1);
        d.start(Point::ZERO, 5.0, &mut rec);
        assert!(rec.marks.is_empty());
        assert_abs_diff_eq!(d.dist_from_last_dab(), 8.0);

        d.advance(Point::new(5.0, 0.0), 5.0, &mut rec);
        let placed = dab_positions(&rec);
        assert_eq!(placed.len(), 1);
        assert_abs_diff_eq!(placed[0].x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn dab_count_matches_floor_formula() {
        let cases = [(10.0, 3.0, 0.0), (10.0, 3.0, 2.0), (7.5, 2.5, 1.25), (1.0, 4.0, 2.0), (100.0, 7.0, 6.5)];
        for (len, spacing, carried) in cases {
            let mut rec = MarkRecorder::default();
            let mut d = dabs(spacing);
            d.set_prev(Point::ZERO);
            d.dist_from_last_dab = carried;
            let count = d.advance(Point::new(len, 0.0), 1.0, &mut rec);
            assert_eq!(count, ((len + carried) / spacing).floor() as usize, "L={len} S={spacing} d={carried}");
            assert_eq!(rec.marks.len(), count);
            let leftover = d.dist_from_last_dab();
            assert!((0.0..spacing).contains(&leftover), "leftover {leftover} for S={spacing}");
        }
    }

    #[test]
    fn spacing_is_uniform_across_segments() {
        let mut rec = MarkRecorder::default();
        let mut d = dabs(4.0);
        d.start(Point::ZERO, 1.0, &mut rec);
        for x in [1.0, 2.5, 9.0, 13.0, 20.0] {
            d.advance(Point::new(x, 0.0), 1.0, &mut rec);
        }
        let xs: Vec<f64> = dab_positions(&rec).iter().map(|p| p.x).collect();
        assert_eq!(xs.len(), 6);
        for (i, x) in xs.iter().enumerate() {
            assert_abs_diff_eq!(*x, 4.0 * i as f64, epsilon = 1e-9);
        }
    }

    #[test]
    fn short_segments_accumulate() {
        let mut rec = MarkRecorder::default();
        let mut d = dabs(10.0);
        d.start(Point::ZERO, 1.0, &mut rec);
        d.advance(Point::new(3.0, 0.0), 1.0, &mut rec);
        d.advance(Point::new(6.0, 0.0), 1.0, &mut rec);
        assert_eq!(rec.marks.len(), 1);
        assert_abs_diff_eq!(d.dist_from_last_dab(), 6.0);
    }

    #[test]
    fn zero_length_segment_is_skipped() {
        let mut rec = MarkRecorder::default();
        let mut d = dabs(2.0);
        d.start(Point::new(1.0, 1.0), 1.0, &mut rec);
        assert_eq!(d.advance(Point::new(1.0, 1.0), 1.0, &mut rec), 0);
        assert_eq!(d.dist_from_last_dab(), 0.0);
    }

    #[test]
    fn invalid_spacing_draws_nothing() {
        let mut rec = MarkRecorder::default();
        let mut d = dabs(0.0);
        d.set_prev(Point::ZERO);
        assert_eq!(d.advance(Point::new(50.0, 0.0), 1.0, &mut rec), 0);
        assert!(rec.marks.is_empty());
    }

    #[test]
    fn cap_limits_runaway_segments() {
        let mut rec = MarkRecorder::default();
        let mut d = LinearDabs::new(Spacing::Fixed(0.001), AngleSettings::NOT_ANGLE_AWARE, Some(1000), 1);
        d.set_prev(Point::ZERO);
        assert_eq!(d.advance(Point::new(100.0, 0.0), 1.0, &mut rec), 1000);
        assert!(d.dist_from_last_dab() < 0.001);
    }

    #[test]
    fn angle_follows_direction() {
        let mut rec = MarkRecorder::default();
        let mut d = LinearDabs::new(Spacing::Fixed(1.0), AngleSettings::new(true, 0.0), None, 1);
        d.start(Point::ZERO, 1.0, &mut rec);
        d.advance(Point::new(0.0, 10.0), 1.0, &mut rec);
        for mark in &rec.marks {
            if let Mark::Dab(dab) = mark {
                assert_abs_diff_eq!(dab.angle, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
            }
        }
        assert!(!rec.marks.is_empty());
    }
}
