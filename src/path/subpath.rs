// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! A single open or closed run of anchors.
//!
//! Anchor order is curve order. While a subpath is being built it may carry
//! a transient moving point: the rubber-band preview of where the next
//! anchor would go. The moving point is never part of a snapshot and never
//! persisted.

use super::anchor::{AnchorPoint, HandlePart, HandleSide, HandleType};
use super::point::DualPoint;
use super::segment::{Segment, SegmentInfo, quad_to_cubic};
use super::{CoordSpace, Tolerances};
use crate::editing::ViewTransform;
use crate::error::PathError;
use crate::model::EntityId;
use kurbo::{Affine, BezPath, CubicBez, Line, Point, Rect, Shape, Vec2};

#[derive(Debug, Clone)]
pub struct SubPath {
    id: EntityId,
    anchors: Vec<AnchorPoint>,
    moving_point: Option<DualPoint>,
    closed: bool,
    finished: bool,
}

impl SubPath {
    /// An empty, unfinished subpath
    pub fn new() -> Self {
        Self {
            id: EntityId::next(),
            anchors: Vec::new(),
            moving_point: None,
            closed: false,
            finished: false,
        }
    }

    /// An unfinished subpath whose first anchor is `first`
    pub fn starting_with(first: AnchorPoint) -> Self {
        let mut subpath = Self::new();
        subpath.anchors.push(first);
        subpath
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn anchors(&self) -> &[AnchorPoint] {
        &self.anchors
    }

    pub fn anchor(&self, index: usize) -> Option<&AnchorPoint> {
        self.anchors.get(index)
    }

    pub fn anchor_mut(&mut self, index: usize) -> Option<&mut AnchorPoint> {
        self.anchors.get_mut(index)
    }

    pub fn first(&self) -> Option<&AnchorPoint> {
        self.anchors.first()
    }

    pub fn last(&self) -> Option<&AnchorPoint> {
        self.anchors.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut AnchorPoint> {
        self.anchors.last_mut()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Fewer than two anchors means there is nothing to draw
    pub fn is_degenerate(&self) -> bool {
        self.anchors.len() < 2
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn moving_point(&self) -> Option<&DualPoint> {
        self.moving_point.as_ref()
    }

    /// Arm or move the rubber-band preview point
    pub fn set_moving_point(&mut self, point: DualPoint) {
        debug_assert!(!self.finished, "{} is finished", self.id);
        if self.finished {
            return;
        }
        self.moving_point = Some(point);
    }

    pub fn clear_moving_point(&mut self) {
        self.moving_point = None;
    }

    // ===== Construction =====

    pub fn add_point(&mut self, anchor: AnchorPoint) {
        debug_assert!(!self.finished, "adding to finished {}", self.id);
        if self.finished {
            return;
        }
        self.anchors.push(anchor);
    }

    /// Turn the moving point into a committed anchor
    pub fn commit_moving_point(&mut self, pos: DualPoint) -> &mut AnchorPoint {
        self.moving_point = None;
        self.anchors.push(AnchorPoint::new(pos));
        let last = self.anchors.len() - 1;
        &mut self.anchors[last]
    }

    /// Append a straight segment ending at `end` (image space)
    pub fn add_line(&mut self, end: Point) {
        self.add_point(AnchorPoint::new(DualPoint::from_image(end)));
    }

    /// Append a cubic segment from the last anchor (image space)
    pub fn add_cubic_curve(&mut self, c1: Point, c2: Point, end: Point) {
        let Some(last) = self.anchors.last_mut() else {
            debug_assert!(false, "cubic without a start point");
            return;
        };
        last.set_ctrl_location_only(HandleSide::Out, c1);
        let mut next = AnchorPoint::new(DualPoint::from_image(end));
        next.set_ctrl_location_only(HandleSide::In, c2);
        next.set_type(HandleType::Smooth);
        self.add_point(next);
    }

    /// Append a quadratic segment, stored as its exact cubic equivalent
    pub fn add_quad_curve(&mut self, ctrl: Point, end: Point) {
        let Some(start) = self.anchors.last().map(AnchorPoint::im) else {
            debug_assert!(false, "quadratic without a start point");
            return;
        };
        let (c1, c2) = quad_to_cubic(start, ctrl, end);
        self.add_cubic_curve(c1, c2, end);
    }

    /// Close the subpath. Closing also finishes it.
    pub fn close(&mut self) {
        debug_assert!(self.anchors.len() >= 2, "closing {} with too few anchors", self.id);
        self.moving_point = None;
        self.closed = true;
        self.finish();
    }

    pub fn finish(&mut self) {
        self.finished = true;
        self.moving_point = None;
    }

    pub fn undo_closing(&mut self) {
        self.closed = false;
        self.finished = false;
    }

    pub fn undo_finishing(&mut self) {
        self.finished = false;
    }

    /// Whether a press at `co_pos` would close this subpath
    pub fn can_close_at(&self, co_pos: Point, radius: f64) -> bool {
        !self.closed
            && self.anchors.len() >= 2
            && self
                .anchors
                .first()
                .is_some_and(|first| first.pos.handle_contains(co_pos, radius))
    }

    // ===== Deletion =====

    pub fn delete_anchor(&mut self, index: usize) -> Result<(), PathError> {
        if index >= self.anchors.len() {
            return Err(PathError::AnchorIndex {
                index,
                len: self.anchors.len(),
            });
        }
        self.anchors.remove(index);
        if self.closed && self.anchors.len() < 2 {
            self.closed = false;
        }
        Ok(())
    }

    pub fn delete_last(&mut self) {
        self.anchors.pop();
    }

    // ===== Whole-subpath edits =====

    /// Reverse the drawing direction. A closed subpath keeps its first anchor.
    pub fn reverse(&mut self) {
        self.anchors.reverse();
        if self.closed && !self.anchors.is_empty() {
            self.anchors.rotate_right(1);
        }
        for anchor in &mut self.anchors {
            anchor.swap_handles();
        }
    }

    /// Split at the anchor at `index`.
    ///
    /// A closed subpath is opened there and nothing is returned. An open
    /// subpath keeps the part up to and including the anchor and returns the
    /// rest, which starts with a copy of it.
    pub fn split_at(&mut self, index: usize) -> Result<Option<SubPath>, PathError> {
        let len = self.anchors.len();
        if index >= len {
            return Err(PathError::AnchorIndex { index, len });
        }
        if self.closed {
            self.anchors.rotate_left(index);
            let mut end = self.anchors[0].clone();
            let mut start = self.anchors[0].clone();
            end.set_ctrl_location_only(HandleSide::Out, end.im());
            start.set_ctrl_location_only(HandleSide::In, start.im());
            end.set_type(HandleType::Cusp);
            start.set_type(HandleType::Cusp);
            self.anchors[0] = start;
            self.anchors.push(end);
            self.closed = false;
            return Ok(None);
        }
        if index == 0 || index == len - 1 {
            return Ok(None);
        }
        let mut rest = self.anchors.split_off(index + 1);
        let mut joint = self.anchors[index].clone();
        joint.set_ctrl_location_only(HandleSide::In, joint.im());
        joint.set_type(HandleType::Cusp);
        rest.insert(0, joint);
        if let Some(end) = self.anchors.last_mut() {
            end.set_ctrl_location_only(HandleSide::Out, end.im());
            end.set_type(HandleType::Cusp);
        }

        let mut tail = SubPath::new();
        tail.anchors = rest;
        tail.finished = self.finished;
        Ok(Some(tail))
    }

    pub fn translate(&mut self, delta: Vec2) {
        for anchor in &mut self.anchors {
            anchor.translate(delta);
        }
    }

    /// Apply an image-space transform to every anchor and handle
    pub fn transform(&mut self, affine: Affine) {
        for anchor in &mut self.anchors {
            anchor.transform(affine);
        }
        if let Some(moving) = &mut self.moving_point {
            moving.im = affine * moving.im;
        }
    }

    /// Merge adjacent anchors that sit on top of each other with retracted
    /// connecting handles. The first of each pair survives and takes over
    /// the outgoing handle of the second.
    pub fn merge_close_anchors(&mut self, tol: &Tolerances) {
        if self.anchors.len() < 2 {
            return;
        }
        let mut merged: Vec<AnchorPoint> = Vec::with_capacity(self.anchors.len());
        for anchor in self.anchors.drain(..) {
            if let Some(kept) = merged.last_mut() {
                if can_merge(kept, &anchor, tol) {
                    adopt_ctrl_out(kept, &anchor);
                    continue;
                }
            }
            merged.push(anchor);
        }

        if self.closed && merged.len() >= 2 {
            let last = merged.len() - 1;
            if can_merge(&merged[last], &merged[0], tol) {
                if let Some(mut kept) = merged.pop() {
                    adopt_ctrl_out(&mut kept, &merged[0]);
                    merged[0] = kept;
                }
            }
        }
        self.anchors = merged;
    }

    pub fn set_heuristic_types(&mut self, tol: &Tolerances) {
        for anchor in &mut self.anchors {
            anchor.set_heuristic_type(tol);
        }
    }

    // ===== Coordinate spaces =====

    /// Recompute component coordinates after a view change
    pub fn sync_co(&mut self, view: &dyn ViewTransform) {
        for anchor in &mut self.anchors {
            anchor.sync_co(view);
        }
        if let Some(moving) = &mut self.moving_point {
            moving.sync_co(view);
        }
    }

    /// Apply an image transform (crop, rotate, resize) and resync
    pub fn im_coords_changed(&mut self, affine: Affine, view: &dyn ViewTransform) {
        self.transform(affine);
        self.sync_co(view);
    }

    // ===== Geometry =====

    /// The segments between consecutive anchors, including the closing
    /// segment of a closed subpath
    pub fn segments(&self, space: CoordSpace) -> Vec<SegmentInfo> {
        let n = self.anchors.len();
        if n < 2 {
            return Vec::new();
        }
        let count = if self.closed { n } else { n - 1 };
        (0..count)
            .map(|i| {
                let j = (i + 1) % n;
                SegmentInfo {
                    segment: segment_between(&self.anchors[i], &self.anchors[j], space),
                    start_index: i,
                    end_index: j,
                }
            })
            .collect()
    }

    /// Renderable outline. With `rubber_band` the preview curve to the
    /// moving point is appended.
    pub fn to_shape(&self, space: CoordSpace, rubber_band: bool) -> BezPath {
        let mut bez = BezPath::new();
        let Some(first) = self.anchors.first() else {
            return bez;
        };
        bez.move_to(space.pick(&first.pos));
        for info in self.segments(space) {
            bez.push(info.segment.to_path_el());
        }
        if rubber_band && !self.closed {
            if let (Some(moving), Some(last)) = (&self.moving_point, self.anchors.last()) {
                let target = space.pick(moving);
                bez.curve_to(space.pick(&last.ctrl_out().pos), target, target);
            }
        }
        if self.closed {
            bez.close_path();
        }
        bez
    }

    /// Tight image-space bounds of the outline
    pub fn bounding_box(&self) -> Option<Rect> {
        if self.anchors.is_empty() {
            return None;
        }
        Some(self.to_shape(CoordSpace::Image, false).bounding_box())
    }

    /// Component-space bounds of every anchor and handle, for repainting
    pub fn co_handle_bounds(&self) -> Option<Rect> {
        let mut points = self.anchors.iter().flat_map(|a| {
            [a.pos.co, a.ctrl_in().pos.co, a.ctrl_out().pos.co]
        });
        let first = points.next()?;
        Some(points.fold(Rect::from_points(first, first), |r, p| r.union_pt(p)))
    }

    /// Hit test anchors and handles in component space
    pub fn find_handle(&self, co_pos: Point, alt: bool, radius: f64) -> Option<(usize, HandlePart)> {
        self.anchors
            .iter()
            .enumerate()
            .find_map(|(i, anchor)| anchor.hit_test(co_pos, alt, radius).map(|part| (i, part)))
    }

    pub fn check_consistency(&self) -> Result<(), PathError> {
        if self.anchors.is_empty() {
            return Err(PathError::EmptySubPath(self.id));
        }
        if self.closed && !self.finished {
            return Err(PathError::ClosedNotFinished(self.id));
        }
        if self.finished && self.moving_point.is_some() {
            return Err(PathError::FinishedWithMovingPoint(self.id));
        }
        for (index, anchor) in self.anchors.iter().enumerate() {
            if !anchor.is_finite() {
                return Err(PathError::NonFiniteCoordinate { id: self.id, index });
            }
            if !anchor.remembered_distances_valid() {
                return Err(PathError::InvalidRememberedDistance { id: self.id, index });
            }
        }
        Ok(())
    }

    /// Copy for snapshots: same id and geometry, no moving point
    pub fn deep_copy(&self) -> SubPath {
        SubPath {
            id: self.id,
            anchors: self.anchors.clone(),
            moving_point: None,
            closed: self.closed,
            finished: self.finished,
        }
    }

    pub(crate) fn from_parts(anchors: Vec<AnchorPoint>, closed: bool, finished: bool) -> Self {
        let mut subpath = Self::new();
        subpath.anchors = anchors;
        subpath.closed = closed;
        subpath.finished = finished || closed;
        subpath
    }
}

impl Default for SubPath {
    fn default() -> Self {
        Self::new()
    }
}

fn segment_between(prev: &AnchorPoint, curr: &AnchorPoint, space: CoordSpace) -> Segment {
    let p0 = space.pick(&prev.pos);
    let p3 = space.pick(&curr.pos);
    if prev.is_retracted(HandleSide::Out) && curr.is_retracted(HandleSide::In) {
        Segment::Line(Line::new(p0, p3))
    } else {
        let p1 = space.pick(&prev.ctrl_out().pos);
        let p2 = space.pick(&curr.ctrl_in().pos);
        Segment::Cubic(CubicBez::new(p0, p1, p2, p3))
    }
}

fn can_merge(current: &AnchorPoint, next: &AnchorPoint, tol: &Tolerances) -> bool {
    current.pos.same_position_as(&next.pos, tol.merge_distance)
        && current.is_retracted(HandleSide::Out)
        && next.is_retracted(HandleSide::In)
}

fn adopt_ctrl_out(kept: &mut AnchorPoint, absorbed: &AnchorPoint) {
    kept.set_ctrl_location_only(HandleSide::Out, absorbed.ctrl_out().pos.im);
    kept.remember_distances();
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    fn anchor(x: f64, y: f64) -> AnchorPoint {
        AnchorPoint::new(DualPoint::from_image(Point::new(x, y)))
    }

    fn square() -> SubPath {
        let mut sp = SubPath::starting_with(anchor(0.0, 0.0));
        sp.add_line(Point::new(100.0, 0.0));
        sp.add_line(Point::new(100.0, 100.0));
        sp.add_line(Point::new(0.0, 100.0));
        sp
    }

    fn positions(sp: &SubPath) -> Vec<Point> {
        sp.anchors().iter().map(AnchorPoint::im).collect()
    }

    #[test]
    fn open_subpath_shape_has_lines() {
        let sp = square();
        let shape = sp.to_shape(CoordSpace::Image, false);
        let els = shape.elements();
        assert_eq!(els.len(), 4);
        assert_eq!(els[0], PathEl::MoveTo(Point::new(0.0, 0.0)));
        assert!(els[1..].iter().all(|el| matches!(el, PathEl::LineTo(_))));
    }

    #[test]
    fn closed_subpath_emits_close_marker() {
        let mut sp = square();
        sp.close();
        assert!(sp.is_closed() && sp.is_finished());
        let shape = sp.to_shape(CoordSpace::Image, false);
        let els = shape.elements();
        assert_eq!(els.len(), 6);
        assert_eq!(els[4], PathEl::LineTo(Point::new(0.0, 0.0)));
        assert_eq!(els[5], PathEl::ClosePath);
    }

    #[test]
    fn visible_handle_makes_cubic_segment() {
        let mut sp = SubPath::starting_with(anchor(0.0, 0.0));
        sp.add_line(Point::new(100.0, 0.0));
        if let Some(first) = sp.anchor_mut(0) {
            first.set_ctrl_location(HandleSide::Out, Point::new(30.0, 40.0));
        }
        let segs = sp.segments(CoordSpace::Image);
        assert_eq!(segs.len(), 1);
        assert!(matches!(segs[0].segment, Segment::Cubic(_)));
    }

    #[test]
    fn rubber_band_appends_preview_curve() {
        let mut sp = SubPath::starting_with(anchor(0.0, 0.0));
        sp.set_moving_point(DualPoint::from_image(Point::new(20.0, 0.0)));
        assert_eq!(sp.to_shape(CoordSpace::Image, true).elements().len(), 2);
        assert_eq!(sp.to_shape(CoordSpace::Image, false).elements().len(), 1);
    }

    #[test]
    fn finish_drops_moving_point() {
        let mut sp = SubPath::starting_with(anchor(0.0, 0.0));
        sp.set_moving_point(DualPoint::from_image(Point::new(20.0, 0.0)));
        sp.finish();
        assert!(sp.moving_point().is_none());
        assert!(sp.check_consistency().is_ok());
    }

    #[test]
    fn quad_import_creates_cubic() {
        let mut sp = SubPath::starting_with(anchor(0.0, 0.0));
        sp.add_quad_curve(Point::new(50.0, 100.0), Point::new(100.0, 0.0));
        assert_eq!(sp.len(), 2);
        let out = sp.anchors()[0].ctrl_out().pos.im;
        assert!((out.x - 100.0 / 3.0).abs() < 1e-9);
        assert!((out.y - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn merge_removes_overlapping_neighbours() {
        let mut sp = SubPath::starting_with(anchor(0.0, 0.0));
        sp.add_line(Point::new(0.5, 0.2));
        sp.add_line(Point::new(50.0, 0.0));
        sp.merge_close_anchors(&Tolerances::default());
        assert_eq!(positions(&sp), vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0)]);
    }

    #[test]
    fn merge_wraparound_keeps_last_as_new_first() {
        let mut sp = SubPath::starting_with(anchor(0.0, 0.0));
        sp.add_line(Point::new(100.0, 0.0));
        sp.add_line(Point::new(100.0, 100.0));
        sp.add_line(Point::new(0.3, 0.3));
        sp.close();
        sp.merge_close_anchors(&Tolerances::default());
        assert_eq!(sp.len(), 3);
        assert_eq!(sp.anchors()[0].im(), Point::new(0.3, 0.3));
    }

    #[test]
    fn merge_is_idempotent() {
        let mut sp = SubPath::starting_with(anchor(0.0, 0.0));
        sp.add_line(Point::new(0.5, 0.0));
        sp.add_line(Point::new(0.9, 0.1));
        sp.add_line(Point::new(40.0, 40.0));
        sp.add_line(Point::new(80.0, 0.0));
        sp.add_line(Point::new(0.2, 0.4));
        sp.close();
        let tol = Tolerances::default();
        sp.merge_close_anchors(&tol);
        let once = positions(&sp);
        sp.merge_close_anchors(&tol);
        assert_eq!(positions(&sp), once);
    }

    #[test]
    fn reverse_closed_keeps_first_anchor() {
        let mut sp = square();
        sp.close();
        sp.reverse();
        assert_eq!(
            positions(&sp),
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 100.0),
                Point::new(100.0, 100.0),
                Point::new(100.0, 0.0)
            ]
        );
    }

    #[test]
    fn split_open_subpath_in_two() {
        let mut sp = square();
        sp.finish();
        let tail = sp.split_at(1).ok().flatten();
        let Some(tail) = tail else {
            panic!("expected a tail subpath");
        };
        assert_eq!(sp.len(), 2);
        assert_eq!(tail.len(), 3);
        assert_eq!(tail.anchors()[0].im(), Point::new(100.0, 0.0));
        assert!(tail.is_finished());
    }

    #[test]
    fn split_closed_subpath_opens_it() {
        let mut sp = square();
        sp.close();
        assert!(matches!(sp.split_at(2), Ok(None)));
        assert!(!sp.is_closed());
        assert_eq!(sp.len(), 5);
        assert_eq!(sp.anchors()[0].im(), Point::new(100.0, 100.0));
        assert_eq!(sp.anchors()[4].im(), Point::new(100.0, 100.0));
    }

    #[test]
    fn deep_copy_keeps_id_and_drops_moving_point() {
        let mut sp = square();
        sp.set_moving_point(DualPoint::from_image(Point::new(5.0, 5.0)));
        let copy = sp.deep_copy();
        assert_eq!(copy.id(), sp.id());
        assert!(copy.moving_point().is_none());
        assert_eq!(positions(&copy), positions(&sp));
    }

    #[test]
    fn consistency_flags_closed_unfinished() {
        let mut sp = square();
        sp.close();
        sp.undo_finishing();
        assert!(matches!(sp.check_consistency(), Err(PathError::ClosedNotFinished(_))));
    }

    #[test]
    fn can_close_only_with_two_anchors() {
        let mut sp = SubPath::starting_with(anchor(0.0, 0.0));
        assert!(!sp.can_close_at(Point::new(1.0, 1.0), 5.0));
        sp.add_line(Point::new(50.0, 0.0));
        assert!(sp.can_close_at(Point::new(1.0, 1.0), 5.0));
        assert!(!sp.can_close_at(Point::new(10.0, 1.0), 5.0));
    }

    #[test]
    fn delete_anchor_out_of_range() {
        let mut sp = square();
        assert!(matches!(sp.delete_anchor(9), Err(PathError::AnchorIndex { index: 9, len: 4 })));
        assert!(sp.delete_anchor(3).is_ok());
        assert_eq!(sp.len(), 3);
    }
}
