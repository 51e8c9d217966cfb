// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Anchor points and their two control handles.
//!
//! An `AnchorPoint` owns both of its `ControlPoint`s by value, so the
//! anchor/sibling relationships are plain field access. Every move of a
//! control handle goes through `AnchorPoint::set_ctrl_location`, which asks
//! the anchor's `HandleType` to reposition the sibling handle.

use super::Tolerances;
use super::point::{DualPoint, constrain_to_45};
use crate::editing::ViewTransform;
use crate::settings;
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Constraint policy between the two handles of an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandleType {
    /// Handles are mirrored through the anchor
    Symmetric,
    /// Handles stay collinear, each keeping its own length
    Smooth,
    /// Handles move independently
    Cusp,
}

impl HandleType {
    /// Reposition `sibling` after its partner moved to `moved`.
    fn place_sibling(self, moved: Point, anchor: Point, sibling: &mut ControlPoint) {
        match self {
            HandleType::Symmetric => {
                sibling.pos.im = anchor - (moved - anchor);
            }
            HandleType::Smooth => {
                let v = moved - anchor;
                // Retracted partner has no direction to follow
                if v.hypot2() == 0.0 {
                    return;
                }
                let angle = PI + v.atan2();
                sibling.pos.im = anchor + Vec2::from_angle(angle) * sibling.remembered_dist;
            }
            HandleType::Cusp => {}
        }
    }
}

/// Which of an anchor's two control handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleSide {
    In,
    Out,
}

impl HandleSide {
    pub fn sibling(self) -> Self {
        match self {
            HandleSide::In => HandleSide::Out,
            HandleSide::Out => HandleSide::In,
        }
    }
}

/// The part of an anchor hit by the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlePart {
    Anchor,
    Ctrl(HandleSide),
}

/// A control handle of an anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub pos: DualPoint,
    /// Distance to the anchor, read only under the SMOOTH policy
    remembered_dist: f64,
}

impl ControlPoint {
    fn retracted_at(pos: DualPoint) -> Self {
        Self {
            pos,
            remembered_dist: 0.0,
        }
    }

    pub fn remembered_dist(&self) -> f64 {
        self.remembered_dist
    }
}

/// An on-curve point with an incoming and an outgoing control handle
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorPoint {
    pub pos: DualPoint,
    ctrl_in: ControlPoint,
    ctrl_out: ControlPoint,
    handle_type: HandleType,
}

impl AnchorPoint {
    /// A symmetric anchor with both handles retracted onto it
    pub fn new(pos: DualPoint) -> Self {
        Self {
            pos,
            ctrl_in: ControlPoint::retracted_at(pos),
            ctrl_out: ControlPoint::retracted_at(pos),
            handle_type: HandleType::Symmetric,
        }
    }

    pub fn at(im: Point, view: &dyn ViewTransform) -> Self {
        Self::new(DualPoint::new(im, view))
    }

    /// Image-space position
    pub fn im(&self) -> Point {
        self.pos.im
    }

    pub fn ctrl(&self, side: HandleSide) -> &ControlPoint {
        match side {
            HandleSide::In => &self.ctrl_in,
            HandleSide::Out => &self.ctrl_out,
        }
    }

    fn ctrl_mut(&mut self, side: HandleSide) -> &mut ControlPoint {
        match side {
            HandleSide::In => &mut self.ctrl_in,
            HandleSide::Out => &mut self.ctrl_out,
        }
    }

    pub fn ctrl_in(&self) -> &ControlPoint {
        &self.ctrl_in
    }

    pub fn ctrl_out(&self) -> &ControlPoint {
        &self.ctrl_out
    }

    pub fn handle_type(&self) -> HandleType {
        self.handle_type
    }

    /// Change the constraint policy. Switching to SMOOTH snapshots both
    /// handle lengths.
    pub fn set_type(&mut self, handle_type: HandleType) {
        self.handle_type = handle_type;
        if handle_type == HandleType::Smooth {
            self.remember_distances();
        }
    }

    pub fn change_type_from_sym_to_smooth(&mut self) {
        if self.handle_type == HandleType::Symmetric {
            self.set_type(HandleType::Smooth);
        }
    }

    /// Move a control handle, then let the handle type update its sibling
    pub fn set_ctrl_location(&mut self, side: HandleSide, im: Point) {
        self.ctrl_mut(side).pos.im = im;
        let anchor = self.pos.im;
        let handle_type = self.handle_type;
        handle_type.place_sibling(im, anchor, self.ctrl_mut(side.sibling()));
    }

    /// Move a control handle with its direction snapped to 45° steps
    pub fn set_ctrl_location_constrained(&mut self, side: HandleSide, im: Point) {
        let snapped = constrain_to_45(self.pos.im, im);
        self.set_ctrl_location(side, snapped);
    }

    /// Move a control handle without touching its sibling
    pub fn set_ctrl_location_only(&mut self, side: HandleSide, im: Point) {
        self.ctrl_mut(side).pos.im = im;
    }

    /// Move the anchor, carrying both handles along
    pub fn set_location(&mut self, im: Point) {
        let delta = im - self.pos.im;
        self.translate(delta);
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.pos.translate(delta);
        self.ctrl_in.pos.translate(delta);
        self.ctrl_out.pos.translate(delta);
    }

    /// Apply an image-space transform to the anchor and both handles.
    ///
    /// Each point is mapped on its own; handle lengths may change, so the
    /// SMOOTH cache is refreshed afterwards.
    pub fn transform(&mut self, affine: Affine) {
        self.pos.im = affine * self.pos.im;
        self.ctrl_in.pos.im = affine * self.ctrl_in.pos.im;
        self.ctrl_out.pos.im = affine * self.ctrl_out.pos.im;
        self.remember_distances();
    }

    pub fn sync_co(&mut self, view: &dyn ViewTransform) {
        self.pos.sync_co(view);
        self.ctrl_in.pos.sync_co(view);
        self.ctrl_out.pos.sync_co(view);
    }

    pub fn is_retracted(&self, side: HandleSide) -> bool {
        self.ctrl(side)
            .pos
            .same_position_as(&self.pos, settings::path::RETRACTION_TOLERANCE)
    }

    /// Put both handles back onto the anchor
    pub fn retract_handles(&mut self) {
        let pos = self.pos;
        self.ctrl_in = ControlPoint::retracted_at(pos);
        self.ctrl_out = ControlPoint::retracted_at(pos);
        self.handle_type = HandleType::Symmetric;
    }

    pub fn remember_dist_from_anchor(&mut self, side: HandleSide) {
        let anchor = self.pos.im;
        let ctrl = self.ctrl_mut(side);
        ctrl.remembered_dist = ctrl.pos.im.distance(anchor);
    }

    pub fn remember_distances(&mut self) {
        self.remember_dist_from_anchor(HandleSide::In);
        self.remember_dist_from_anchor(HandleSide::Out);
    }

    /// Prepare a control handle for an alt-drag: a retracted handle drags
    /// out as a symmetric pair, a visible one breaks loose as a cusp.
    pub fn break_or_drag_out(&mut self, side: HandleSide) {
        if self.is_retracted(side) {
            self.set_type(HandleType::Symmetric);
        } else {
            self.set_type(HandleType::Cusp);
        }
    }

    /// Infer the handle type from the current handle geometry
    pub fn set_heuristic_type(&mut self, tol: &Tolerances) {
        let in_retracted = self.is_retracted(HandleSide::In);
        let out_retracted = self.is_retracted(HandleSide::Out);
        if in_retracted && out_retracted {
            self.set_type(HandleType::Symmetric);
            return;
        }
        if in_retracted || out_retracted {
            self.set_type(HandleType::Cusp);
            return;
        }

        let d_out = self.ctrl_out.pos.im - self.pos.im;
        let d_in = self.ctrl_in.pos.im - self.pos.im;
        if (d_out.x + d_in.x).abs() < tol.symmetry && (d_out.y + d_in.y).abs() < tol.symmetry {
            self.set_type(HandleType::Symmetric);
        } else if d_out.cross(d_in).abs() < tol.collinearity && d_out.dot(d_in) < 0.0 {
            self.set_type(HandleType::Smooth);
        } else {
            self.set_type(HandleType::Cusp);
        }
    }

    /// Hit test in component space.
    ///
    /// With alt held the handles take priority over the anchor, so a
    /// retracted handle can be pulled out of it.
    pub fn hit_test(&self, co_pos: Point, alt: bool, radius: f64) -> Option<HandlePart> {
        let out_hit = self.ctrl_out.pos.handle_contains(co_pos, radius);
        let in_hit = self.ctrl_in.pos.handle_contains(co_pos, radius);
        let anchor_hit = self.pos.handle_contains(co_pos, radius);
        if alt {
            if out_hit {
                return Some(HandlePart::Ctrl(HandleSide::Out));
            }
            if in_hit {
                return Some(HandlePart::Ctrl(HandleSide::In));
            }
            return anchor_hit.then_some(HandlePart::Anchor);
        }
        if anchor_hit {
            Some(HandlePart::Anchor)
        } else if out_hit {
            Some(HandlePart::Ctrl(HandleSide::Out))
        } else if in_hit {
            Some(HandlePart::Ctrl(HandleSide::In))
        } else {
            None
        }
    }

    /// Image position of one part of this anchor
    pub fn part_im(&self, part: HandlePart) -> Point {
        match part {
            HandlePart::Anchor => self.pos.im,
            HandlePart::Ctrl(side) => self.ctrl(side).pos.im,
        }
    }

    /// Move one part of this anchor, honoring the handle constraints
    pub fn set_part_location(&mut self, part: HandlePart, im: Point, constrained_from: Option<Point>) {
        match (part, constrained_from) {
            (HandlePart::Anchor, None) => self.set_location(im),
            (HandlePart::Anchor, Some(origin)) => self.set_location(constrain_to_45(origin, im)),
            (HandlePart::Ctrl(side), None) => self.set_ctrl_location(side, im),
            (HandlePart::Ctrl(side), Some(_)) => self.set_ctrl_location_constrained(side, im),
        }
    }

    /// Swap the roles of the two handles (used when reversing a subpath)
    pub fn swap_handles(&mut self) {
        std::mem::swap(&mut self.ctrl_in, &mut self.ctrl_out);
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.ctrl_in.pos.is_finite() && self.ctrl_out.pos.is_finite()
    }

    pub(crate) fn remembered_distances_valid(&self) -> bool {
        [self.ctrl_in.remembered_dist, self.ctrl_out.remembered_dist]
            .iter()
            .all(|d| d.is_finite() && *d >= 0.0)
    }

    /// Build an anchor from persisted image-space positions
    pub(crate) fn from_parts(pos: DualPoint, ctrl_in: Point, ctrl_out: Point, handle_type: HandleType) -> Self {
        let mut anchor = Self::new(pos);
        anchor.ctrl_in.pos = DualPoint::from_image(ctrl_in);
        anchor.ctrl_out.pos = DualPoint::from_image(ctrl_out);
        anchor.handle_type = handle_type;
        anchor.remember_distances();
        anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn anchor_at(x: f64, y: f64) -> AnchorPoint {
        AnchorPoint::new(DualPoint::from_image(Point::new(x, y)))
    }

    #[test]
    fn new_anchor_is_symmetric_and_retracted() {
        let a = anchor_at(3.0, 4.0);
        assert_eq!(a.handle_type(), HandleType::Symmetric);
        assert!(a.is_retracted(HandleSide::In));
        assert!(a.is_retracted(HandleSide::Out));
    }

    #[test]
    fn symmetric_mirrors_sibling() {
        let mut a = anchor_at(50.0, 50.0);
        for p in [Point::new(70.0, 50.0), Point::new(-13.25, 8.5), Point::new(50.0, 49.0)] {
            a.set_ctrl_location(HandleSide::Out, p);
            let expected = Point::new(2.0 * 50.0 - p.x, 2.0 * 50.0 - p.y);
            assert_abs_diff_eq!(a.ctrl_in().pos.im.x, expected.x, epsilon = 1e-12);
            assert_abs_diff_eq!(a.ctrl_in().pos.im.y, expected.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn smooth_keeps_remembered_distance_without_drift() {
        let mut a = anchor_at(0.0, 0.0);
        a.set_ctrl_location(HandleSide::Out, Point::new(10.0, 0.0));
        a.set_type(HandleType::Smooth);
        let cached = a.ctrl_in().remembered_dist();
        assert_abs_diff_eq!(cached, 10.0, epsilon = 1e-12);

        for i in 0..500 {
            let angle = i as f64 * 0.37;
            let len = 5.0 + (i % 7) as f64;
            a.set_ctrl_location(HandleSide::Out, Point::ZERO + Vec2::from_angle(angle) * len);
        }
        assert_abs_diff_eq!(a.ctrl_in().pos.im.distance(a.im()), cached, epsilon = 1e-9);
    }

    #[test]
    fn smooth_sibling_points_opposite() {
        let mut a = anchor_at(0.0, 0.0);
        a.set_ctrl_location(HandleSide::Out, Point::new(10.0, 0.0));
        a.set_type(HandleType::Smooth);
        a.set_ctrl_location(HandleSide::Out, Point::new(0.0, 30.0));
        assert_abs_diff_eq!(a.ctrl_in().pos.im.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.ctrl_in().pos.im.y, -10.0, epsilon = 1e-9);
    }

    #[test]
    fn cusp_moves_independently() {
        let mut a = anchor_at(0.0, 0.0);
        a.set_ctrl_location(HandleSide::Out, Point::new(10.0, 0.0));
        a.set_type(HandleType::Cusp);
        let before = a.ctrl_in().pos;
        a.set_ctrl_location(HandleSide::Out, Point::new(3.0, 17.0));
        a.set_ctrl_location(HandleSide::Out, Point::new(-40.0, 2.0));
        assert_eq!(a.ctrl_in().pos, before);
    }

    #[test]
    fn moving_anchor_carries_handles() {
        let mut a = anchor_at(0.0, 0.0);
        a.set_ctrl_location(HandleSide::Out, Point::new(10.0, 5.0));
        a.set_location(Point::new(1.0, 1.0));
        assert_eq!(a.ctrl_out().pos.im, Point::new(11.0, 6.0));
        assert_eq!(a.ctrl_in().pos.im, Point::new(-9.0, -4.0));
    }

    #[test]
    fn transform_maps_each_point() {
        let mut a = anchor_at(1.0, 0.0);
        a.set_ctrl_location(HandleSide::Out, Point::new(2.0, 0.0));
        a.transform(Affine::rotate(PI / 2.0));
        assert_abs_diff_eq!(a.im().y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.ctrl_out().pos.im.y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.ctrl_in().pos.im.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn retract_resets_to_symmetric() {
        let mut a = anchor_at(0.0, 0.0);
        a.set_ctrl_location(HandleSide::Out, Point::new(10.0, 5.0));
        a.set_type(HandleType::Cusp);
        a.retract_handles();
        assert_eq!(a.handle_type(), HandleType::Symmetric);
        assert!(a.is_retracted(HandleSide::In));
        assert!(a.is_retracted(HandleSide::Out));
    }

    #[test]
    fn heuristic_type_classification() {
        let tol = Tolerances::default();

        let mut a = anchor_at(0.0, 0.0);
        a.set_heuristic_type(&tol);
        assert_eq!(a.handle_type(), HandleType::Symmetric);

        a.set_ctrl_location_only(HandleSide::Out, Point::new(10.0, 0.0));
        a.set_heuristic_type(&tol);
        assert_eq!(a.handle_type(), HandleType::Cusp);

        a.set_ctrl_location_only(HandleSide::In, Point::new(-10.5, 0.0));
        a.set_heuristic_type(&tol);
        assert_eq!(a.handle_type(), HandleType::Symmetric);

        a.set_ctrl_location_only(HandleSide::In, Point::new(-30.0, 0.0));
        a.set_heuristic_type(&tol);
        assert_eq!(a.handle_type(), HandleType::Smooth);

        a.set_ctrl_location_only(HandleSide::In, Point::new(0.0, 30.0));
        a.set_heuristic_type(&tol);
        assert_eq!(a.handle_type(), HandleType::Cusp);
    }

    #[test]
    fn break_or_drag_out_depends_on_retraction() {
        let mut a = anchor_at(0.0, 0.0);
        a.set_type(HandleType::Cusp);
        a.break_or_drag_out(HandleSide::Out);
        assert_eq!(a.handle_type(), HandleType::Symmetric);

        a.set_ctrl_location(HandleSide::Out, Point::new(10.0, 0.0));
        a.break_or_drag_out(HandleSide::In);
        assert_eq!(a.handle_type(), HandleType::Cusp);
    }

    #[test]
    fn alt_hit_prefers_controls() {
        let a = anchor_at(0.0, 0.0);
        assert_eq!(a.hit_test(Point::new(1.0, 1.0), false, 5.0), Some(HandlePart::Anchor));
        assert_eq!(
            a.hit_test(Point::new(1.0, 1.0), true, 5.0),
            Some(HandlePart::Ctrl(HandleSide::Out))
        );
        assert_eq!(a.hit_test(Point::new(20.0, 1.0), true, 5.0), None);
    }

    #[test]
    fn swap_handles_exchanges_positions() {
        let mut a = anchor_at(0.0, 0.0);
        a.set_ctrl_location(HandleSide::Out, Point::new(10.0, 0.0));
        a.swap_handles();
        assert_eq!(a.ctrl_in().pos.im, Point::new(10.0, 0.0));
        assert_eq!(a.ctrl_out().pos.im, Point::new(-10.0, 0.0));
    }
}
