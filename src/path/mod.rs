// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Composite Bézier paths as edited by the pen tool.
//!
//! A `Path` is an ordered list of `SubPath`s, one of which is active. A
//! `SubPath` is an ordered list of `AnchorPoint`s, each owning an incoming
//! and an outgoing control handle. Geometry lives in image space; every
//! point also caches its component-space position for hit testing.

pub mod anchor;
pub mod build_state;
pub mod persist;
pub mod point;
pub mod segment;
pub mod subpath;

pub use anchor::{AnchorPoint, ControlPoint, HandlePart, HandleSide, HandleType};
pub use build_state::BuildState;
pub use persist::{AnchorData, PathData, PointData, SubPathData};
pub use point::DualPoint;
pub use segment::{Segment, SegmentInfo, quad_to_cubic};
pub use subpath::SubPath;

use crate::editing::ViewTransform;
use crate::error::{PathError, report_violation};
use crate::settings;
use kurbo::{Affine, BezPath, PathEl, Point, Rect, Vec2};
use serde::Deserialize;

/// Thresholds used when classifying and merging imported anchors
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub symmetry: f64,
    pub collinearity: f64,
    pub merge_distance: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            symmetry: settings::path::SYMMETRY_THRESHOLD,
            collinearity: settings::path::COLLINEARITY_THRESHOLD,
            merge_distance: settings::path::MERGE_DISTANCE,
        }
    }
}

/// Which coordinates of a `DualPoint` to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordSpace {
    Image,
    Component,
}

impl CoordSpace {
    pub fn pick(self, p: &DualPoint) -> Point {
        match self {
            CoordSpace::Image => p.im,
            CoordSpace::Component => p.co,
        }
    }
}

/// Address of one anchor or handle in a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleRef {
    pub subpath: usize,
    pub anchor: usize,
    pub part: HandlePart,
}

/// Result of deleting an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    AnchorRemoved,
    /// The subpath fell below two anchors and was removed
    SubPathRemoved,
    /// The last subpath was removed
    PathEmptied,
}

#[derive(Debug, Clone, Default)]
pub struct Path {
    subpaths: Vec<SubPath>,
    active: usize,
    build_state: BuildState,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    pub fn subpath(&self, index: usize) -> Option<&SubPath> {
        self.subpaths.get(index)
    }

    pub fn subpath_mut(&mut self, index: usize) -> Option<&mut SubPath> {
        self.subpaths.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.subpaths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_subpath(&self) -> Option<&SubPath> {
        self.subpaths.get(self.active)
    }

    pub fn active_subpath_mut(&mut self) -> Option<&mut SubPath> {
        self.subpaths.get_mut(self.active)
    }

    pub fn set_active(&mut self, index: usize) {
        debug_assert!(index < self.subpaths.len());
        if index < self.subpaths.len() {
            self.active = index;
        }
    }

    pub fn build_state(&self) -> BuildState {
        self.build_state
    }

    pub fn set_build_state(&mut self, state: BuildState) {
        if state != self.build_state {
            tracing::debug!("build state {:?} -> {:?}", self.build_state, state);
        }
        self.build_state = state;
    }

    /// Start a new subpath with `first` and make it active
    pub fn start_new_subpath(&mut self, first: AnchorPoint) -> &mut SubPath {
        self.subpaths.push(SubPath::starting_with(first));
        self.active = self.subpaths.len() - 1;
        &mut self.subpaths[self.active]
    }

    /// Finish the active subpath if it is still being built
    pub fn finish_active(&mut self) -> bool {
        match self.active_subpath_mut() {
            Some(sp) if !sp.is_finished() => {
                sp.finish();
                true
            }
            _ => false,
        }
    }

    /// Append all subpaths of `other`; the last appended becomes active
    pub fn append(&mut self, other: Path) {
        if other.subpaths.is_empty() {
            return;
        }
        self.subpaths.extend(other.subpaths);
        self.active = self.subpaths.len() - 1;
    }

    pub fn delete_subpath(&mut self, index: usize) -> Result<DeleteOutcome, PathError> {
        if index >= self.subpaths.len() {
            return Err(PathError::SubPathIndex(index));
        }
        self.subpaths.remove(index);
        if self.active > index || self.active >= self.subpaths.len() {
            self.active = self.active.saturating_sub(1);
        }
        if self.subpaths.is_empty() {
            self.build_state = BuildState::Idle;
            return Ok(DeleteOutcome::PathEmptied);
        }
        Ok(DeleteOutcome::SubPathRemoved)
    }

    /// Delete one anchor, removing its subpath when fewer than two remain
    pub fn delete_anchor(&mut self, subpath: usize, anchor: usize) -> Result<DeleteOutcome, PathError> {
        let sp = self
            .subpaths
            .get_mut(subpath)
            .ok_or(PathError::SubPathIndex(subpath))?;
        sp.delete_anchor(anchor)?;
        if sp.is_degenerate() {
            return self.delete_subpath(subpath);
        }
        Ok(DeleteOutcome::AnchorRemoved)
    }

    /// Split a subpath at one of its anchors. An open subpath is cut in
    /// two, the tail becoming a new active subpath; a closed one is opened.
    /// Returns false when the anchor is an open end and nothing changed.
    pub fn split_subpath(&mut self, subpath: usize, anchor: usize) -> Result<bool, PathError> {
        let sp = self
            .subpaths
            .get_mut(subpath)
            .ok_or(PathError::SubPathIndex(subpath))?;
        let was_closed = sp.is_closed();
        match sp.split_at(anchor)? {
            Some(tail) => {
                self.subpaths.insert(subpath + 1, tail);
                self.active = subpath + 1;
                Ok(true)
            }
            None => Ok(was_closed),
        }
    }

    pub fn reverse(&mut self) {
        for sp in &mut self.subpaths {
            sp.reverse();
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        for sp in &mut self.subpaths {
            sp.translate(delta);
        }
    }

    pub fn transform(&mut self, affine: Affine) {
        for sp in &mut self.subpaths {
            sp.transform(affine);
        }
    }

    // ===== Coordinate spaces =====

    /// Recompute component coordinates after a zoom, pan or rotation
    pub fn sync_co(&mut self, view: &dyn ViewTransform) {
        for sp in &mut self.subpaths {
            sp.sync_co(view);
        }
    }

    /// Follow an image geometry change such as a crop or resize
    pub fn im_coords_changed(&mut self, affine: Affine, view: &dyn ViewTransform) {
        for sp in &mut self.subpaths {
            sp.im_coords_changed(affine, view);
        }
    }

    // ===== Handles =====

    /// Topmost handle under `co_pos`, searching the active subpath first
    pub fn find_handle_at(&self, co_pos: Point, alt: bool, radius: f64) -> Option<HandleRef> {
        let order = std::iter::once(self.active).chain((0..self.subpaths.len()).filter(|&i| i != self.active));
        for index in order {
            let Some(sp) = self.subpaths.get(index) else {
                continue;
            };
            if let Some((anchor, part)) = sp.find_handle(co_pos, alt, radius) {
                return Some(HandleRef {
                    subpath: index,
                    anchor,
                    part,
                });
            }
        }
        None
    }

    pub fn anchor(&self, handle: HandleRef) -> Option<&AnchorPoint> {
        self.subpaths.get(handle.subpath)?.anchor(handle.anchor)
    }

    pub fn anchor_mut(&mut self, handle: HandleRef) -> Option<&mut AnchorPoint> {
        self.subpaths.get_mut(handle.subpath)?.anchor_mut(handle.anchor)
    }

    pub fn handle_im(&self, handle: HandleRef) -> Option<Point> {
        self.anchor(handle).map(|a| a.part_im(handle.part))
    }

    pub fn handle_co(&self, handle: HandleRef) -> Option<Point> {
        let anchor = self.anchor(handle)?;
        Some(match handle.part {
            HandlePart::Anchor => anchor.pos.co,
            HandlePart::Ctrl(side) => anchor.ctrl(side).pos.co,
        })
    }

    /// Move a handle, honoring the constraint of its anchor
    pub fn set_handle_location(
        &mut self,
        handle: HandleRef,
        im: Point,
        constrained_from: Option<Point>,
        view: &dyn ViewTransform,
    ) -> bool {
        let Some(anchor) = self.anchor_mut(handle) else {
            tracing::warn!("moving a handle that does not exist: {handle:?}");
            return false;
        };
        anchor.set_part_location(handle.part, im, constrained_from);
        anchor.sync_co(view);
        true
    }

    // ===== Type policies =====

    pub fn set_heuristic_types(&mut self, tol: &Tolerances) {
        for sp in &mut self.subpaths {
            sp.set_heuristic_types(tol);
        }
    }

    pub fn merge_close_anchors(&mut self, tol: &Tolerances) {
        for sp in &mut self.subpaths {
            sp.merge_close_anchors(tol);
        }
    }

    /// Prepare handle types for node editing.
    ///
    /// Anchors dragged out with the pen become SMOOTH so their handles can
    /// be adjusted independently in length; imported anchors get a type
    /// guessed from their geometry.
    pub fn change_types_for_editing(&mut self, built_interactively: bool, tol: &Tolerances) {
        for sp in &mut self.subpaths {
            for index in 0..sp.len() {
                let Some(anchor) = sp.anchor_mut(index) else {
                    continue;
                };
                if !built_interactively {
                    anchor.set_heuristic_type(tol);
                } else if !(anchor.is_retracted(HandleSide::In) && anchor.is_retracted(HandleSide::Out)) {
                    anchor.change_type_from_sym_to_smooth();
                }
            }
        }
    }

    // ===== Geometry =====

    pub fn to_shape(&self, space: CoordSpace, rubber_band: bool) -> BezPath {
        let mut bez = BezPath::new();
        for (i, sp) in self.subpaths.iter().enumerate() {
            let show_band = rubber_band && i == self.active && self.build_state.shows_rubber_band();
            for el in sp.to_shape(space, show_band).elements() {
                bez.push(*el);
            }
        }
        bez
    }

    pub fn to_image_shape(&self) -> BezPath {
        self.to_shape(CoordSpace::Image, false)
    }

    pub fn to_component_shape(&self, rubber_band: bool) -> BezPath {
        self.to_shape(CoordSpace::Component, rubber_band)
    }

    pub fn bounding_box(&self) -> Option<Rect> {
        self.subpaths
            .iter()
            .filter_map(SubPath::bounding_box)
            .reduce(|a, b| a.union(b))
    }

    /// Component-space area covering every anchor and handle
    pub fn co_repaint_bounds(&self) -> Option<Rect> {
        self.subpaths
            .iter()
            .filter_map(SubPath::co_handle_bounds)
            .reduce(|a, b| a.union(b))
    }

    /// Import an outline (image space). Overlapping anchors are merged and
    /// handle types are inferred from the geometry.
    pub fn from_bez_path(bez: &BezPath, view: &dyn ViewTransform, tol: &Tolerances) -> Path {
        let mut done: Vec<SubPath> = Vec::new();
        let mut current: Option<SubPath> = None;

        for el in bez.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    if let Some(sp) = current.take() {
                        done.push(sp);
                    }
                    current = Some(SubPath::starting_with(AnchorPoint::new(DualPoint::from_image(p))));
                }
                PathEl::LineTo(p) => match &mut current {
                    Some(sp) => sp.add_line(p),
                    None => current = Some(SubPath::starting_with(AnchorPoint::new(DualPoint::from_image(p)))),
                },
                PathEl::QuadTo(c, p) => {
                    if let Some(sp) = &mut current {
                        sp.add_quad_curve(c, p);
                    }
                }
                PathEl::CurveTo(c1, c2, p) => {
                    if let Some(sp) = &mut current {
                        sp.add_cubic_curve(c1, c2, p);
                    }
                }
                PathEl::ClosePath => {
                    if let Some(mut sp) = current.take() {
                        if !sp.is_degenerate() {
                            sp.close();
                        }
                        done.push(sp);
                    }
                }
            }
        }
        if let Some(sp) = current.take() {
            done.push(sp);
        }

        let mut path = Path::new();
        for mut sp in done.into_iter().filter(|sp| !sp.is_degenerate()) {
            sp.finish();
            sp.merge_close_anchors(tol);
            if sp.is_degenerate() {
                continue;
            }
            sp.set_heuristic_types(tol);
            sp.sync_co(view);
            path.subpaths.push(sp);
        }
        path.active = path.subpaths.len().saturating_sub(1);
        path
    }

    // ===== Consistency =====

    pub fn check_consistency(&self) -> Result<(), PathError> {
        if !self.subpaths.is_empty() && self.active >= self.subpaths.len() {
            return Err(PathError::ActiveIndex {
                active: self.active,
                len: self.subpaths.len(),
            });
        }
        for sp in &self.subpaths {
            sp.check_consistency()?;
        }
        Ok(())
    }

    /// Report the first inconsistency, if any
    pub fn assert_consistent(&self) {
        if let Err(err) = self.check_consistency() {
            report_violation(&err);
        }
    }

    /// Snapshot copy. The build state is reset and moving points dropped.
    pub fn deep_copy(&self) -> Path {
        Path {
            subpaths: self.subpaths.iter().map(SubPath::deep_copy).collect(),
            active: self.active,
            build_state: BuildState::Idle,
        }
    }

    pub(crate) fn from_subpaths(subpaths: Vec<SubPath>) -> Path {
        let active = subpaths.len().saturating_sub(1);
        Path {
            subpaths,
            active,
            build_state: BuildState::Idle,
        }
    }
}
