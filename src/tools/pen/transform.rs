// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Pen transform mode: scale, rotate and move whole subpaths.
//!
//! Every subpath gets a box around its image-space bounds. The box keeps
//! its original rectangle plus the transform applied since, so the handles
//! follow rotations instead of snapping back to an axis-aligned box.

use crate::editing::{ArrowKey, EditSession, EditType, MouseDelegate, MouseEvent, ViewTransform, nudge_amount};
use crate::error::PathError;
use crate::path::{Path, SubPath};
use crate::settings;
use kurbo::{Affine, Point, Rect, Vec2};

/// Scales below this are clamped so the box transform stays invertible
const MIN_SCALE: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::NorthWest, Corner::NorthEast, Corner::SouthEast, Corner::SouthWest];

    fn opposite(self) -> Self {
        match self {
            Corner::NorthWest => Corner::SouthEast,
            Corner::NorthEast => Corner::SouthWest,
            Corner::SouthEast => Corner::NorthWest,
            Corner::SouthWest => Corner::NorthEast,
        }
    }

    fn of(self, rect: Rect) -> Point {
        match self {
            Corner::NorthWest => Point::new(rect.x0, rect.y0),
            Corner::NorthEast => Point::new(rect.x1, rect.y0),
            Corner::SouthEast => Point::new(rect.x1, rect.y1),
            Corner::SouthWest => Point::new(rect.x0, rect.y1),
        }
    }
}

/// The part of a transform box under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxHandle {
    Corner(Corner),
    Rotate,
    Body,
}

/// Transform box around one subpath
#[derive(Debug, Clone, PartialEq)]
pub struct TransformBox {
    subpath: usize,
    rect: Rect,
    affine: Affine,
}

impl TransformBox {
    pub fn new(subpath: usize, rect: Rect) -> Self {
        Self {
            subpath,
            rect,
            affine: Affine::IDENTITY,
        }
    }

    pub fn subpath(&self) -> usize {
        self.subpath
    }

    /// Transform applied since the box was created
    pub fn affine(&self) -> Affine {
        self.affine
    }

    pub fn corner_im(&self, corner: Corner) -> Point {
        self.affine * corner.of(self.rect)
    }

    pub fn center_im(&self) -> Point {
        self.affine * self.rect.center()
    }

    /// Component-space position of the rotate handle, above the top edge
    pub fn rotate_handle_co(&self, view: &dyn ViewTransform) -> Point {
        let top = view.image_to_component(self.affine * Point::new(self.rect.center().x, self.rect.y0));
        let center = view.image_to_component(self.center_im());
        let up = top - center;
        let dir = if up.hypot2() > 0.0 { up.normalize() } else { Vec2::new(0.0, -1.0) };
        top + dir * settings::handles::ROTATE_OFFSET
    }

    fn hit_handle(&self, co_pos: Point, view: &dyn ViewTransform, radius: f64) -> Option<BoxHandle> {
        let near = |p: Point| (p.x - co_pos.x).abs() <= radius && (p.y - co_pos.y).abs() <= radius;
        for corner in Corner::ALL {
            if near(view.image_to_component(self.corner_im(corner))) {
                return Some(BoxHandle::Corner(corner));
            }
        }
        near(self.rotate_handle_co(view)).then_some(BoxHandle::Rotate)
    }

    fn contains_im(&self, im: Point) -> bool {
        if self.affine.determinant().abs() < f64::EPSILON {
            return false;
        }
        self.rect.contains(self.affine.inverse() * im)
    }

    /// Incremental transform for dragging `handle` from `press_im` to
    /// `im`, relative to the box state at press time.
    fn drag_transform(&self, handle: BoxHandle, press_im: Point, im: Point, keep_aspect: bool) -> Affine {
        match handle {
            BoxHandle::Body => Affine::translate(im - press_im),
            BoxHandle::Rotate => {
                let center = self.center_im();
                let angle = (im - center).atan2() - (press_im - center).atan2();
                Affine::rotate_about(angle, center)
            }
            BoxHandle::Corner(corner) => {
                let pinned = corner.opposite().of(self.rect);
                let dragged = corner.of(self.rect);
                let local = self.affine.inverse() * im;
                let axis_scale = |to: f64, from: f64, pin: f64| {
                    let span = from - pin;
                    if span.abs() < f64::EPSILON {
                        return 1.0;
                    }
                    let s = (to - pin) / span;
                    if s.abs() < MIN_SCALE { MIN_SCALE.copysign(s) } else { s }
                };
                let mut sx = axis_scale(local.x, dragged.x, pinned.x);
                let mut sy = axis_scale(local.y, dragged.y, pinned.y);
                if keep_aspect {
                    let s = if sx.abs() > sy.abs() { sx } else { sy };
                    sx = s;
                    sy = s;
                }
                let local_scale = Affine::translate(pinned.to_vec2())
                    * Affine::scale_non_uniform(sx, sy)
                    * Affine::translate(-pinned.to_vec2());
                self.affine * local_scale * self.affine.inverse()
            }
        }
    }
}

/// A box drag in progress
#[derive(Debug, Clone)]
struct BoxDrag {
    index: usize,
    handle: BoxHandle,
    press_im: Point,
    /// Box and subpath as they were at press time
    start_box: TransformBox,
    reference: SubPath,
    before: Option<Path>,
}

#[derive(Debug, Clone, Default)]
pub struct PathTransformer {
    boxes: Vec<TransformBox>,
    drag: Option<BoxDrag>,
    last_active: Option<usize>,
    last_co: Point,
}

impl PathTransformer {
    /// One box per non-empty subpath
    pub fn for_path(path: &Path) -> Self {
        let boxes = path
            .subpaths()
            .iter()
            .enumerate()
            .filter_map(|(i, sp)| sp.bounding_box().map(|rect| TransformBox::new(i, rect)))
            .collect();
        Self {
            boxes,
            ..Self::default()
        }
    }

    pub fn boxes(&self) -> &[TransformBox] {
        &self.boxes
    }

    pub fn last_active(&self) -> Option<usize> {
        self.last_active
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Rebuild the boxes after the path changed outside this mode
    pub fn rebuild(&mut self, path: &Path) {
        *self = Self::for_path(path);
    }

    fn hit(&self, co_pos: Point, session: &EditSession) -> Option<(usize, BoxHandle)> {
        let radius = session.handle_radius();
        let handle_hit = self.boxes.iter().enumerate().find_map(|(i, b)| {
            b.hit_handle(co_pos, &session.viewport, radius)
                .map(|h| (i, h))
        });
        if handle_hit.is_some() {
            return handle_hit;
        }
        let im = session.to_image(co_pos);
        self.boxes
            .iter()
            .position(|b| b.contains_im(im))
            .map(|i| (i, BoxHandle::Body))
    }

    fn apply_drag(&mut self, event: MouseEvent, session: &mut EditSession) {
        let Some(drag) = &self.drag else {
            return;
        };
        let im = session.to_image(event.pos);
        let delta = drag
            .start_box
            .drag_transform(drag.handle, drag.press_im, im, event.mods.shift);

        let mut transformed = drag.reference.clone();
        transformed.transform(delta);
        transformed.sync_co(&session.viewport);
        let Some(slot) = session.path.as_mut().and_then(|p| p.subpath_mut(drag.start_box.subpath)) else {
            tracing::warn!("transformed subpath {} disappeared", drag.start_box.subpath);
            return;
        };
        *slot = transformed;

        if let Some(b) = self.boxes.get_mut(drag.index) {
            b.affine = delta * drag.start_box.affine;
        }
        session.repaint_path();
    }

    pub fn arrow_key(&mut self, key: ArrowKey, shift: bool, session: &mut EditSession) -> Result<(), PathError> {
        let index = self.last_active.ok_or(PathError::NoActiveHandle)?;
        let b = self.boxes.get_mut(index).ok_or(PathError::NoActiveHandle)?;
        session.nudge_subpath(b.subpath, key, shift)?;
        let delta = key.direction() * nudge_amount(shift);
        b.affine = Affine::translate(delta) * b.affine;
        Ok(())
    }

    pub fn mode_ended(&mut self, session: &mut EditSession) {
        self.cancel(session);
        self.boxes.clear();
        self.last_active = None;
    }
}

impl MouseDelegate for PathTransformer {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.last_co = event.pos;
        if self.drag.is_some() {
            tracing::warn!("press during a box drag, the release was lost");
            self.left_up(event, session);
        }
        let Some((index, handle)) = self.hit(event.pos, session) else {
            return;
        };
        let Some(start_box) = self.boxes.get(index).cloned() else {
            return;
        };
        let Some(reference) = session.path.as_ref().and_then(|p| p.subpath(start_box.subpath)).cloned() else {
            return;
        };
        tracing::debug!("transform box {index}: {handle:?}");
        self.drag = Some(BoxDrag {
            index,
            handle,
            press_im: session.to_image(event.pos),
            start_box,
            reference,
            before: session.snapshot(),
        });
        self.last_active = Some(index);
    }

    fn left_drag(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.last_co = event.pos;
        self.apply_drag(event, session);
    }

    fn left_up(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.last_co = event.pos;
        self.apply_drag(event, session);
        let Some(drag) = self.drag.take() else {
            return;
        };
        let changed = self
            .boxes
            .get(drag.index)
            .is_some_and(|b| b.affine != drag.start_box.affine);
        if changed {
            session.record_path_edit(EditType::TransformPath, drag.before);
        }
    }

    fn mouse_moved(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.last_co = event.pos;
        if self.drag.is_some() {
            tracing::warn!("move during a box drag, the release was lost");
            self.left_up(event, session);
        }
    }

    fn cancel(&mut self, session: &mut EditSession) {
        if self.drag.is_some() {
            self.left_up(MouseEvent::plain(self.last_co), session);
        }
    }
}
