// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Path editing commands for EditSession. Each command snapshots the
//! path before and after and records one undo step.

use super::EditSession;
use crate::editing::{ArrowKey, EditType};
use crate::error::PathError;
use crate::path::{DeleteOutcome, HandleRef, HandleType};
use crate::settings;
use kurbo::{Point, Vec2};

/// Nudge step in image pixels
pub fn nudge_amount(shift: bool) -> f64 {
    if shift {
        settings::handles::nudge::SHIFT
    } else {
        settings::handles::nudge::BASE
    }
}

pub(crate) fn nudge_edit_type(key: ArrowKey) -> EditType {
    match key {
        ArrowKey::Up => EditType::NudgeUp,
        ArrowKey::Down => EditType::NudgeDown,
        ArrowKey::Left => EditType::NudgeLeft,
        ArrowKey::Right => EditType::NudgeRight,
    }
}

impl EditSession {
    /// Move a handle without recording anything; tools record the whole
    /// drag on release
    pub fn move_handle(&mut self, handle: HandleRef, im: Point, constrained_from: Option<Point>) -> bool {
        let Some(path) = &mut self.path else {
            return false;
        };
        path.set_handle_location(handle, im, constrained_from, &self.viewport)
    }

    pub fn retract_handles(&mut self, handle: HandleRef) -> Result<(), PathError> {
        let before = self.snapshot();
        let path = self.path.as_mut().ok_or(PathError::NoPath)?;
        let anchor = path
            .anchor_mut(handle)
            .ok_or(PathError::MissingAnchor {
                subpath: handle.subpath,
                anchor: handle.anchor,
            })?;
        anchor.retract_handles();
        anchor.sync_co(&self.viewport);
        self.record_path_edit(EditType::RetractHandles, before);
        self.repaint_path();
        Ok(())
    }

    pub fn set_handle_type(&mut self, handle: HandleRef, handle_type: HandleType) -> Result<(), PathError> {
        let before = self.snapshot();
        let path = self.path.as_mut().ok_or(PathError::NoPath)?;
        let anchor = path
            .anchor_mut(handle)
            .ok_or(PathError::MissingAnchor {
                subpath: handle.subpath,
                anchor: handle.anchor,
            })?;
        if anchor.handle_type() == handle_type {
            return Ok(());
        }
        anchor.set_type(handle_type);
        self.record_path_edit(EditType::ChangeHandleType, before);
        Ok(())
    }

    /// Delete one anchor. A subpath left with fewer than two anchors is
    /// removed, and an empty path is dropped entirely.
    pub fn delete_anchor(&mut self, handle: HandleRef) -> Result<DeleteOutcome, PathError> {
        let before = self.snapshot();
        self.repaint_path();
        let path = self.path.as_mut().ok_or(PathError::NoPath)?;
        let outcome = path.delete_anchor(handle.subpath, handle.anchor)?;
        if outcome == DeleteOutcome::PathEmptied {
            self.path = None;
        }
        let kind = match outcome {
            DeleteOutcome::AnchorRemoved => EditType::DeleteAnchorPoint,
            DeleteOutcome::SubPathRemoved => EditType::DeleteSubPath,
            DeleteOutcome::PathEmptied => EditType::DeletePath,
        };
        self.record_path_edit(kind, before);
        Ok(outcome)
    }

    pub fn delete_subpath(&mut self, index: usize) -> Result<DeleteOutcome, PathError> {
        let before = self.snapshot();
        self.repaint_path();
        let path = self.path.as_mut().ok_or(PathError::NoPath)?;
        let outcome = path.delete_subpath(index)?;
        let kind = if outcome == DeleteOutcome::PathEmptied {
            self.path = None;
            EditType::DeletePath
        } else {
            EditType::DeleteSubPath
        };
        self.record_path_edit(kind, before);
        Ok(outcome)
    }

    pub fn delete_path(&mut self) -> Result<(), PathError> {
        if self.path.is_none() {
            return Err(PathError::NoPath);
        }
        let before = self.snapshot();
        self.repaint_path();
        self.path = None;
        self.record_path_edit(EditType::DeletePath, before);
        Ok(())
    }

    pub fn reverse_path(&mut self) -> Result<(), PathError> {
        let before = self.snapshot();
        let path = self.path.as_mut().ok_or(PathError::NoPath)?;
        path.reverse();
        self.record_path_edit(EditType::ReversePath, before);
        Ok(())
    }

    /// Split the subpath at an anchor; see `Path::split_subpath`
    pub fn split_subpath(&mut self, handle: HandleRef) -> Result<(), PathError> {
        let before = self.snapshot();
        let path = self.path.as_mut().ok_or(PathError::NoPath)?;
        if !path.split_subpath(handle.subpath, handle.anchor)? {
            tracing::debug!("nothing to split at an open end");
            return Ok(());
        }
        path.sync_co(&self.viewport);
        self.record_path_edit(EditType::SplitSubPath, before);
        self.repaint_path();
        Ok(())
    }

    /// Move one anchor or handle by an arrow-key step
    pub fn nudge_handle(&mut self, handle: HandleRef, key: ArrowKey, shift: bool) -> Result<(), PathError> {
        let before = self.snapshot();
        let path = self.path.as_mut().ok_or(PathError::NoPath)?;
        let current = path
            .handle_im(handle)
            .ok_or(PathError::MissingAnchor {
                subpath: handle.subpath,
                anchor: handle.anchor,
            })?;
        let target = current + key.direction() * nudge_amount(shift);
        path.set_handle_location(handle, target, None, &self.viewport);
        self.record_path_edit(nudge_edit_type(key), before);
        self.repaint_path();
        Ok(())
    }

    /// Translate a whole subpath by an arrow-key step
    pub fn nudge_subpath(&mut self, index: usize, key: ArrowKey, shift: bool) -> Result<(), PathError> {
        let before = self.snapshot();
        let path = self.path.as_mut().ok_or(PathError::NoPath)?;
        let sp = path.subpath_mut(index).ok_or(PathError::SubPathIndex(index))?;
        let delta: Vec2 = key.direction() * nudge_amount(shift);
        sp.translate(delta);
        sp.sync_co(&self.viewport);
        self.record_path_edit(nudge_edit_type(key), before);
        self.repaint_path();
        Ok(())
    }
}
