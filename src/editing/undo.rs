// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! The undo collaborator.
//!
//! Tools hand finished edits to an `EditHistory` together with immutable
//! snapshots taken at the moment of the change. Applying undo and redo is
//! the history's business.

use super::edit_types::EditType;
use crate::path::Path;
use kurbo::Rect;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// One undoable change
#[derive(Debug, Clone)]
pub enum Edit {
    /// Vector edit with path snapshots. `None` means "no path".
    Path {
        kind: EditType,
        before: Option<Path>,
        after: Option<Path>,
    },
    /// Raster edit; the history saves the pixels under `region`
    BrushStroke { brush: &'static str, region: Rect },
}

impl Edit {
    pub fn kind(&self) -> EditType {
        match self {
            Edit::Path { kind, .. } => *kind,
            Edit::BrushStroke { .. } => EditType::BrushStroke,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Receives finished edits
pub trait EditHistory: fmt::Debug {
    fn record_edit(&mut self, edit: Edit);
}

/// An in-memory history. Clones share the same list, so a caller can keep
/// a handle while the session owns the recorder.
#[derive(Debug, Clone, Default)]
pub struct EditLog {
    edits: Rc<RefCell<Vec<Edit>>>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edits.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.borrow().is_empty()
    }

    pub fn kinds(&self) -> Vec<EditType> {
        self.edits.borrow().iter().map(Edit::kind).collect()
    }

    pub fn last(&self) -> Option<Edit> {
        self.edits.borrow().last().cloned()
    }

    pub fn edits(&self) -> Vec<Edit> {
        self.edits.borrow().clone()
    }
}

impl EditHistory for EditLog {
    fn record_edit(&mut self, edit: Edit) {
        tracing::debug!("recording edit: {}", edit.name());
        let mut edits = self.edits.borrow_mut();
        if let (
            Some(Edit::Path {
                kind: prev_kind,
                after: prev_after,
                ..
            }),
            Edit::Path { kind, after, .. },
        ) = (edits.last_mut(), &edit)
        {
            if kind.combines_with(*prev_kind) {
                *prev_after = after.clone();
                return;
            }
        }
        edits.push(edit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_edit(kind: EditType) -> Edit {
        Edit::Path {
            kind,
            before: None,
            after: Some(Path::new()),
        }
    }

    #[test]
    fn clones_share_the_log() {
        let log = EditLog::new();
        let mut recorder = log.clone();
        recorder.record_edit(path_edit(EditType::SubPathStart));
        assert_eq!(log.len(), 1);
        assert_eq!(log.kinds(), vec![EditType::SubPathStart]);
    }

    #[test]
    fn nudges_in_one_direction_combine() {
        let mut log = EditLog::new();
        log.record_edit(path_edit(EditType::NudgeLeft));
        log.record_edit(path_edit(EditType::NudgeLeft));
        log.record_edit(path_edit(EditType::NudgeUp));
        assert_eq!(log.kinds(), vec![EditType::NudgeLeft, EditType::NudgeUp]);
    }

    #[test]
    fn brush_edits_are_named() {
        let mut log = EditLog::new();
        log.record_edit(Edit::BrushStroke {
            brush: "Dabs",
            region: Rect::new(0.0, 0.0, 1.0, 1.0),
        });
        assert_eq!(log.last().map(|e| e.name()), Some("Brush Stroke"));
    }
}
