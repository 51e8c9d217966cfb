// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Pen tool: build, edit and transform the session path.
//!
//! The three modes share one tool. Each mode keeps its own gesture state,
//! and every event goes through a single match on the current mode.

pub mod build;
pub mod edit;
pub mod transform;

pub use build::PathBuilder;
pub use edit::NodeEditor;
pub use transform::{BoxHandle, Corner, PathTransformer, TransformBox};

use super::{Tool, ToolId};
use crate::editing::{ArrowKey, EditSession, MouseDelegate, MouseEvent};
use crate::error::PathError;
use kurbo::BezPath;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenModeKind {
    #[default]
    Build,
    Edit,
    Transform,
}

#[derive(Debug, Clone)]
pub enum PenMode {
    Build(PathBuilder),
    Edit(NodeEditor),
    Transform(PathTransformer),
}

impl PenMode {
    pub fn kind(&self) -> PenModeKind {
        match self {
            PenMode::Build(_) => PenModeKind::Build,
            PenMode::Edit(_) => PenModeKind::Edit,
            PenMode::Transform(_) => PenModeKind::Transform,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PenTool {
    mode: PenMode,
}

impl Default for PenTool {
    fn default() -> Self {
        Self {
            mode: PenMode::Build(PathBuilder::new()),
        }
    }
}

impl PenTool {
    pub fn mode(&self) -> &PenMode {
        &self.mode
    }

    pub fn mode_kind(&self) -> PenModeKind {
        self.mode.kind()
    }

    pub fn node_editor_mut(&mut self) -> Option<&mut NodeEditor> {
        match &mut self.mode {
            PenMode::Edit(editor) => Some(editor),
            PenMode::Build(_) | PenMode::Transform(_) => None,
        }
    }

    /// Switch modes. Edit and Transform need a path to work on.
    pub fn set_mode(&mut self, kind: PenModeKind, session: &mut EditSession) -> Result<(), PathError> {
        if kind == self.mode_kind() {
            return Ok(());
        }
        if kind != PenModeKind::Build && !session.has_path() {
            return Err(PathError::NoPath);
        }

        match &mut self.mode {
            PenMode::Build(builder) => builder.mode_ended(session),
            PenMode::Edit(editor) => editor.mode_ended(session),
            PenMode::Transform(transformer) => transformer.mode_ended(session),
        }

        self.mode = match kind {
            PenModeKind::Build => PenMode::Build(PathBuilder::new()),
            PenModeKind::Edit => {
                let tol = session.tolerances();
                let built = session.built_interactively;
                if let Some(path) = &mut session.path {
                    path.change_types_for_editing(built, &tol);
                }
                PenMode::Edit(NodeEditor::new())
            }
            PenModeKind::Transform => {
                PenMode::Transform(session.path.as_ref().map(PathTransformer::for_path).unwrap_or_default())
            }
        };
        tracing::info!("pen mode: {kind:?}");
        session.repaint_path();
        Ok(())
    }

    /// The path changed behind the tool's back (undo, import, load)
    pub fn path_replaced(&mut self, session: &mut EditSession) {
        match &mut self.mode {
            PenMode::Build(builder) => builder.mode_ended(session),
            PenMode::Edit(editor) => editor.mode_ended(session),
            PenMode::Transform(transformer) => match &session.path {
                Some(path) => transformer.rebuild(path),
                None => transformer.mode_ended(session),
            },
        }
    }

    /// Component-space outline to draw, with the rubber band while building
    pub fn outline(&self, session: &EditSession) -> Option<BezPath> {
        let rubber_band = session.config.path.rubber_band && matches!(self.mode, PenMode::Build(_));
        session.path.as_ref().map(|p| p.to_component_shape(rubber_band))
    }
}

impl Tool for PenTool {
    fn id(&self) -> ToolId {
        ToolId::Pen
    }

    fn arrow_key(&mut self, key: ArrowKey, shift: bool, session: &mut EditSession) -> Result<(), PathError> {
        match &mut self.mode {
            PenMode::Build(_) => Ok(()),
            PenMode::Edit(editor) => editor.arrow_key(key, shift, session),
            PenMode::Transform(transformer) => transformer.arrow_key(key, shift, session),
        }
    }

    fn deactivate(&mut self, session: &mut EditSession) {
        self.path_replaced(session);
    }
}

impl MouseDelegate for PenTool {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, session: &mut EditSession) {
        match &mut self.mode {
            PenMode::Build(builder) => builder.left_down(event, session),
            PenMode::Edit(editor) => editor.left_down(event, session),
            PenMode::Transform(transformer) => transformer.left_down(event, session),
        }
    }

    fn left_drag(&mut self, event: MouseEvent, session: &mut EditSession) {
        match &mut self.mode {
            PenMode::Build(builder) => builder.left_drag(event, session),
            PenMode::Edit(editor) => editor.left_drag(event, session),
            PenMode::Transform(transformer) => transformer.left_drag(event, session),
        }
    }

    fn left_up(&mut self, event: MouseEvent, session: &mut EditSession) {
        match &mut self.mode {
            PenMode::Build(builder) => builder.left_up(event, session),
            PenMode::Edit(editor) => editor.left_up(event, session),
            PenMode::Transform(transformer) => transformer.left_up(event, session),
        }
    }

    fn mouse_moved(&mut self, event: MouseEvent, session: &mut EditSession) {
        match &mut self.mode {
            PenMode::Build(builder) => builder.mouse_moved(event, session),
            PenMode::Edit(editor) => editor.mouse_moved(event, session),
            PenMode::Transform(transformer) => transformer.mouse_moved(event, session),
        }
    }

    fn cancel(&mut self, session: &mut EditSession) {
        match &mut self.mode {
            PenMode::Build(builder) => builder.cancel(session),
            PenMode::Edit(editor) => editor.cancel(session),
            PenMode::Transform(transformer) => transformer.cancel(session),
        }
    }
}
