// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Tool system for path and brush editing

use crate::editing::{ArrowKey, EditSession, MouseDelegate, MouseEvent};
use crate::error::PathError;
use serde::Deserialize;
use std::time::Duration;

// ===== Tool Identifier =====

/// Tool identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolId {
    /// Build, edit and transform the pen path
    Pen,
    /// Paint strokes on the layer
    Brush,
}

// ===== Tool Trait =====

/// A tool driven by pointer events on an edit session
pub trait Tool: MouseDelegate<Data = EditSession> {
    fn id(&self) -> ToolId;

    /// Arrow-key nudge; tools without a notion of selection ignore it
    fn arrow_key(&mut self, _key: ArrowKey, _shift: bool, _session: &mut EditSession) -> Result<(), PathError> {
        Ok(())
    }

    /// The tool is being switched away from
    fn deactivate(&mut self, session: &mut EditSession) {
        self.cancel(session);
    }
}

// ===== ToolBox Enum =====

/// Enum wrapping all tool types
#[derive(Debug, Clone)]
pub enum ToolBox {
    Pen(pen::PenTool),
    Brush(brush::BrushTool),
}

// ===== ToolBox Implementation =====

impl ToolBox {
    /// Create a tool by ID, configured from the session
    pub fn for_id(id: ToolId, session: &EditSession) -> Self {
        match id {
            ToolId::Pen => ToolBox::Pen(pen::PenTool::default()),
            ToolId::Brush => ToolBox::Brush(brush::BrushTool::from_config(&session.config.brush, session.canvas)),
        }
    }

    pub fn id(&self) -> ToolId {
        match self {
            ToolBox::Pen(tool) => tool.id(),
            ToolBox::Brush(tool) => tool.id(),
        }
    }

    pub fn mouse_down(&mut self, event: MouseEvent, session: &mut EditSession) {
        match self {
            ToolBox::Pen(tool) => tool.left_down(event, session),
            ToolBox::Brush(tool) => tool.left_down(event, session),
        }
    }

    pub fn mouse_drag(&mut self, event: MouseEvent, session: &mut EditSession) {
        match self {
            ToolBox::Pen(tool) => tool.left_drag(event, session),
            ToolBox::Brush(tool) => tool.left_drag(event, session),
        }
    }

    pub fn mouse_up(&mut self, event: MouseEvent, session: &mut EditSession) {
        match self {
            ToolBox::Pen(tool) => tool.left_up(event, session),
            ToolBox::Brush(tool) => tool.left_up(event, session),
        }
    }

    pub fn arrow_key(&mut self, key: ArrowKey, shift: bool, session: &mut EditSession) -> Result<(), PathError> {
        match self {
            ToolBox::Pen(tool) => tool.arrow_key(key, shift, session),
            ToolBox::Brush(tool) => tool.arrow_key(key, shift, session),
        }
    }

    /// Timer callback from the host event loop
    pub fn tick(&mut self, elapsed: Duration, session: &mut EditSession) {
        match self {
            ToolBox::Pen(_) => {}
            ToolBox::Brush(tool) => tool.tick(elapsed, session),
        }
    }

    pub fn deactivate(&mut self, session: &mut EditSession) {
        match self {
            ToolBox::Pen(tool) => tool.deactivate(session),
            ToolBox::Brush(tool) => tool.deactivate(session),
        }
    }
}

// ===== MouseDelegate Implementation =====

impl MouseDelegate for ToolBox {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, data: &mut EditSession) {
        self.mouse_down(event, data);
    }

    fn left_drag(&mut self, event: MouseEvent, data: &mut EditSession) {
        self.mouse_drag(event, data);
    }

    fn left_up(&mut self, event: MouseEvent, data: &mut EditSession) {
        self.mouse_up(event, data);
    }

    fn mouse_moved(&mut self, event: MouseEvent, data: &mut EditSession) {
        match self {
            ToolBox::Pen(tool) => tool.mouse_moved(event, data),
            ToolBox::Brush(tool) => tool.mouse_moved(event, data),
        }
    }

    /// Cancel current operation
    fn cancel(&mut self, data: &mut EditSession) {
        match self {
            ToolBox::Pen(tool) => tool.cancel(data),
            ToolBox::Brush(tool) => tool.cancel(data),
        }
    }
}

// ===== Tool Modules =====

pub mod brush;
pub mod pen;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use kurbo::Size;

    #[test]
    fn tools_report_their_id() {
        let session = EditSession::new(Config::default(), Size::new(50.0, 50.0));
        for id in [ToolId::Pen, ToolId::Brush] {
            assert_eq!(ToolBox::for_id(id, &session).id(), id);
        }
    }

    #[test]
    fn brush_tool_takes_the_configured_radius() {
        let mut config = Config::default();
        config.brush.radius = 7.0;
        let session = EditSession::new(config, Size::new(50.0, 50.0));
        match ToolBox::for_id(ToolId::Brush, &session) {
            ToolBox::Brush(tool) => assert_eq!(tool.radius(), 7.0),
            other => panic!("unexpected tool {other:?}"),
        }
    }

    #[test]
    fn dispatch_reaches_the_pen() {
        let mut session = EditSession::new(Config::default(), Size::new(50.0, 50.0));
        let mut tool = ToolBox::for_id(ToolId::Pen, &session);
        tool.left_down(MouseEvent::plain((5.0, 5.0)), &mut session);
        tool.left_up(MouseEvent::plain((5.0, 5.0)), &mut session);
        assert!(session.has_path());
    }
}
