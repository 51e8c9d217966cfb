// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Pen edit mode: dragging existing anchors and handles

use crate::editing::{ArrowKey, EditSession, EditType, MouseDelegate, MouseEvent};
use crate::error::PathError;
use crate::path::{DeleteOutcome, HandlePart, HandleRef, HandleSide, HandleType, Path};
use kurbo::Point;

/// A handle drag in progress
#[derive(Debug, Clone)]
struct HandleDrag {
    handle: HandleRef,
    before: Option<Path>,
    start_im: Point,
    anchor_im: Point,
    start_type: Option<HandleType>,
}

/// Node editor for an existing path.
///
/// A press picks the handle under the pointer, a drag moves it and the
/// release records a single undo step. The last pressed handle stays
/// active for arrow-key nudges and the explicit node actions.
#[derive(Debug, Clone, Default)]
pub struct NodeEditor {
    drag: Option<HandleDrag>,
    active: Option<HandleRef>,
    hovered: Option<HandleRef>,
    last_co: Point,
}

impl NodeEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The handle that receives nudges and node actions
    pub fn active(&self) -> Option<HandleRef> {
        self.active
    }

    pub fn hovered(&self) -> Option<HandleRef> {
        self.hovered
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn require_active(&self) -> Result<HandleRef, PathError> {
        self.active.ok_or(PathError::NoActiveHandle)
    }

    // ===== Node actions =====

    pub fn arrow_key(&mut self, key: ArrowKey, shift: bool, session: &mut EditSession) -> Result<(), PathError> {
        let handle = self.require_active()?;
        session.nudge_handle(handle, key, shift)
    }

    pub fn retract_active(&mut self, session: &mut EditSession) -> Result<(), PathError> {
        let handle = self.require_active()?;
        session.retract_handles(handle)
    }

    pub fn set_active_type(&mut self, handle_type: HandleType, session: &mut EditSession) -> Result<(), PathError> {
        let handle = self.require_active()?;
        session.set_handle_type(handle, handle_type)
    }

    pub fn delete_active_anchor(&mut self, session: &mut EditSession) -> Result<DeleteOutcome, PathError> {
        let handle = self.require_active()?;
        let outcome = session.delete_anchor(handle)?;
        self.forget_handles();
        Ok(outcome)
    }

    pub fn delete_active_subpath(&mut self, session: &mut EditSession) -> Result<DeleteOutcome, PathError> {
        let handle = self.require_active()?;
        let outcome = session.delete_subpath(handle.subpath)?;
        self.forget_handles();
        Ok(outcome)
    }

    pub fn delete_path(&mut self, session: &mut EditSession) -> Result<(), PathError> {
        session.delete_path()?;
        self.forget_handles();
        Ok(())
    }

    /// Indices shift after deletions, so remembered handles are dropped
    fn forget_handles(&mut self) {
        self.active = None;
        self.hovered = None;
        self.drag = None;
    }

    pub fn mode_ended(&mut self, session: &mut EditSession) {
        self.cancel(session);
        self.forget_handles();
    }

    fn move_dragged(&self, event: MouseEvent, session: &mut EditSession) {
        let Some(drag) = &self.drag else {
            return;
        };
        let im = session.to_image(event.pos);
        let constrained_from = event.mods.shift.then_some(drag.anchor_im);
        session.move_handle(drag.handle, im, constrained_from);
        session.repaint_path();
    }
}

impl MouseDelegate for NodeEditor {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.last_co = event.pos;
        if self.drag.is_some() {
            tracing::warn!("press during a handle drag, the release was lost");
            self.left_up(event, session);
        }

        let alt = event.mods.alt;
        let Some(hit) = session.find_handle(event.pos, alt) else {
            return;
        };
        let before = session.snapshot();
        let view = session.viewport;
        let Some(path) = session.path.as_mut() else {
            return;
        };
        path.set_active(hit.subpath);
        let Some(anchor) = path.anchor_mut(hit) else {
            return;
        };
        let handle = match (alt, hit.part) {
            (true, HandlePart::Ctrl(side)) => {
                anchor.break_or_drag_out(side);
                hit
            }
            (true, HandlePart::Anchor) => {
                anchor.retract_handles();
                anchor.set_type(HandleType::Symmetric);
                anchor.sync_co(&view);
                HandleRef {
                    part: HandlePart::Ctrl(HandleSide::Out),
                    ..hit
                }
            }
            (false, _) => hit,
        };

        let start_type = before
            .as_ref()
            .and_then(|p| p.anchor(handle))
            .map(|a| a.handle_type());
        self.drag = Some(HandleDrag {
            handle,
            before,
            start_im: anchor.part_im(handle.part),
            anchor_im: anchor.im(),
            start_type,
        });
        self.active = Some(handle);
        session.repaint_path();
    }

    fn left_drag(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.last_co = event.pos;
        self.move_dragged(event, session);
    }

    fn left_up(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.last_co = event.pos;
        self.move_dragged(event, session);
        let Some(drag) = self.drag.take() else {
            return;
        };
        let (now_im, now_type) = match session.path.as_ref().and_then(|p| p.anchor(drag.handle)) {
            Some(anchor) => (Some(anchor.part_im(drag.handle.part)), Some(anchor.handle_type())),
            None => (None, None),
        };
        if now_im.is_some_and(|p| p != drag.start_im) {
            session.record_path_edit(EditType::MoveHandle, drag.before);
        } else if now_type != drag.start_type {
            session.record_path_edit(EditType::ChangeHandleType, drag.before);
        }
        if let Some(path) = &session.path {
            path.assert_consistent();
        }
    }

    fn mouse_moved(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.last_co = event.pos;
        if self.drag.is_some() {
            tracing::warn!("move during a handle drag, the release was lost");
            self.left_up(event, session);
        }
        let hovered = session.find_handle(event.pos, event.mods.alt);
        if hovered != self.hovered {
            self.hovered = hovered;
            session.repaint_path();
        }
    }

    fn cancel(&mut self, session: &mut EditSession) {
        if self.drag.is_some() {
            self.left_up(MouseEvent::plain(self.last_co), session);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::editing::{EditLog, Modifiers, NoRepaint};
    use kurbo::{BezPath, Size};

    fn session() -> (EditSession, EditLog) {
        let log = EditLog::new();
        let mut s = EditSession::with_collaborators(
            Config::default(),
            Size::new(200.0, 200.0),
            Box::new(log.clone()),
            Box::new(NoRepaint),
        );
        let mut bez = BezPath::new();
        bez.move_to((10.0, 10.0));
        bez.curve_to((30.0, 10.0), (70.0, 50.0), (90.0, 50.0));
        bez.line_to((90.0, 120.0));
        s.import_shape(&bez);
        (s, log)
    }

    fn anchor_at(s: &EditSession, index: usize) -> &crate::path::AnchorPoint {
        &s.path.as_ref().unwrap().subpaths()[0].anchors()[index]
    }

    #[test]
    fn dragging_an_anchor_records_one_move() {
        let (mut s, log) = session();
        let mut ed = NodeEditor::new();
        ed.left_down(MouseEvent::plain((90.0, 120.0)), &mut s);
        ed.left_drag(MouseEvent::plain((95.0, 125.0)), &mut s);
        ed.left_drag(MouseEvent::plain((100.0, 130.0)), &mut s);
        ed.left_up(MouseEvent::plain((100.0, 130.0)), &mut s);
        assert_eq!(anchor_at(&s, 2).im(), Point::new(100.0, 130.0));
        assert_eq!(log.kinds(), vec![EditType::ImportShape, EditType::MoveHandle]);
        assert_eq!(ed.active().map(|h| h.anchor), Some(2));
    }

    #[test]
    fn click_without_moving_records_nothing() {
        let (mut s, log) = session();
        let mut ed = NodeEditor::new();
        ed.left_down(MouseEvent::plain((10.0, 10.0)), &mut s);
        ed.left_up(MouseEvent::plain((10.0, 10.0)), &mut s);
        assert_eq!(log.len(), 1);
        assert!(!ed.is_dragging());
    }

    #[test]
    fn alt_on_an_anchor_drags_out_symmetric_handles() {
        let (mut s, _) = session();
        let mut ed = NodeEditor::new();
        ed.left_down(MouseEvent::new((90.0, 120.0), Modifiers::alt()), &mut s);
        ed.left_drag(MouseEvent::plain((110.0, 120.0)), &mut s);
        ed.left_up(MouseEvent::plain((110.0, 120.0)), &mut s);
        let a = anchor_at(&s, 2);
        assert_eq!(a.handle_type(), HandleType::Symmetric);
        assert_eq!(a.ctrl_out().pos.im, Point::new(110.0, 120.0));
        assert_eq!(a.ctrl_in().pos.im, Point::new(70.0, 120.0));
    }

    #[test]
    fn alt_on_a_control_breaks_it() {
        let (mut s, log) = session();
        let mut ed = NodeEditor::new();
        // in-handle of the middle anchor
        ed.left_down(MouseEvent::new((70.0, 50.0), Modifiers::alt()), &mut s);
        ed.left_drag(MouseEvent::plain((70.0, 30.0)), &mut s);
        ed.left_up(MouseEvent::plain((70.0, 30.0)), &mut s);
        let a = anchor_at(&s, 1);
        assert_eq!(a.handle_type(), HandleType::Cusp);
        assert_eq!(a.ctrl_in().pos.im, Point::new(70.0, 30.0));
        assert!(a.is_retracted(HandleSide::Out));
        assert_eq!(log.kinds().last(), Some(&EditType::MoveHandle));
    }

    #[test]
    fn shift_constrains_around_the_press_position() {
        let (mut s, _) = session();
        let mut ed = NodeEditor::new();
        ed.left_down(MouseEvent::plain((90.0, 120.0)), &mut s);
        ed.left_up(MouseEvent::new((140.0, 122.0), Modifiers::shift()), &mut s);
        let moved = anchor_at(&s, 2).im();
        assert!((moved.y - 120.0).abs() < 1e-9);
        assert!(moved.x > 139.0);
    }

    #[test]
    fn nudge_and_actions_use_the_active_handle() {
        let (mut s, log) = session();
        let mut ed = NodeEditor::new();
        assert!(matches!(ed.arrow_key(ArrowKey::Up, false, &mut s), Err(PathError::NoActiveHandle)));

        ed.left_down(MouseEvent::plain((90.0, 120.0)), &mut s);
        ed.left_up(MouseEvent::plain((90.0, 120.0)), &mut s);
        ed.arrow_key(ArrowKey::Up, true, &mut s).unwrap();
        assert_eq!(anchor_at(&s, 2).im(), Point::new(90.0, 110.0));
        assert_eq!(log.kinds().last(), Some(&EditType::NudgeUp));

        ed.delete_active_anchor(&mut s).unwrap();
        assert_eq!(s.path.as_ref().unwrap().subpaths()[0].len(), 2);
        assert!(ed.active().is_none());
    }

    #[test]
    fn hover_follows_the_pointer() {
        let (mut s, _) = session();
        let mut ed = NodeEditor::new();
        ed.mouse_moved(MouseEvent::plain((11.0, 11.0)), &mut s);
        assert_eq!(ed.hovered().map(|h| h.anchor), Some(0));
        ed.mouse_moved(MouseEvent::plain((150.0, 150.0)), &mut s);
        assert!(ed.hovered().is_none());
    }
}
