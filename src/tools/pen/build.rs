// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Pen build mode: creating subpaths click by click.
//!
//! A press adds an anchor and a drag pulls out its outgoing handle. After
//! the release a rubber band follows the pointer to the next anchor. A
//! press on the first anchor closes the subpath, a ctrl-click anywhere
//! else finishes it open.
//!
//! Ctrl redirects presses to existing anchors and handles, which are then
//! dragged in place. Alt breaks a handle pair into a cusp, pulls retracted
//! handles out of an anchor, or (when nothing is hit) makes the next anchor
//! a cusp.
//!
//! The build state lives in the path. Events that do not fit it (a drag
//! while the button is supposedly up, usually after a lost release) are
//! logged and the state is forced to match the event.

use crate::editing::{EditSession, EditType, MouseDelegate, MouseEvent};
use crate::path::point::constrain_to_45;
use crate::path::{AnchorPoint, BuildState, DualPoint, HandlePart, HandleRef, HandleSide, HandleType, Path, SubPath};
use kurbo::{Point, Rect};

/// An undo record waiting for the end of the handle drag
#[derive(Debug, Clone)]
struct PendingEdit {
    kind: EditType,
    before: Option<Path>,
}

/// An existing handle being dragged with a modifier held
#[derive(Debug, Clone)]
struct EditedHandle {
    handle: HandleRef,
    before: Option<Path>,
    start_im: Point,
    /// Anchor position at press time, the pivot for shift constraints
    anchor_im: Point,
    start_type: Option<HandleType>,
    return_to: BuildState,
}

#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    /// Last pointer position in component space
    last_co: Point,
    pending: Option<PendingEdit>,
    edited: Option<EditedHandle>,
    /// The anchor being dragged out was forced to CUSP by an alt-click
    cusp_anchor: bool,
    /// The pointer is over the first anchor and a press would close
    closable_hover: bool,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(session: &EditSession) -> BuildState {
        session.path.as_ref().map_or(BuildState::Idle, Path::build_state)
    }

    /// Whether the first anchor should be highlighted as a close target
    pub fn closable_hover(&self) -> bool {
        self.closable_hover
    }

    fn set_state(session: &mut EditSession, state: BuildState) {
        if let Some(path) = &mut session.path {
            path.set_build_state(state);
        }
    }

    fn active_subpath(session: &mut EditSession) -> Option<&mut SubPath> {
        session.path.as_mut().and_then(Path::active_subpath_mut)
    }

    fn check(session: &EditSession) {
        if let Some(path) = &session.path {
            path.assert_consistent();
        }
    }

    /// After a drag with a visible handle the anchor keeps smooth
    /// continuity rather than exact symmetry
    fn promote_dragged(anchor: &mut AnchorPoint) {
        if !anchor.is_retracted(HandleSide::Out) {
            anchor.change_type_from_sym_to_smooth();
        }
    }

    fn promote_last(session: &mut EditSession) {
        if let Some(last) = Self::active_subpath(session).and_then(SubPath::last_mut) {
            Self::promote_dragged(last);
        }
    }

    // ===== Press =====

    fn press_idle(&mut self, event: MouseEvent, before: Option<Path>, session: &mut EditSession) {
        if session.path.is_none() {
            session.path = Some(Path::new());
            session.built_interactively = true;
        }
        let mods = event.mods;

        if mods.ctrl {
            if let Some(hit) = session.find_handle(event.pos, mods.alt) {
                if let (HandlePart::Ctrl(_), Some(anchor)) =
                    (hit.part, session.path.as_mut().and_then(|p| p.anchor_mut(hit)))
                {
                    // an existing handle pair keeps its lengths while edited
                    anchor.set_type(HandleType::Smooth);
                }
                self.start_editing_previous(hit, before, BuildState::Idle, session);
                return;
            }
        }
        if mods.alt {
            if let Some(hit) = session.find_handle(event.pos, true) {
                if let HandlePart::Ctrl(side) = hit.part {
                    if let Some(anchor) = session.path.as_mut().and_then(|p| p.anchor_mut(hit)) {
                        anchor.break_or_drag_out(side);
                    }
                    self.start_editing_previous(hit, before, BuildState::Idle, session);
                    return;
                }
            }
        }

        let im = session.to_image(event.pos);
        let view = session.viewport;
        let Some(path) = session.path.as_mut() else {
            return;
        };
        path.finish_active();
        path.start_new_subpath(AnchorPoint::at(im, &view));
        tracing::debug!("started subpath at ({:.1}, {:.1})", im.x, im.y);
        self.pending = Some(PendingEdit {
            kind: EditType::SubPathStart,
            before,
        });
        self.cusp_anchor = false;
        Self::set_state(session, BuildState::DraggingLastControl);
    }

    fn press_moving(&mut self, event: MouseEvent, before: Option<Path>, session: &mut EditSession) {
        let mods = event.mods;
        let state = Self::state(session);

        if Self::active_subpath(session).is_none_or(|sp| sp.is_finished()) {
            tracing::warn!("{state:?} without an open subpath, starting over");
            Self::set_state(session, BuildState::Idle);
            self.press_idle(event, before, session);
            return;
        }

        if mods.ctrl {
            match session.find_handle(event.pos, mods.alt) {
                Some(hit) => self.start_editing_previous(hit, before, state, session),
                None => self.finish_by_ctrl_click(before, session),
            }
            return;
        }

        let mut alt_nothing_hit = false;
        if mods.alt {
            match session.find_handle(event.pos, true) {
                Some(hit) => {
                    let view = session.viewport;
                    let Some(anchor) = session.path.as_mut().and_then(|p| p.anchor_mut(hit)) else {
                        return;
                    };
                    let edited = match hit.part {
                        HandlePart::Ctrl(side) => {
                            anchor.break_or_drag_out(side);
                            hit
                        }
                        HandlePart::Anchor => {
                            anchor.retract_handles();
                            anchor.set_type(HandleType::Symmetric);
                            anchor.sync_co(&view);
                            HandleRef {
                                part: HandlePart::Ctrl(HandleSide::Out),
                                ..hit
                            }
                        }
                    };
                    self.start_editing_previous(edited, before, state, session);
                    return;
                }
                None => alt_nothing_hit = true,
            }
        }

        if self.try_closing(event.pos, &before, session) {
            return;
        }

        let mut im = session.to_image(event.pos);
        let view = session.viewport;
        let Some(sp) = Self::active_subpath(session) else {
            return;
        };
        if let Some(prev) = sp.last_mut() {
            Self::promote_dragged(prev);
            if mods.shift {
                im = constrain_to_45(prev.im(), im);
            }
        }
        let anchor = sp.commit_moving_point(DualPoint::new(im, &view));
        if alt_nothing_hit {
            anchor.set_type(HandleType::Cusp);
        }
        self.cusp_anchor = alt_nothing_hit;
        self.pending = Some(PendingEdit {
            kind: EditType::AddAnchorPoint,
            before,
        });
        Self::set_state(session, BuildState::DraggingLastControl);
    }

    fn start_editing_previous(
        &mut self,
        handle: HandleRef,
        before: Option<Path>,
        return_to: BuildState,
        session: &mut EditSession,
    ) {
        let Some(anchor) = session.path.as_ref().and_then(|p| p.anchor(handle)) else {
            tracing::warn!("edited handle {handle:?} disappeared");
            return;
        };
        let start_type = before
            .as_ref()
            .and_then(|p| p.anchor(handle))
            .map(AnchorPoint::handle_type);
        self.edited = Some(EditedHandle {
            handle,
            before,
            start_im: anchor.part_im(handle.part),
            anchor_im: anchor.im(),
            start_type,
            return_to,
        });
        self.closable_hover = false;
        Self::set_state(session, BuildState::DragEditingPrevious);
    }

    fn try_closing(&mut self, co_pos: Point, before: &Option<Path>, session: &mut EditSession) -> bool {
        if !session.can_close_active_at(co_pos) {
            return false;
        }
        Self::promote_last(session);
        if let Some(sp) = Self::active_subpath(session) {
            sp.close();
            tracing::debug!("closed {}", sp.id());
        }
        self.closable_hover = false;
        Self::set_state(session, BuildState::Idle);
        session.record_path_edit(EditType::CloseSubPath, before.clone());
        session.repaint_path();
        true
    }

    fn finish_by_ctrl_click(&mut self, before: Option<Path>, session: &mut EditSession) {
        Self::promote_last(session);
        if let Some(sp) = Self::active_subpath(session) {
            sp.finish();
            tracing::debug!("finished {} with {} anchors", sp.id(), sp.len());
        }
        self.closable_hover = false;
        Self::set_state(session, BuildState::Idle);
        session.record_path_edit(EditType::FinishSubPath, before);
        session.repaint_path();
    }

    // ===== Drag =====

    fn drag_last_control(&mut self, event: MouseEvent, session: &mut EditSession) {
        let im = session.to_image(event.pos);
        let view = session.viewport;
        let cusp = event.mods.alt || self.cusp_anchor;
        let Some(last) = Self::active_subpath(session).and_then(SubPath::last_mut) else {
            tracing::warn!("dragging a handle without an anchor");
            return;
        };
        last.set_type(if cusp { HandleType::Cusp } else { HandleType::Symmetric });
        if event.mods.shift {
            last.set_ctrl_location_constrained(HandleSide::Out, im);
        } else {
            last.set_ctrl_location(HandleSide::Out, im);
        }
        last.sync_co(&view);
        session.repaint_path();
    }

    fn drag_previous(&mut self, event: MouseEvent, session: &mut EditSession) {
        let Some(edited) = &self.edited else {
            tracing::warn!("editing drag without a handle");
            return;
        };
        let im = session.to_image(event.pos);
        let constrained_from = event.mods.shift.then_some(edited.anchor_im);
        session.move_handle(edited.handle, im, constrained_from);
        session.repaint_path();
    }

    // ===== Release =====

    fn release_last_control(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.drag_last_control(event, session);
        Self::promote_last(session);
        let im = session.to_image(event.pos);
        let view = session.viewport;
        if let Some(sp) = Self::active_subpath(session).filter(|sp| !sp.is_finished()) {
            sp.set_moving_point(DualPoint::new(im, &view));
        }
        if let Some(pending) = self.pending.take() {
            session.record_path_edit(pending.kind, pending.before);
        }
        self.cusp_anchor = false;
        let next = if event.mods.edits_previous() {
            BuildState::MoveEditingPrevious
        } else {
            BuildState::MovingToNextAnchor
        };
        Self::set_state(session, next);
    }

    fn release_previous(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.drag_previous(event, session);
        let Some(edited) = self.edited.take() else {
            Self::set_state(session, BuildState::Idle);
            return;
        };

        let (now_im, now_type) = match session.path.as_ref().and_then(|p| p.anchor(edited.handle)) {
            Some(anchor) => (Some(anchor.part_im(edited.handle.part)), Some(anchor.handle_type())),
            None => (None, None),
        };
        if now_im.is_some_and(|p| p != edited.start_im) {
            session.record_path_edit(EditType::MoveHandle, edited.before);
        } else if now_type != edited.start_type {
            session.record_path_edit(EditType::ChangeHandleType, edited.before);
        }

        let next = match edited.return_to {
            BuildState::Idle => BuildState::Idle,
            _ if event.mods.edits_previous() => BuildState::MoveEditingPrevious,
            _ => BuildState::MovingToNextAnchor,
        };
        if next != BuildState::Idle {
            let im = session.to_image(event.pos);
            let view = session.viewport;
            match Self::active_subpath(session) {
                Some(sp) if !sp.is_finished() => {
                    if sp.moving_point().is_none() {
                        sp.set_moving_point(DualPoint::new(im, &view));
                    }
                }
                _ => {
                    Self::set_state(session, BuildState::Idle);
                    return;
                }
            }
        }
        Self::set_state(session, next);
    }

    // ===== Move =====

    fn move_to_next(&mut self, event: MouseEvent, session: &mut EditSession) {
        let mut im = session.to_image(event.pos);
        let view = session.viewport;
        let closable = session.can_close_active_at(event.pos);
        let radius = session.handle_radius();
        let Some(sp) = Self::active_subpath(session).filter(|sp| !sp.is_finished()) else {
            tracing::warn!("rubber band without an open subpath");
            Self::set_state(session, BuildState::Idle);
            return;
        };
        let last = sp.last().map(|a| (a.im(), a.pos.co));
        if event.mods.shift {
            if let Some((last_im, _)) = last {
                im = constrain_to_45(last_im, im);
            }
        }
        let old_co = sp.moving_point().map(|p| p.co);
        let moving = DualPoint::new(im, &view);
        sp.set_moving_point(moving);

        self.closable_hover = closable;
        let next = if event.mods.edits_previous() {
            BuildState::MoveEditingPrevious
        } else {
            BuildState::MovingToNextAnchor
        };
        Self::set_state(session, next);

        if let Some((_, last_co)) = last {
            let mut region = Rect::from_points(last_co, moving.co);
            if let Some(old) = old_co {
                region = region.union_pt(old);
            }
            session.request_repaint(region.inflate(radius, radius));
        }
    }

    // ===== Mode changes =====

    /// Leave build mode. The active subpath is finished without an undo
    /// record, since this may run while an undo is being applied.
    pub fn mode_ended(&mut self, session: &mut EditSession) {
        self.pending = None;
        self.edited = None;
        self.cusp_anchor = false;
        self.closable_hover = false;
        Self::promote_last(session);
        if let Some(path) = &mut session.path {
            if path.finish_active() {
                tracing::debug!("build mode ended, force-finished the active subpath");
            }
            path.set_build_state(BuildState::Idle);
        }
    }
}

impl MouseDelegate for PathBuilder {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.last_co = event.pos;
        let state = Self::state(session);
        if state.is_dragging() {
            tracing::warn!("press while {state:?}, the release was lost");
            self.left_up(event, session);
        }

        let before = session.snapshot();
        match Self::state(session) {
            BuildState::Idle => self.press_idle(event, before, session),
            BuildState::MovingToNextAnchor | BuildState::MoveEditingPrevious => {
                self.press_moving(event, before, session)
            }
            state @ (BuildState::DraggingLastControl | BuildState::DragEditingPrevious) => {
                tracing::error!("still {state:?} after recovering from a lost release");
            }
        }
        Self::check(session);
    }

    fn left_drag(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.last_co = event.pos;
        match Self::state(session) {
            BuildState::Idle => {
                tracing::debug!("drag without a press, ignored");
            }
            state @ (BuildState::MovingToNextAnchor | BuildState::MoveEditingPrevious) => {
                tracing::warn!("drag while {state:?}, the press was lost");
                if let Some(sp) = Self::active_subpath(session) {
                    sp.clear_moving_point();
                }
                Self::set_state(session, BuildState::DraggingLastControl);
                self.drag_last_control(event, session);
            }
            BuildState::DraggingLastControl => self.drag_last_control(event, session),
            BuildState::DragEditingPrevious => self.drag_previous(event, session),
        }
    }

    fn left_up(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.last_co = event.pos;
        match Self::state(session) {
            BuildState::Idle => {}
            state @ (BuildState::MovingToNextAnchor | BuildState::MoveEditingPrevious) => {
                tracing::debug!("release while {state:?}, ignored");
            }
            BuildState::DraggingLastControl => self.release_last_control(event, session),
            BuildState::DragEditingPrevious => self.release_previous(event, session),
        }
        Self::check(session);
    }

    fn mouse_moved(&mut self, event: MouseEvent, session: &mut EditSession) {
        self.last_co = event.pos;
        match Self::state(session) {
            BuildState::Idle => self.closable_hover = false,
            state @ (BuildState::DraggingLastControl | BuildState::DragEditingPrevious) => {
                tracing::warn!("move while {state:?}, the release was lost");
                self.left_up(event, session);
                if !Self::state(session).is_dragging() && Self::state(session) != BuildState::Idle {
                    self.move_to_next(event, session);
                }
            }
            BuildState::MovingToNextAnchor | BuildState::MoveEditingPrevious => self.move_to_next(event, session),
        }
    }

    fn cancel(&mut self, session: &mut EditSession) {
        if Self::state(session).is_dragging() {
            self.left_up(MouseEvent::plain(self.last_co), session);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::editing::{EditLog, Modifiers, NoRepaint, ViewPort};
    use kurbo::{PathEl, Size, Vec2};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn session() -> (EditSession, EditLog) {
        let log = EditLog::new();
        let s = EditSession::with_collaborators(
            Config::default(),
            Size::new(400.0, 400.0),
            Box::new(log.clone()),
            Box::new(NoRepaint),
        );
        (s, log)
    }

    fn click(b: &mut PathBuilder, s: &mut EditSession, x: f64, y: f64, mods: Modifiers) {
        let e = MouseEvent::new((x, y), mods);
        b.left_down(e, s);
        b.left_up(e, s);
    }

    fn sp(s: &EditSession) -> &SubPath {
        s.path.as_ref().unwrap().active_subpath().unwrap()
    }

    #[test]
    fn open_path_is_finished_by_ctrl_click() {
        let (mut s, log) = session();
        let mut b = PathBuilder::new();
        click(&mut b, &mut s, 10.0, 10.0, Modifiers::NONE);
        click(&mut b, &mut s, 50.0, 10.0, Modifiers::NONE);
        click(&mut b, &mut s, 200.0, 300.0, Modifiers::ctrl());

        let path = s.path.as_ref().unwrap();
        assert_eq!(path.len(), 1);
        let sp = sp(&s);
        assert_eq!(sp.len(), 2);
        assert!(!sp.is_closed());
        assert!(sp.is_finished());
        for anchor in sp.anchors() {
            assert!(anchor.is_retracted(HandleSide::In));
            assert!(anchor.is_retracted(HandleSide::Out));
        }
        assert_eq!(PathBuilder::state(&s), BuildState::Idle);
        assert_eq!(
            log.kinds(),
            vec![EditType::SubPathStart, EditType::AddAnchorPoint, EditType::FinishSubPath]
        );
    }

    #[test]
    fn clicking_the_first_anchor_closes() {
        let (mut s, log) = session();
        let mut b = PathBuilder::new();
        for (x, y) in [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (0.0, 0.0)] {
            click(&mut b, &mut s, x, y, Modifiers::NONE);
        }
        let sp = sp(&s);
        assert!(sp.is_closed());
        assert!(sp.is_finished());
        assert_eq!(sp.len(), 4);
        let shape = s.path.as_ref().unwrap().to_image_shape();
        assert_eq!(shape.elements().last(), Some(&PathEl::ClosePath));
        assert_eq!(log.kinds().last(), Some(&EditType::CloseSubPath));
        assert_eq!(PathBuilder::state(&s), BuildState::Idle);
    }

    #[test]
    fn dragged_out_handle_is_smooth_after_release() {
        let (mut s, _) = session();
        let mut b = PathBuilder::new();
        b.left_down(MouseEvent::plain((50.0, 50.0)), &mut s);
        b.left_drag(MouseEvent::plain((60.0, 50.0)), &mut s);
        b.left_drag(MouseEvent::plain((70.0, 50.0)), &mut s);
        b.left_up(MouseEvent::plain((70.0, 50.0)), &mut s);

        let anchor = &sp(&s).anchors()[0];
        assert_eq!(anchor.ctrl_out().pos.im, Point::new(70.0, 50.0));
        assert_eq!(anchor.ctrl_in().pos.im, Point::new(30.0, 50.0));
        assert_eq!(anchor.handle_type(), HandleType::Smooth);
        assert_eq!(PathBuilder::state(&s), BuildState::MovingToNextAnchor);
        assert!(sp(&s).moving_point().is_some());
    }

    #[test]
    fn release_promotes_only_a_visible_handle() {
        let (mut s, _) = session();
        let mut b = PathBuilder::new();
        click(&mut b, &mut s, 10.0, 10.0, Modifiers::NONE);
        assert_eq!(sp(&s).anchors()[0].handle_type(), HandleType::Symmetric);

        b.left_down(MouseEvent::plain((100.0, 100.0)), &mut s);
        b.left_drag(MouseEvent::plain((140.0, 100.0)), &mut s);
        b.left_up(MouseEvent::plain((140.0, 100.0)), &mut s);
        let anchor = &sp(&s).anchors()[1];
        assert!(!anchor.is_retracted(HandleSide::Out));
        assert_eq!(anchor.handle_type(), HandleType::Smooth);
    }

    #[test]
    fn dragging_holds_the_handles_symmetric() {
        let (mut s, _) = session();
        let mut b = PathBuilder::new();
        b.left_down(MouseEvent::plain((50.0, 50.0)), &mut s);
        b.left_drag(MouseEvent::plain((70.0, 50.0)), &mut s);
        assert_eq!(sp(&s).anchors()[0].handle_type(), HandleType::Symmetric);
        assert_eq!(PathBuilder::state(&s), BuildState::DraggingLastControl);
    }

    #[test]
    fn dragged_anchor_stays_smooth_when_the_next_is_placed() {
        let (mut s, _) = session();
        let mut b = PathBuilder::new();
        b.left_down(MouseEvent::plain((50.0, 50.0)), &mut s);
        b.left_drag(MouseEvent::plain((70.0, 50.0)), &mut s);
        b.left_up(MouseEvent::plain((70.0, 50.0)), &mut s);
        click(&mut b, &mut s, 120.0, 80.0, Modifiers::NONE);
        assert_eq!(sp(&s).anchors()[0].handle_type(), HandleType::Smooth);
        // a plain click leaves the new anchor retracted and symmetric
        assert_eq!(sp(&s).anchors()[1].handle_type(), HandleType::Symmetric);
    }

    #[test]
    fn alt_click_on_nothing_places_a_cusp() {
        let (mut s, _) = session();
        let mut b = PathBuilder::new();
        click(&mut b, &mut s, 0.0, 0.0, Modifiers::NONE);
        b.left_down(MouseEvent::new((50.0, 50.0), Modifiers::alt()), &mut s);
        b.left_drag(MouseEvent::plain((70.0, 50.0)), &mut s);
        b.left_up(MouseEvent::plain((70.0, 50.0)), &mut s);

        let anchor = &sp(&s).anchors()[1];
        assert_eq!(anchor.handle_type(), HandleType::Cusp);
        assert_eq!(anchor.ctrl_out().pos.im, Point::new(70.0, 50.0));
        assert!(anchor.is_retracted(HandleSide::In));
    }

    #[test]
    fn alt_drag_while_building_breaks_the_handle() {
        let (mut s, _) = session();
        let mut b = PathBuilder::new();
        b.left_down(MouseEvent::plain((50.0, 50.0)), &mut s);
        b.left_drag(MouseEvent::new((70.0, 50.0), Modifiers::alt()), &mut s);
        b.left_up(MouseEvent::new((70.0, 50.0), Modifiers::alt()), &mut s);
        let anchor = &sp(&s).anchors()[0];
        assert_eq!(anchor.handle_type(), HandleType::Cusp);
        assert!(anchor.is_retracted(HandleSide::In));
        assert_eq!(PathBuilder::state(&s), BuildState::MoveEditingPrevious);
    }

    #[test]
    fn ctrl_drag_moves_an_earlier_anchor() {
        let (mut s, log) = session();
        let mut b = PathBuilder::new();
        click(&mut b, &mut s, 10.0, 10.0, Modifiers::NONE);
        click(&mut b, &mut s, 60.0, 10.0, Modifiers::NONE);

        b.left_down(MouseEvent::new((10.0, 10.0), Modifiers::ctrl()), &mut s);
        assert_eq!(PathBuilder::state(&s), BuildState::DragEditingPrevious);
        b.left_drag(MouseEvent::new((20.0, 30.0), Modifiers::ctrl()), &mut s);
        b.left_up(MouseEvent::plain((20.0, 30.0)), &mut s);

        assert_eq!(sp(&s).anchors()[0].im(), Point::new(20.0, 30.0));
        assert_eq!(sp(&s).len(), 2);
        assert_eq!(PathBuilder::state(&s), BuildState::MovingToNextAnchor);
        assert_eq!(log.kinds().last(), Some(&EditType::MoveHandle));
    }

    #[test]
    fn ctrl_click_without_moving_records_nothing() {
        let (mut s, log) = session();
        let mut b = PathBuilder::new();
        click(&mut b, &mut s, 10.0, 10.0, Modifiers::NONE);
        click(&mut b, &mut s, 60.0, 10.0, Modifiers::NONE);
        let before = log.len();
        click(&mut b, &mut s, 60.0, 10.0, Modifiers::ctrl());
        assert_eq!(log.len(), before);
        assert!(!sp(&s).is_finished());
    }

    #[test]
    fn shift_constrains_the_next_anchor() {
        let (mut s, _) = session();
        let mut b = PathBuilder::new();
        click(&mut b, &mut s, 0.0, 0.0, Modifiers::NONE);
        click(&mut b, &mut s, 100.0, 3.0, Modifiers::shift());
        let placed = sp(&s).anchors()[1].im();
        assert!((placed.y).abs() < 1e-9);
        assert!((placed.x - 100.045).abs() < 1e-3);
    }

    #[test]
    fn hovering_the_first_anchor_is_reported() {
        let (mut s, _) = session();
        let mut b = PathBuilder::new();
        click(&mut b, &mut s, 10.0, 10.0, Modifiers::NONE);
        click(&mut b, &mut s, 60.0, 10.0, Modifiers::NONE);
        b.mouse_moved(MouseEvent::plain((30.0, 40.0)), &mut s);
        assert!(!b.closable_hover());
        b.mouse_moved(MouseEvent::plain((12.0, 9.0)), &mut s);
        assert!(b.closable_hover());
        assert_eq!(sp(&s).moving_point().map(|p| p.im), Some(Point::new(12.0, 9.0)));
    }

    #[test]
    fn works_through_a_zoomed_view() {
        let (mut s, _) = session();
        s.set_view(ViewPort::new(2.0, Vec2::new(10.0, 10.0)));
        let mut b = PathBuilder::new();
        click(&mut b, &mut s, 30.0, 30.0, Modifiers::NONE);
        let anchor = &sp(&s).anchors()[0];
        assert_eq!(anchor.im(), Point::new(10.0, 10.0));
        assert_eq!(anchor.pos.co, Point::new(30.0, 30.0));
    }

    #[test]
    fn lost_release_is_recovered_on_the_next_press() {
        let (mut s, _) = session();
        let mut b = PathBuilder::new();
        b.left_down(MouseEvent::plain((10.0, 10.0)), &mut s);
        // release never arrives
        b.left_down(MouseEvent::plain((80.0, 10.0)), &mut s);
        assert_eq!(PathBuilder::state(&s), BuildState::DraggingLastControl);
        assert_eq!(sp(&s).len(), 2);
    }

    #[test]
    fn drag_in_a_moving_state_resyncs() {
        let (mut s, _) = session();
        let mut b = PathBuilder::new();
        click(&mut b, &mut s, 10.0, 10.0, Modifiers::NONE);
        b.left_drag(MouseEvent::plain((30.0, 10.0)), &mut s);
        assert_eq!(PathBuilder::state(&s), BuildState::DraggingLastControl);
        assert!(sp(&s).moving_point().is_none());
        b.left_up(MouseEvent::plain((30.0, 10.0)), &mut s);
        assert_eq!(PathBuilder::state(&s), BuildState::MovingToNextAnchor);
    }

    #[test]
    fn ending_the_mode_finishes_without_history() {
        let (mut s, log) = session();
        let mut b = PathBuilder::new();
        click(&mut b, &mut s, 10.0, 10.0, Modifiers::NONE);
        click(&mut b, &mut s, 60.0, 10.0, Modifiers::NONE);
        let recorded = log.len();
        b.mode_ended(&mut s);
        assert!(sp(&s).is_finished());
        assert!(sp(&s).moving_point().is_none());
        assert_eq!(PathBuilder::state(&s), BuildState::Idle);
        assert_eq!(log.len(), recorded);
    }

    #[test]
    fn every_event_sequence_keeps_the_path_consistent() {
        let (mut s, _) = session();
        let mut b = PathBuilder::new();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2000 {
            let pos = Point::new(
                f64::from(rng.random_range(0..8u8)) * 10.0,
                f64::from(rng.random_range(0..8u8)) * 10.0,
            );
            let mods = Modifiers {
                shift: rng.random_bool(0.2),
                ctrl: rng.random_bool(0.2),
                alt: rng.random_bool(0.2),
            };
            let event = MouseEvent::new(pos, mods);
            match rng.random_range(0..5u8) {
                0 => b.left_down(event, &mut s),
                1 => b.left_drag(event, &mut s),
                2 => b.left_up(event, &mut s),
                3 => b.mouse_moved(event, &mut s),
                _ => b.cancel(&mut s),
            }
            if let Some(path) = &s.path {
                assert!(path.check_consistency().is_ok());
                if let Some(sp) = path.active_subpath() {
                    if PathBuilder::state(&s).shows_rubber_band() {
                        assert!(!sp.is_finished());
                    }
                }
            }
        }
    }
}
