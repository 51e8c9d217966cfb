// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer events as seen by the tools

use kurbo::{Point, Vec2};
use serde::Deserialize;

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    /// Ctrl or alt, the keys that redirect the pen to editing
    pub fn edits_previous(&self) -> bool {
        self.ctrl || self.alt
    }
}

/// A pointer event in component space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub pos: Point,
    pub mods: Modifiers,
}

impl MouseEvent {
    pub fn new(pos: impl Into<Point>, mods: Modifiers) -> Self {
        Self {
            pos: pos.into(),
            mods,
        }
    }

    pub fn plain(pos: impl Into<Point>) -> Self {
        Self::new(pos, Modifiers::NONE)
    }
}

/// Arrow keys, used for nudging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowKey {
    Up,
    Down,
    Left,
    Right,
}

impl ArrowKey {
    /// Unit direction in image space (y grows downwards)
    pub fn direction(self) -> Vec2 {
        match self {
            ArrowKey::Up => Vec2::new(0.0, -1.0),
            ArrowKey::Down => Vec2::new(0.0, 1.0),
            ArrowKey::Left => Vec2::new(-1.0, 0.0),
            ArrowKey::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Receives the primary-button pointer protocol.
///
/// Every method has a default no-op so a tool only implements what it
/// reacts to.
pub trait MouseDelegate {
    type Data;

    fn left_down(&mut self, _event: MouseEvent, _data: &mut Self::Data) {}

    fn left_drag(&mut self, _event: MouseEvent, _data: &mut Self::Data) {}

    fn left_up(&mut self, _event: MouseEvent, _data: &mut Self::Data) {}

    fn mouse_moved(&mut self, _event: MouseEvent, _data: &mut Self::Data) {}

    /// The gesture was aborted (tool switch, focus loss)
    fn cancel(&mut self, _data: &mut Self::Data) {}
}
