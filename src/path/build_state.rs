// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Interaction state of a path under construction

/// Where the pen is in building the active subpath.
///
/// Each state is either a dragging state (the button is down) or a moving
/// state (the button is up). Events that contradict this are treated as
/// lost events and the builder resynchronizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildState {
    /// No subpath is being built
    #[default]
    Idle,
    /// The outgoing handle of the last anchor follows the pointer
    DraggingLastControl,
    /// The rubber band follows the pointer towards the next anchor
    MovingToNextAnchor,
    /// An existing handle is dragged with a modifier held
    DragEditingPrevious,
    /// Moving with a modifier held, ready to edit an existing handle
    MoveEditingPrevious,
}

impl BuildState {
    pub fn is_dragging(self) -> bool {
        match self {
            BuildState::Idle => false,
            BuildState::DraggingLastControl => true,
            BuildState::MovingToNextAnchor => false,
            BuildState::DragEditingPrevious => true,
            BuildState::MoveEditingPrevious => false,
        }
    }

    /// Whether the rubber band should be drawn in this state
    pub fn shows_rubber_band(self) -> bool {
        self == BuildState::MovingToNextAnchor
    }
}
