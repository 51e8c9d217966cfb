// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Kinds of undoable edits

/// Type of edit being recorded
///
/// The name is what an undo menu would show. Consecutive nudges in the same
/// direction may be combined into one undo step by the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditType {
    SubPathStart,
    AddAnchorPoint,
    CloseSubPath,
    FinishSubPath,
    /// An anchor or handle was dragged
    MoveHandle,
    RetractHandles,
    ChangeHandleType,
    DeleteAnchorPoint,
    DeleteSubPath,
    DeletePath,
    ReversePath,
    SplitSubPath,
    TransformPath,
    ImportShape,
    NudgeUp,
    NudgeDown,
    NudgeLeft,
    NudgeRight,
    BrushStroke,
}

impl EditType {
    pub fn name(self) -> &'static str {
        match self {
            EditType::SubPathStart => "Subpath Start",
            EditType::AddAnchorPoint => "Add Anchor Point",
            EditType::CloseSubPath => "Close Subpath",
            EditType::FinishSubPath => "Finish Subpath",
            EditType::MoveHandle => "Move Handle",
            EditType::RetractHandles => "Retract Handles",
            EditType::ChangeHandleType => "Change Anchor Type",
            EditType::DeleteAnchorPoint => "Delete Anchor Point",
            EditType::DeleteSubPath => "Delete Subpath",
            EditType::DeletePath => "Delete Path",
            EditType::ReversePath => "Reverse Path",
            EditType::SplitSubPath => "Split Subpath",
            EditType::TransformPath => "Transform Path",
            EditType::ImportShape => "Import Shape",
            EditType::NudgeUp | EditType::NudgeDown | EditType::NudgeLeft | EditType::NudgeRight => "Nudge",
            EditType::BrushStroke => "Brush Stroke",
        }
    }

    /// Whether an edit of this type can be folded into a preceding one
    pub fn combines_with(self, previous: EditType) -> bool {
        self == previous
            && matches!(
                self,
                EditType::NudgeUp | EditType::NudgeDown | EditType::NudgeLeft | EditType::NudgeRight
            )
    }
}
