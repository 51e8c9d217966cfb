// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod edit_types;
pub mod mouse;
pub mod repaint;
pub mod session;
pub mod undo;
pub mod viewport;

pub use edit_types::EditType;
pub use mouse::{ArrowKey, Modifiers, MouseDelegate, MouseEvent};
pub use repaint::{NoRepaint, RepaintLog, RepaintSink};
pub use session::{EditSession, nudge_amount};
pub use undo::{Edit, EditHistory, EditLog};
pub use viewport::{ViewPort, ViewTransform};
