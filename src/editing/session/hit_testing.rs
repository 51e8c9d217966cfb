// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Hit testing methods for EditSession. Positions are in component space.

use super::EditSession;
use crate::path::HandleRef;
use kurbo::Point;

impl EditSession {
    /// The handle under the pointer, if any
    pub fn find_handle(&self, co_pos: Point, alt: bool) -> Option<HandleRef> {
        let radius = self.handle_radius();
        let hit = self.path.as_ref()?.find_handle_at(co_pos, alt, radius);
        if let Some(handle) = hit {
            tracing::debug!(
                "hit {:?} of anchor {} in subpath {} at ({:.1}, {:.1})",
                handle.part,
                handle.anchor,
                handle.subpath,
                co_pos.x,
                co_pos.y
            );
        }
        hit
    }

    /// Whether a press at `co_pos` would close the active subpath
    pub fn can_close_active_at(&self, co_pos: Point) -> bool {
        let radius = self.handle_radius();
        self.path
            .as_ref()
            .and_then(|p| p.active_subpath())
            .is_some_and(|sp| !sp.is_finished() && sp.can_close_at(co_pos, radius))
    }
}
