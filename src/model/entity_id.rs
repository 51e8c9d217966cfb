// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Stable identifiers for subpaths.
//!
//! Each `EntityId` is a monotonically increasing `u64` generated from a global
//! atomic counter. A subpath keeps its id across deep copies, so undo
//! snapshots and the live subpath can be matched up, while indices shift
//! freely as subpaths are added and deleted.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier for a subpath
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

static ENTITY_COUNTER: AtomicU64 = AtomicU64::new(1);

impl EntityId {
    /// Create a new unique entity ID
    pub fn next() -> Self {
        Self(ENTITY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::next()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SP{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = EntityId::next();
        let b = EntityId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn display_uses_subpath_prefix() {
        let id = EntityId::next();
        assert!(id.to_string().starts_with("SP"));
    }
}
