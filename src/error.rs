// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the path model.
//!
//! Invariant violations are modeling bugs: `report_violation` panics in
//! debug builds and logs in release builds so an interactive session is
//! never torn down by one.

use crate::model::EntityId;
use thiserror::Error;

/// Errors produced by path model operations and consistency checks
#[derive(Debug, Error)]
pub enum PathError {
    #[error("there is no path to edit")]
    NoPath,

    #[error("subpath index {0} is out of range")]
    SubPathIndex(usize),

    #[error("anchor index {index} is out of range for a subpath with {len} anchors")]
    AnchorIndex { index: usize, len: usize },

    #[error("subpath {subpath} has no anchor {anchor}")]
    MissingAnchor { subpath: usize, anchor: usize },

    #[error("no handle or transform box is active")]
    NoActiveHandle,

    #[error("subpath {0} has no anchors")]
    EmptySubPath(EntityId),

    #[error("subpath {0} is closed but not finished")]
    ClosedNotFinished(EntityId),

    #[error("subpath {0} is finished but still has a moving point")]
    FinishedWithMovingPoint(EntityId),

    #[error("anchor {index} of subpath {id} has a non-finite coordinate")]
    NonFiniteCoordinate { id: EntityId, index: usize },

    #[error("anchor {index} of subpath {id} has an invalid remembered handle distance")]
    InvalidRememberedDistance { id: EntityId, index: usize },

    #[error("active subpath index {active} is out of range for {len} subpaths")]
    ActiveIndex { active: usize, len: usize },

    #[error("malformed path document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Surface an invariant violation.
///
/// Fatal in debug builds. In release builds the error is logged and the
/// caller continues with its best-effort state.
pub fn report_violation(err: &PathError) {
    if cfg!(debug_assertions) {
        panic!("path invariant violated: {err}");
    }
    tracing::error!("path invariant violated: {err}");
}
