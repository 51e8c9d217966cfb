// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Identity types shared by the path model

pub mod entity_id;

pub use entity_id::EntityId;
