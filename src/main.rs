// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Pixelpen: replay scripted pen and brush input

fn main() -> anyhow::Result<()> {
    pixelpen::run()
}
