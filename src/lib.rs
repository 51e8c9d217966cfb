// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Pixelpen: Bezier pen paths and dab-sampled brush strokes for a raster
//! editor core.

pub mod brush;
pub mod config;
pub mod editing;
pub mod error;
pub mod model;
pub mod path;
pub mod replay;
pub mod settings;
pub mod tools;

use anyhow::Result;
use config::Config;
use kurbo::Size;
use replay::{Replay, Script};
use std::path::PathBuf;

/// Entry point for the command-line replayer
pub fn run() -> Result<()> {
    // Verbosity can be raised via RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("pixelpen=info".parse()?))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(script_path) = args.next().map(PathBuf::from) else {
        tracing::error!("Usage: pixelpen <script.toml> [config.toml]");
        return Ok(());
    };
    let config = match args.next().map(PathBuf::from) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    let script = Script::load(&script_path)?;
    let mut replay = Replay::new(config, Size::new(script.canvas[0], script.canvas[1]));
    replay.run(&script)?;

    println!("{}", replay.session.path_to_json()?);
    let layer = &replay.session.layer;
    println!(
        "{} dabs, {} lines, {} edits",
        layer.dab_count(),
        layer.line_count(),
        replay.edits.len()
    );
    Ok(())
}
