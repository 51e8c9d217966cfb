// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Scripted input replay.
//!
//! A script is a TOML list of steps, each a pointer event or a tool
//! command, fed through the same tools an interactive host would drive:
//!
//! ```toml
//! canvas = [400.0, 300.0]
//!
//! [[step]]
//! action = "down"
//! pos = [10.0, 10.0]
//!
//! [[step]]
//! action = "up"
//! pos = [10.0, 10.0]
//!
//! [[step]]
//! action = "down"
//! pos = [200.0, 200.0]
//! mods = ["ctrl"]
//! ```
//!
//! Failed commands (a nudge with nothing selected, edit mode without a
//! path) are logged and skipped like an interactive session would.

use crate::brush::{BrushKind, Symmetry};
use crate::config::Config;
use crate::editing::{ArrowKey, EditLog, EditSession, Modifiers, MouseDelegate, MouseEvent, NoRepaint, ViewPort};
use crate::tools::pen::PenModeKind;
use crate::tools::{ToolBox, ToolId};
use anyhow::{Context, Result, anyhow};
use kurbo::{BezPath, Point, Size, Vec2};
use serde::Deserialize;
use std::path::Path as FsPath;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModKey {
    Shift,
    Ctrl,
    Alt,
}

fn modifiers(keys: &[ModKey]) -> Modifiers {
    keys.iter().fold(Modifiers::NONE, |mut mods, key| {
        match key {
            ModKey::Shift => mods.shift = true,
            ModKey::Ctrl => mods.ctrl = true,
            ModKey::Alt => mods.alt = true,
        }
        mods
    })
}

/// One scripted input
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Tool {
        tool: ToolId,
    },
    Down {
        pos: [f64; 2],
        #[serde(default)]
        mods: Vec<ModKey>,
    },
    Drag {
        pos: [f64; 2],
        #[serde(default)]
        mods: Vec<ModKey>,
    },
    Up {
        pos: [f64; 2],
        #[serde(default)]
        mods: Vec<ModKey>,
    },
    Move {
        pos: [f64; 2],
        #[serde(default)]
        mods: Vec<ModKey>,
    },
    Cancel,
    Mode {
        mode: PenModeKind,
    },
    Key {
        key: ArrowKey,
        #[serde(default)]
        shift: bool,
    },
    Tick {
        ms: u64,
    },
    View {
        zoom: f64,
        #[serde(default)]
        offset: [f64; 2],
    },
    /// Import an SVG path string as new subpaths
    Import {
        svg: String,
    },
    Brush {
        kind: Option<BrushKind>,
        radius: Option<f64>,
        symmetry: Option<Symmetry>,
    },
    /// Paint along the current path with the brush tool
    Trace,
    Stroke {
        from: [f64; 2],
        to: [f64; 2],
    },
}

fn default_canvas() -> [f64; 2] {
    [800.0, 600.0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default = "default_canvas")]
    pub canvas: [f64; 2],
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid replay script")
    }

    pub fn load(path: &FsPath) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("failed to parse script {}", path.display()))
    }
}

/// Session and tool state driven by a script
#[derive(Debug)]
pub struct Replay {
    pub session: EditSession,
    pub edits: EditLog,
    tool: ToolBox,
}

impl Replay {
    pub fn new(config: Config, canvas: Size) -> Self {
        let edits = EditLog::new();
        let session = EditSession::with_collaborators(config, canvas, Box::new(edits.clone()), Box::new(NoRepaint));
        let tool = ToolBox::for_id(ToolId::Pen, &session);
        Self { session, edits, tool }
    }

    pub fn tool(&self) -> &ToolBox {
        &self.tool
    }

    pub fn run(&mut self, script: &Script) -> Result<()> {
        for (index, step) in script.steps.iter().enumerate() {
            self.step(step).with_context(|| format!("step {} ({step:?})", index + 1))?;
        }
        self.tool.deactivate(&mut self.session);
        tracing::info!(
            "replayed {} steps, {} edits recorded",
            script.steps.len(),
            self.edits.len()
        );
        Ok(())
    }

    pub fn step(&mut self, step: &Step) -> Result<()> {
        let session = &mut self.session;
        match step {
            Step::Tool { tool } => {
                if self.tool.id() != *tool {
                    self.tool.deactivate(session);
                    self.tool = ToolBox::for_id(*tool, session);
                }
            }
            Step::Down { pos, mods } => self.tool.left_down(event(*pos, mods), session),
            Step::Drag { pos, mods } => self.tool.left_drag(event(*pos, mods), session),
            Step::Up { pos, mods } => self.tool.left_up(event(*pos, mods), session),
            Step::Move { pos, mods } => self.tool.mouse_moved(event(*pos, mods), session),
            Step::Cancel => self.tool.cancel(session),
            Step::Mode { mode } => match &mut self.tool {
                ToolBox::Pen(pen) => {
                    if let Err(err) = pen.set_mode(*mode, session) {
                        tracing::warn!("cannot switch to {mode:?}: {err}");
                    }
                }
                ToolBox::Brush(_) => tracing::warn!("mode change ignored, the pen is not active"),
            },
            Step::Key { key, shift } => {
                if let Err(err) = self.tool.arrow_key(*key, *shift, session) {
                    tracing::warn!("nudge skipped: {err}");
                }
            }
            Step::Tick { ms } => self.tool.tick(Duration::from_millis(*ms), session),
            Step::View { zoom, offset } => {
                session.set_view(ViewPort::new(*zoom, Vec2::new(offset[0], offset[1])));
            }
            Step::Import { svg } => {
                let shape = BezPath::from_svg(svg).map_err(|e| anyhow!("bad SVG path data: {e}"))?;
                session.import_shape(&shape);
                if let ToolBox::Pen(pen) = &mut self.tool {
                    pen.path_replaced(session);
                }
            }
            Step::Brush {
                kind,
                radius,
                symmetry,
            } => {
                let ToolBox::Brush(brush) = &mut self.tool else {
                    return Err(anyhow!("brush settings need the brush tool"));
                };
                if let Some(kind) = kind {
                    brush.set_kind(*kind);
                }
                if let Some(radius) = radius {
                    brush.set_radius(*radius);
                }
                if let Some(symmetry) = symmetry {
                    brush.set_symmetry(*symmetry);
                }
            }
            Step::Trace => {
                let ToolBox::Brush(brush) = &mut self.tool else {
                    return Err(anyhow!("tracing needs the brush tool"));
                };
                match session.path.as_ref().map(|p| p.to_image_shape()) {
                    Some(shape) => brush.trace_path(&shape, session),
                    None => tracing::warn!("nothing to trace"),
                }
            }
            Step::Stroke { from, to } => {
                let ToolBox::Brush(brush) = &mut self.tool else {
                    return Err(anyhow!("strokes need the brush tool"));
                };
                brush.stroke_programmatically(point(*from), point(*to), session);
            }
        }
        Ok(())
    }
}

fn point(p: [f64; 2]) -> Point {
    Point::new(p[0], p[1])
}

fn event(pos: [f64; 2], mods: &[ModKey]) -> MouseEvent {
    MouseEvent::new(point(pos), modifiers(mods))
}
