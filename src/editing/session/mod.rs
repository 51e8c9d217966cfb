// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit session - the document state the tools work on

mod hit_testing;
mod path_editing;

pub use path_editing::nudge_amount;

use super::repaint::{NoRepaint, RepaintSink};
use super::undo::{Edit, EditHistory, EditLog};
use super::viewport::{ViewPort, ViewTransform};
use super::EditType;
use crate::brush::{BrushContext, MarkRecorder, StrokeHistory};
use crate::config::Config;
use crate::path::{Path, Tolerances};
use anyhow::{Context, Result};
use kurbo::{Affine, BezPath, Point, Rect, Size};
use std::path::Path as FsPath;

/// Editing session for one image.
///
/// Holds the active path (if any), the view that maps it onto the
/// screen, and the collaborators that receive undo records and repaint
/// requests. Tools get `&mut EditSession` for every event.
#[derive(Debug)]
pub struct EditSession {
    /// The active pen path
    pub path: Option<Path>,

    /// Component <-> image mapping
    pub viewport: ViewPort,

    /// Image size in pixels, used by mirrored brushes
    pub canvas: Size,

    pub config: Config,

    /// Marks painted on the active layer
    pub layer: MarkRecorder,

    /// Points visited by connect-brush strokes, shared by all replicas
    pub stroke_history: StrokeHistory,

    /// Whether the path was drawn with the pen rather than imported.
    /// Decides how handle types are prepared for node editing.
    pub built_interactively: bool,

    history: Box<dyn EditHistory>,
    repaint: Box<dyn RepaintSink>,
}

impl EditSession {
    /// Session with an in-memory history and no repaint target
    pub fn new(config: Config, canvas: Size) -> Self {
        Self::with_collaborators(config, canvas, Box::new(EditLog::new()), Box::new(NoRepaint))
    }

    pub fn with_collaborators(
        config: Config,
        canvas: Size,
        history: Box<dyn EditHistory>,
        repaint: Box<dyn RepaintSink>,
    ) -> Self {
        Self {
            path: None,
            viewport: ViewPort::default(),
            canvas,
            config,
            layer: MarkRecorder::new(),
            stroke_history: StrokeHistory::new(),
            built_interactively: true,
            history,
            repaint,
        }
    }

    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    pub fn tolerances(&self) -> Tolerances {
        self.config.path.tolerances
    }

    pub fn handle_radius(&self) -> f64 {
        self.config.path.handle_radius
    }

    pub fn to_image(&self, co: Point) -> Point {
        self.viewport.component_to_image(co)
    }

    pub fn to_component(&self, im: Point) -> Point {
        self.viewport.image_to_component(im)
    }

    /// Paint target and shared stroke state for one brush call
    pub fn brush_context(&mut self) -> BrushContext<'_> {
        BrushContext {
            target: &mut self.layer,
            history: &mut self.stroke_history,
        }
    }

    // ===== Collaborators =====

    /// Immutable copy of the current path for an undo record
    pub fn snapshot(&self) -> Option<Path> {
        self.path.as_ref().map(Path::deep_copy)
    }

    /// Record a path edit whose "before" state was captured earlier; the
    /// "after" state is taken now.
    pub fn record_path_edit(&mut self, kind: EditType, before: Option<Path>) {
        let after = self.snapshot();
        self.history.record_edit(Edit::Path { kind, before, after });
    }

    pub fn record_edit(&mut self, edit: Edit) {
        self.history.record_edit(edit);
    }

    pub fn request_repaint(&mut self, region: Rect) {
        self.repaint.request_repaint(region);
    }

    /// Repaint the area covered by the path and its handles
    pub fn repaint_path(&mut self) {
        let radius = self.handle_radius();
        if let Some(bounds) = self.path.as_ref().and_then(Path::co_repaint_bounds) {
            self.repaint.request_repaint(bounds.inflate(radius, radius));
        }
    }

    // ===== Coordinate changes =====

    /// Replace the view (zoom, pan, rotation) and refresh component
    /// coordinates
    pub fn set_view(&mut self, viewport: ViewPort) {
        self.viewport = viewport;
        if let Some(path) = &mut self.path {
            path.sync_co(&self.viewport);
        }
        self.repaint_path();
    }

    /// Follow a transform of the image itself (crop, rotate, resize)
    pub fn image_transformed(&mut self, affine: Affine, canvas: Size) {
        self.canvas = canvas;
        if let Some(path) = &mut self.path {
            path.im_coords_changed(affine, &self.viewport);
        }
        self.repaint_path();
    }

    // ===== Path import and persistence =====

    /// Add an outline to the path, e.g. one converted from a selection
    pub fn import_shape(&mut self, shape: &BezPath) {
        let tol = self.tolerances();
        let imported = Path::from_bez_path(shape, &self.viewport, &tol);
        if imported.is_empty() {
            tracing::warn!("import produced no usable subpaths");
            return;
        }
        let before = self.snapshot();
        match &mut self.path {
            Some(path) => path.append(imported),
            None => self.path = Some(imported),
        }
        self.built_interactively = false;
        self.record_path_edit(EditType::ImportShape, before);
        self.repaint_path();
    }

    pub fn path_to_json(&self) -> Result<String> {
        match &self.path {
            Some(path) => Ok(path.to_json()?),
            None => Ok(Path::new().to_json()?),
        }
    }

    pub fn load_path_json(&mut self, json: &str) -> Result<()> {
        let path = Path::from_json(json, &self.viewport).context("failed to read path document")?;
        self.path = (!path.is_empty()).then_some(path);
        self.built_interactively = false;
        self.repaint_path();
        Ok(())
    }

    pub fn save_path(&self, file: &FsPath) -> Result<()> {
        let json = self.path_to_json()?;
        std::fs::write(file, json).with_context(|| format!("failed to write {}", file.display()))?;
        tracing::info!("saved path to {}", file.display());
        Ok(())
    }

    pub fn load_path(&mut self, file: &FsPath) -> Result<()> {
        let json = std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
        self.load_path_json(&json)
            .with_context(|| format!("failed to load {}", file.display()))
    }
}
