// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Brush tool: paints mirrored dab or line strokes onto the layer

use super::{Tool, ToolId};
use crate::brush::{AngleSettings, BrushKind, DabsBrushSettings, Spacing, Symmetry, SymmetryBrush};
use crate::config::BrushConfig;
use crate::editing::{Edit, EditSession, MouseDelegate, MouseEvent};
use crate::settings;
use kurbo::{BezPath, PathEl, Point, Rect, Size};
use std::time::Duration;

pub fn clamp_radius(radius: f64) -> f64 {
    if !radius.is_finite() {
        return settings::brush::DEFAULT_RADIUS;
    }
    radius.clamp(settings::brush::MIN_RADIUS, settings::brush::MAX_RADIUS)
}

#[derive(Debug, Clone)]
pub struct BrushTool {
    brush: SymmetryBrush,
    /// Image position of the last stroke point
    last_im: Option<Point>,
    stroking: bool,
}

impl Default for BrushTool {
    fn default() -> Self {
        Self::from_config(&BrushConfig::default(), Size::ZERO)
    }
}

impl BrushTool {
    pub fn from_config(config: &BrushConfig, canvas: Size) -> Self {
        let settings = DabsBrushSettings::new(
            config.spacing,
            AngleSettings::new(config.angle_aware, config.max_jitter_degrees),
        );
        let brush = SymmetryBrush::new(
            config.kind,
            config.symmetry,
            clamp_radius(config.radius),
            canvas,
            settings,
            config.max_dabs_per_segment,
            config.seed,
        );
        Self {
            brush,
            last_im: None,
            stroking: false,
        }
    }

    pub fn brush(&self) -> &SymmetryBrush {
        &self.brush
    }

    pub fn radius(&self) -> f64 {
        self.brush.radius()
    }

    pub fn is_stroking(&self) -> bool {
        self.stroking
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.brush.set_radius(clamp_radius(radius));
    }

    pub fn set_kind(&mut self, kind: BrushKind) {
        self.brush.set_kind(kind);
    }

    pub fn set_symmetry(&mut self, symmetry: Symmetry) {
        self.brush.set_symmetry(symmetry);
    }

    pub fn set_spacing(&mut self, spacing: Spacing) {
        self.brush.set_spacing(spacing);
    }

    // ===== Stroke protocol =====

    fn begin(&mut self, im: Point, connect: bool, session: &mut EditSession) {
        if self.stroking {
            tracing::warn!("stroke started while another was active");
            self.end(session);
        }
        self.brush.set_canvas(session.canvas);
        let from = if connect { self.last_im } else { None };
        let mut ctx = session.brush_context();
        if from.is_some() {
            self.brush.begin_connected(im, &mut ctx);
        } else {
            self.brush.begin_stroke(im, &mut ctx);
        }
        self.stroking = true;
        self.repaint_between(from.unwrap_or(im), im, session);
        self.last_im = Some(im);
    }

    fn step(&mut self, im: Point, session: &mut EditSession) {
        if !self.stroking {
            tracing::debug!("stroke continued without a start");
            self.begin(im, false, session);
            return;
        }
        self.brush.continue_to(im, &mut session.brush_context());
        let from = self.last_im.unwrap_or(im);
        self.repaint_between(from, im, session);
        self.last_im = Some(im);
    }

    fn end(&mut self, session: &mut EditSession) {
        if !self.stroking {
            return;
        }
        self.brush.finish();
        self.stroking = false;
        let Some(rect) = self.brush.affected_rect(settings::brush::AFFECTED_AREA_MARGIN) else {
            return;
        };
        let canvas = Rect::from_origin_size(Point::ORIGIN, session.canvas);
        let region = rect.intersect(canvas);
        tracing::debug!("{} stroke touched {:?}", self.brush.kind().name(), region);
        session.record_edit(Edit::BrushStroke {
            brush: self.brush.kind().name(),
            region,
        });
    }

    /// Region between two consecutive stroke points, grown by the diameter
    fn repaint_between(&self, from: Point, to: Point, session: &mut EditSession) {
        let diameter = 2.0 * self.brush.radius();
        let region = Rect::from_points(from, to).inflate(diameter, diameter);
        let co = session.viewport.affine().transform_rect_bbox(region);
        session.request_repaint(co);
    }

    /// Timer callback; drives spray bursts while the button is down
    pub fn tick(&mut self, elapsed: Duration, session: &mut EditSession) {
        if !self.stroking {
            return;
        }
        self.brush.tick(elapsed, &mut session.brush_context());
        if let Some(p) = self.last_im {
            self.repaint_between(p, p, session);
        }
    }

    /// Paint along an outline, one stroke per subpath
    pub fn trace_path(&mut self, shape: &BezPath, session: &mut EditSession) {
        let mut start = None;
        kurbo::flatten(shape, settings::brush::TRACE_FLATTEN_TOLERANCE, |el| match el {
            PathEl::MoveTo(p) => {
                self.end(session);
                self.begin(p, false, session);
                start = Some(p);
            }
            PathEl::LineTo(p) => self.step(p, session),
            PathEl::ClosePath => {
                if let Some(p) = start {
                    self.step(p, session);
                }
            }
            // flatten only emits the three above
            PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
        });
        self.end(session);
    }

    /// A straight stroke from `start` to `end`
    pub fn stroke_programmatically(&mut self, start: Point, end: Point, session: &mut EditSession) {
        self.begin(start, false, session);
        self.step(end, session);
        self.end(session);
    }

    pub fn dispose(&mut self) {
        self.brush.dispose();
        self.stroking = false;
    }
}

impl Tool for BrushTool {
    fn id(&self) -> ToolId {
        ToolId::Brush
    }
}

impl MouseDelegate for BrushTool {
    type Data = EditSession;

    fn left_down(&mut self, event: MouseEvent, session: &mut EditSession) {
        let im = session.to_image(event.pos);
        self.begin(im, event.mods.shift, session);
    }

    fn left_drag(&mut self, event: MouseEvent, session: &mut EditSession) {
        let im = session.to_image(event.pos);
        self.step(im, session);
    }

    fn left_up(&mut self, event: MouseEvent, session: &mut EditSession) {
        if self.stroking {
            let im = session.to_image(event.pos);
            if self.last_im != Some(im) {
                self.step(im, session);
            }
        }
        self.end(session);
    }

    fn cancel(&mut self, session: &mut EditSession) {
        self.end(session);
    }
}
