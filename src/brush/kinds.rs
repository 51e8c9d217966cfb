// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! The concrete brushes

use super::dabs::LinearDabs;
use super::history::StrokeHistory;
use super::settings::DabsBrushSettings;
use super::timer::StrokeTimer;
use super::{Dab, PaintTarget};
use crate::settings;
use kurbo::{Point, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::f64::consts::TAU;
use std::time::Duration;

/// Selects the brush implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrushKind {
    /// Continuous line segments between pointer positions
    Stroke,
    /// Stamps placed at uniform spacing
    #[default]
    Dabs,
    /// Random particles around the pointer, on a timer
    Spray,
    /// Lines to nearby earlier points of the stroke history
    Connect,
}

impl BrushKind {
    pub fn name(self) -> &'static str {
        match self {
            BrushKind::Stroke => "Stroke",
            BrushKind::Dabs => "Dabs",
            BrushKind::Spray => "Spray",
            BrushKind::Connect => "Connect",
        }
    }
}

/// What a brush may touch besides its own state during one call
pub struct BrushContext<'a> {
    pub target: &'a mut dyn PaintTarget,
    pub history: &'a mut StrokeHistory,
}

/// Per-stroke painting protocol, in image coordinates
pub trait Brush {
    fn start_at(&mut self, p: Point, ctx: &mut BrushContext<'_>);

    fn continue_to(&mut self, p: Point, ctx: &mut BrushContext<'_>);

    /// End of stroke
    fn finish(&mut self) {}

    /// Timer callback while the stroke is active
    fn tick(&mut self, _elapsed: Duration, _ctx: &mut BrushContext<'_>) {}

    fn radius(&self) -> f64;

    fn set_radius(&mut self, radius: f64);

    /// Last position this brush painted at
    fn previous(&self) -> Option<Point>;

    fn set_previous(&mut self, p: Point);

    /// Release everything the brush holds. Must be safe after `finish`.
    fn dispose(&mut self) {
        self.finish();
    }
}

// ===== Stroke =====

#[derive(Debug, Clone)]
pub struct StrokeBrush {
    radius: f64,
    previous: Option<Point>,
}

impl StrokeBrush {
    pub fn new(radius: f64) -> Self {
        Self { radius, previous: None }
    }
}

impl Brush for StrokeBrush {
    fn start_at(&mut self, p: Point, ctx: &mut BrushContext<'_>) {
        ctx.target.draw_line(p, p, self.radius);
        self.previous = Some(p);
    }

    fn continue_to(&mut self, p: Point, ctx: &mut BrushContext<'_>) {
        let from = self.previous.unwrap_or(p);
        ctx.target.draw_line(from, p, self.radius);
        self.previous = Some(p);
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    fn previous(&self) -> Option<Point> {
        self.previous
    }

    fn set_previous(&mut self, p: Point) {
        self.previous = Some(p);
    }
}

// ===== Dabs =====

#[derive(Debug, Clone)]
pub struct DabsBrush {
    radius: f64,
    dabs: LinearDabs,
}

impl DabsBrush {
    pub fn new(radius: f64, settings: &DabsBrushSettings, max_dabs_per_segment: Option<usize>, seed: u64) -> Self {
        Self {
            radius,
            dabs: LinearDabs::new(settings.spacing(), settings.angle(), max_dabs_per_segment, seed),
        }
    }

    pub fn placement(&self) -> &LinearDabs {
        &self.dabs
    }

    pub fn settings_changed(&mut self, settings: &DabsBrushSettings) {
        self.dabs.apply_settings(settings.spacing(), settings.angle());
    }
}

impl Brush for DabsBrush {
    fn start_at(&mut self, p: Point, ctx: &mut BrushContext<'_>) {
        self.dabs.start(p, self.radius, ctx.target);
    }

    fn continue_to(&mut self, p: Point, ctx: &mut BrushContext<'_>) {
        self.dabs.advance(p, self.radius, ctx.target);
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    fn previous(&self) -> Option<Point> {
        self.dabs.prev()
    }

    fn set_previous(&mut self, p: Point) {
        self.dabs.set_prev(p);
    }
}

// ===== Spray =====

#[derive(Debug, Clone)]
pub struct SprayBrush {
    radius: f64,
    previous: Option<Point>,
    timer: StrokeTimer,
    rng: StdRng,
    dabs_per_tick: usize,
}

impl SprayBrush {
    pub fn new(radius: f64, seed: u64) -> Self {
        Self {
            radius,
            previous: None,
            timer: StrokeTimer::new(Duration::from_millis(settings::brush::spray::INTERVAL_MS)),
            rng: StdRng::seed_from_u64(seed),
            dabs_per_tick: settings::brush::spray::DABS_PER_TICK,
        }
    }

    pub fn is_spraying(&self) -> bool {
        self.timer.is_running()
    }

    fn burst(&mut self, ctx: &mut BrushContext<'_>) {
        let Some(center) = self.previous else {
            return;
        };
        let particle = (self.radius / 10.0).max(0.5);
        for _ in 0..self.dabs_per_tick {
            // sqrt keeps the particle density uniform over the disk
            let dist = self.radius * self.rng.random::<f64>().sqrt();
            let angle = TAU * self.rng.random::<f64>();
            ctx.target.put_dab(Dab {
                pos: center + Vec2::from_angle(angle) * dist,
                radius: particle,
                angle: 0.0,
            });
        }
    }
}

impl Brush for SprayBrush {
    fn start_at(&mut self, p: Point, ctx: &mut BrushContext<'_>) {
        self.previous = Some(p);
        self.timer.start();
        self.burst(ctx);
    }

    fn continue_to(&mut self, p: Point, _ctx: &mut BrushContext<'_>) {
        self.previous = Some(p);
    }

    fn finish(&mut self) {
        self.timer.stop();
    }

    fn tick(&mut self, elapsed: Duration, ctx: &mut BrushContext<'_>) {
        for _ in 0..self.timer.advance(elapsed) {
            self.burst(ctx);
        }
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    fn previous(&self) -> Option<Point> {
        self.previous
    }

    fn set_previous(&mut self, p: Point) {
        self.previous = Some(p);
    }
}

// ===== Connect =====

#[derive(Debug, Clone)]
pub struct ConnectBrush {
    radius: f64,
    previous: Option<Point>,
}

impl ConnectBrush {
    pub fn new(radius: f64) -> Self {
        Self { radius, previous: None }
    }

    fn reach(&self) -> f64 {
        self.radius * settings::brush::connect::REACH_FACTOR
    }
}

impl Brush for ConnectBrush {
    fn start_at(&mut self, p: Point, ctx: &mut BrushContext<'_>) {
        self.previous = Some(p);
        ctx.history.push(p);
    }

    fn continue_to(&mut self, p: Point, ctx: &mut BrushContext<'_>) {
        let thin = (self.radius / 10.0).max(0.5);
        if let Some(prev) = self.previous {
            ctx.target.draw_line(prev, p, thin);
        }
        let near: Vec<Point> = ctx.history.near(p, self.reach()).collect();
        for q in near {
            ctx.target.draw_line(p, q, thin);
        }
        ctx.history.push(p);
        self.previous = Some(p);
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    fn previous(&self) -> Option<Point> {
        self.previous
    }

    fn set_previous(&mut self, p: Point) {
        self.previous = Some(p);
    }
}

// ===== AnyBrush =====

/// Enum wrapping all brush types
#[derive(Debug, Clone)]
pub enum AnyBrush {
    Stroke(StrokeBrush),
    Dabs(DabsBrush),
    Spray(SprayBrush),
    Connect(ConnectBrush),
}

impl AnyBrush {
    pub fn new(
        kind: BrushKind,
        radius: f64,
        settings: &DabsBrushSettings,
        max_dabs_per_segment: Option<usize>,
        seed: u64,
    ) -> Self {
        match kind {
            BrushKind::Stroke => AnyBrush::Stroke(StrokeBrush::new(radius)),
            BrushKind::Dabs => AnyBrush::Dabs(DabsBrush::new(radius, settings, max_dabs_per_segment, seed)),
            BrushKind::Spray => AnyBrush::Spray(SprayBrush::new(radius, seed)),
            BrushKind::Connect => AnyBrush::Connect(ConnectBrush::new(radius)),
        }
    }

    pub fn kind(&self) -> BrushKind {
        match self {
            AnyBrush::Stroke(_) => BrushKind::Stroke,
            AnyBrush::Dabs(_) => BrushKind::Dabs,
            AnyBrush::Spray(_) => BrushKind::Spray,
            AnyBrush::Connect(_) => BrushKind::Connect,
        }
    }

    /// Only dab brushes cache the shared settings
    pub fn settings_changed(&mut self, settings: &DabsBrushSettings) {
        if let AnyBrush::Dabs(brush) = self {
            brush.settings_changed(settings);
        }
    }

    fn inner(&self) -> &dyn Brush {
        match self {
            AnyBrush::Stroke(b) => b,
            AnyBrush::Dabs(b) => b,
            AnyBrush::Spray(b) => b,
            AnyBrush::Connect(b) => b,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Brush {
        match self {
            AnyBrush::Stroke(b) => b,
            AnyBrush::Dabs(b) => b,
            AnyBrush::Spray(b) => b,
            AnyBrush::Connect(b) => b,
        }
    }
}

impl Brush for AnyBrush {
    fn start_at(&mut self, p: Point, ctx: &mut BrushContext<'_>) {
        self.inner_mut().start_at(p, ctx);
    }

    fn continue_to(&mut self, p: Point, ctx: &mut BrushContext<'_>) {
        self.inner_mut().continue_to(p, ctx);
    }

    fn finish(&mut self) {
        self.inner_mut().finish();
    }

    fn tick(&mut self, elapsed: Duration, ctx: &mut BrushContext<'_>) {
        self.inner_mut().tick(elapsed, ctx);
    }

    fn radius(&self) -> f64 {
        self.inner().radius()
    }

    fn set_radius(&mut self, radius: f64) {
        self.inner_mut().set_radius(radius);
    }

    fn previous(&self) -> Option<Point> {
        self.inner().previous()
    }

    fn set_previous(&mut self, p: Point) {
        self.inner_mut().set_previous(p);
    }

    fn dispose(&mut self) {
        self.inner_mut().dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::{Mark, MarkRecorder};

    fn run<F: FnOnce(&mut BrushContext<'_>)>(history: &mut StrokeHistory, f: F) -> MarkRecorder {
        let mut rec = MarkRecorder::default();
        {
            let mut ctx = BrushContext {
                target: &mut rec,
                history,
            };
            f(&mut ctx);
        }
        rec
    }

    #[test]
    fn stroke_brush_draws_connected_lines() {
        let mut history = StrokeHistory::new();
        let mut brush = StrokeBrush::new(3.0);
        let rec = run(&mut history, |ctx| {
            brush.start_at(Point::new(0.0, 0.0), ctx);
            brush.continue_to(Point::new(10.0, 0.0), ctx);
            brush.continue_to(Point::new(10.0, 10.0), ctx);
        });
        assert_eq!(rec.marks.len(), 3);
        assert_eq!(
            rec.marks[2],
            Mark::Line {
                from: Point::new(10.0, 0.0),
                to: Point::new(10.0, 10.0),
                radius: 3.0
            }
        );
    }

    #[test]
    fn spray_bursts_on_timer_until_finished() {
        let mut history = StrokeHistory::new();
        let mut brush = SprayBrush::new(10.0, 3);
        let interval = Duration::from_millis(settings::brush::spray::INTERVAL_MS);
        let per_tick = settings::brush::spray::DABS_PER_TICK;
        let rec = run(&mut history, |ctx| {
            brush.start_at(Point::new(50.0, 50.0), ctx);
            brush.tick(interval * 2, ctx);
            brush.finish();
            brush.tick(interval * 5, ctx);
        });
        assert_eq!(rec.marks.len(), 3 * per_tick);
        assert!(!brush.is_spraying());
        for mark in &rec.marks {
            if let Mark::Dab(dab) = mark {
                assert!(dab.pos.distance(Point::new(50.0, 50.0)) <= 10.0 + 1e-9);
            }
        }
    }

    #[test]
    fn spray_dispose_after_finish_is_safe() {
        let mut brush = SprayBrush::new(10.0, 3);
        brush.finish();
        brush.dispose();
        assert!(!brush.is_spraying());
    }

    #[test]
    fn connect_brush_links_to_shared_history() {
        let mut history = StrokeHistory::new();
        history.push(Point::new(12.0, 0.0));
        history.push(Point::new(500.0, 0.0));
        let mut brush = ConnectBrush::new(10.0);
        let rec = run(&mut history, |ctx| {
            brush.start_at(Point::new(0.0, 0.0), ctx);
            brush.continue_to(Point::new(5.0, 0.0), ctx);
        });
        // stroke segment, then links to (12,0) and (0,0)
        assert_eq!(rec.marks.len(), 3);
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn any_brush_reports_kind_and_radius() {
        let settings = DabsBrushSettings::default();
        let mut brush = AnyBrush::new(BrushKind::Dabs, 4.0, &settings, None, 1);
        assert_eq!(brush.kind(), BrushKind::Dabs);
        brush.set_radius(8.0);
        assert_eq!(brush.radius(), 8.0);
    }
}
