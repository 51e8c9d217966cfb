// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! The repaint collaborator

use kurbo::Rect;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Receives dirty regions in component space
pub trait RepaintSink: fmt::Debug {
    fn request_repaint(&mut self, region: Rect);
}

/// Ignores repaint requests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRepaint;

impl RepaintSink for NoRepaint {
    fn request_repaint(&mut self, _region: Rect) {}
}

/// Collects repaint requests. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct RepaintLog {
    regions: Rc<RefCell<Vec<Rect>>>,
}

impl RepaintLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(&self) -> Vec<Rect> {
        self.regions.borrow().clone()
    }

    pub fn clear(&self) {
        self.regions.borrow_mut().clear();
    }
}

impl RepaintSink for RepaintLog {
    fn request_repaint(&mut self, region: Rect) {
        self.regions.borrow_mut().push(region);
    }
}
