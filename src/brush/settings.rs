// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Dab settings shared by all symmetry replicas of a brush.
//!
//! The settings object keeps a list of brush slots (indices into the
//! owner's brush table). Every change is pushed synchronously to each
//! registered brush, which keeps its own cached copy.

use super::angle::AngleSettings;
use super::kinds::AnyBrush;
use super::spacing::Spacing;

#[derive(Debug, Clone, PartialEq)]
pub struct DabsBrushSettings {
    spacing: Spacing,
    angle: AngleSettings,
    listeners: Vec<usize>,
}

impl DabsBrushSettings {
    pub fn new(spacing: Spacing, angle: AngleSettings) -> Self {
        Self {
            spacing,
            angle,
            listeners: Vec::new(),
        }
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn angle(&self) -> AngleSettings {
        self.angle
    }

    pub fn listeners(&self) -> &[usize] {
        &self.listeners
    }

    pub fn register(&mut self, slot: usize) {
        if !self.listeners.contains(&slot) {
            self.listeners.push(slot);
        }
    }

    pub fn unregister(&mut self, slot: usize) {
        self.listeners.retain(|&s| s != slot);
    }

    pub fn set_spacing(&mut self, spacing: Spacing, brushes: &mut [AnyBrush]) {
        self.spacing = spacing;
        self.notify(brushes);
    }

    pub fn set_angle(&mut self, angle: AngleSettings, brushes: &mut [AnyBrush]) {
        self.angle = angle;
        self.notify(brushes);
    }

    /// Push the current values to every registered brush
    pub fn notify(&self, brushes: &mut [AnyBrush]) {
        for &slot in &self.listeners {
            match brushes.get_mut(slot) {
                Some(brush) => brush.settings_changed(self),
                None => tracing::warn!("dab settings listener {slot} has no brush"),
            }
        }
    }
}

impl Default for DabsBrushSettings {
    fn default() -> Self {
        Self::new(Spacing::default(), AngleSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_ignores_duplicates() {
        let mut settings = DabsBrushSettings::default();
        settings.register(0);
        settings.register(1);
        settings.register(0);
        assert_eq!(settings.listeners(), &[0, 1]);
        settings.unregister(0);
        assert_eq!(settings.listeners(), &[1]);
    }
}
