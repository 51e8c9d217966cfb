// Copyright 2025 the Pixelpen Authors
// SPDX-License-Identifier: Apache-2.0

//! Fixed-interval callbacks for brushes that keep painting while the
//! pointer rests.
//!
//! There is no background thread: the host reports elapsed time through
//! `advance` on the event thread and the brush paints once per due tick.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeTimer {
    interval: Duration,
    running: bool,
    pending: Duration,
}

impl StrokeTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: false,
            pending: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start ticking. Starting a running timer keeps its phase.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.pending = Duration::ZERO;
        }
    }

    /// Stop ticking. Safe to call any number of times.
    pub fn stop(&mut self) {
        self.running = false;
        self.pending = Duration::ZERO;
    }

    /// Account for `elapsed` time and return how many ticks became due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running || self.interval.is_zero() {
            return 0;
        }
        self.pending += elapsed;
        let mut ticks = 0;
        while self.pending >= self.interval {
            self.pending -= self.interval;
            ticks += 1;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_timer_never_fires() {
        let mut timer = StrokeTimer::new(Duration::from_millis(25));
        assert_eq!(timer.advance(Duration::from_secs(1)), 0);
    }

    #[test]
    fn ticks_accumulate_partial_intervals() {
        let mut timer = StrokeTimer::new(Duration::from_millis(25));
        timer.start();
        assert_eq!(timer.advance(Duration::from_millis(10)), 0);
        assert_eq!(timer.advance(Duration::from_millis(20)), 1);
        assert_eq!(timer.advance(Duration::from_millis(70)), 3);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut timer = StrokeTimer::new(Duration::from_millis(25));
        timer.start();
        timer.stop();
        timer.stop();
        assert!(!timer.is_running());
        assert_eq!(timer.advance(Duration::from_millis(100)), 0);
    }

    #[test]
    fn restarting_a_running_timer_keeps_phase() {
        let mut timer = StrokeTimer::new(Duration::from_millis(25));
        timer.start();
        timer.advance(Duration::from_millis(20));
        timer.start();
        assert_eq!(timer.advance(Duration::from_millis(5)), 1);
    }
}
