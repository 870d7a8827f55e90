//! Frame clock
//!
//! Turns wall-clock frame timestamps into a normalized, clamped time delta.
//! A delta of 1.0 is one nominal frame.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameClock {
    last_ms: Option<f64>,
    interval_ms: f64,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(interval_ms: f64, max_dt: f32) -> Self {
        Self {
            last_ms: None,
            interval_ms,
            max_dt,
        }
    }

    /// Delta since the previous frame, in nominal frames.
    ///
    /// The first frame after construction or [`reset`](Self::reset) counts
    /// as exactly one frame. Long gaps (suspended tab, debugger) are clamped
    /// to `max_dt`; clocks running backwards give zero.
    pub fn step(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / self.interval_ms) as f32,
            None => 1.0,
        };
        self.last_ms = Some(now_ms);

        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            1.0
        }
    }

    /// Forget the previous timestamp (after a pause or restart)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
