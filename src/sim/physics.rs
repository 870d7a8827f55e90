//! Vertical motion of the character
//!
//! Semi-implicit Euler under constant gravity. `dt` is a multiple of the
//! nominal frame interval, so constants are per-frame quantities.

use serde::{Deserialize, Serialize};

use super::state::Playfield;
use crate::consts::{MAX_TILT_DOWN, MAX_TILT_UP, TILT_PER_VELOCITY};

/// The player-controlled character (center position, positive = down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub y: f32,
    pub velocity: f32,
}

impl Character {
    /// At rest in the vertical middle of the playfield
    pub fn centered(playfield: &Playfield) -> Self {
        Self {
            y: playfield.center_y(),
            velocity: 0.0,
        }
    }

    /// Advance one step: velocity first, then position with the new velocity
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.velocity += gravity * dt;
        self.y += self.velocity * dt;
    }

    /// Override whatever velocity has accumulated
    pub fn impulse(&mut self, velocity: f32) {
        self.velocity = velocity;
    }
}

/// Cosmetic rotation for a given vertical velocity (radians, clamped)
pub fn tilt(velocity: f32) -> f32 {
    (velocity * TILT_PER_VELOCITY).clamp(MAX_TILT_UP, MAX_TILT_DOWN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GRAVITY, JUMP_VELOCITY};

    #[test]
    fn test_integrate_one_frame() {
        let mut c = Character { y: 100.0, velocity: 0.0 };
        c.integrate(GRAVITY, 1.0);
        assert_eq!(c.velocity, GRAVITY);
        assert_eq!(c.y, 100.0 + GRAVITY);
    }

    #[test]
    fn test_integrate_scales_with_dt() {
        let mut c = Character { y: 0.0, velocity: 2.0 };
        c.integrate(1.0, 0.5);
        assert!((c.velocity - 2.5).abs() < 1e-6);
        assert!((c.y - 1.25).abs() < 1e-6);
    }

    #[test]
    fn test_impulse_overrides_velocity() {
        let mut c = Character { y: 50.0, velocity: 15.0 };
        c.impulse(JUMP_VELOCITY);
        assert_eq!(c.velocity, JUMP_VELOCITY);
        assert_eq!(c.y, 50.0);
    }

    #[test]
    fn test_tilt_clamped() {
        assert_eq!(tilt(0.0), 0.0);
        assert_eq!(tilt(-1000.0), MAX_TILT_UP);
        assert_eq!(tilt(1000.0), MAX_TILT_DOWN);
        assert!(tilt(2.0) > 0.0);
    }
}
