//! Hazard detection
//!
//! Pure functions only: the same inputs always give the same answer. The
//! character's hitbox is its sprite square shrunk by a padding on every side
//! so grazing contacts feel fair.

use glam::Vec2;

use super::state::{Obstacle, Playfield};
use crate::tuning::Tuning;

/// Axis-aligned box (screen space, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub min: Vec2,
    pub max: Vec2,
}

impl Hitbox {
    pub fn from_center(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Whether the box overlaps the horizontal span `[left, right]`
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.max.x > left && self.min.x < right
    }
}

/// The character's forgiving hitbox at vertical position `y`
pub fn character_hitbox(y: f32, playfield: &Playfield, tuning: &Tuning) -> Hitbox {
    let half = (tuning.character_size / 2.0 - tuning.hitbox_padding).max(0.0);
    Hitbox::from_center(Vec2::new(playfield.center_x(), y), Vec2::splat(half))
}

/// Whether the hitbox touches either hazard segment of an obstacle
pub fn hits_obstacle(hitbox: &Hitbox, obstacle: &Obstacle, gap: f32) -> bool {
    if !hitbox.overlaps_x(obstacle.x, obstacle.right()) {
        return false;
    }
    hitbox.top() < obstacle.top_height || hitbox.bottom() > obstacle.gap_end(gap)
}

/// Whether the hitbox leaves the playfield vertically
pub fn out_of_bounds(hitbox: &Hitbox, playfield: &Playfield) -> bool {
    hitbox.top() < 0.0 || hitbox.bottom() > playfield.height
}

/// Check whether a character at `y` is in contact with anything
pub fn detect_hazard(
    y: f32,
    obstacles: &[Obstacle],
    playfield: &Playfield,
    tuning: &Tuning,
) -> bool {
    let hitbox = character_hitbox(y, playfield, tuning);
    out_of_bounds(&hitbox, playfield)
        || obstacles
            .iter()
            .any(|o| hits_obstacle(&hitbox, o, tuning.obstacle_gap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleId;

    fn setup() -> (Tuning, Playfield) {
        let tuning = Tuning::default();
        let playfield = Playfield::new(480.0, 640.0, &tuning);
        (tuning, playfield)
    }

    fn obstacle_at(x: f32, top_height: f32, tuning: &Tuning) -> Obstacle {
        Obstacle {
            id: ObstacleId(1),
            x,
            top_height,
            width: tuning.obstacle_width,
            passed: false,
        }
    }

    #[test]
    fn test_ceiling_and_floor() {
        let (tuning, pf) = setup();
        assert!(detect_hazard(0.0, &[], &pf, &tuning));
        assert!(detect_hazard(-30.0, &[], &pf, &tuning));
        assert!(detect_hazard(pf.height, &[], &pf, &tuning));
        assert!(!detect_hazard(pf.center_y(), &[], &pf, &tuning));
    }

    #[test]
    fn test_padding_is_forgiving() {
        let (tuning, pf) = setup();
        // Sprite edge pokes above the ceiling but the padded hitbox does not
        let y = tuning.character_size / 2.0 - 1.0;
        assert!(!detect_hazard(y, &[], &pf, &tuning));
    }

    #[test]
    fn test_inside_gap_is_safe() {
        let (tuning, pf) = setup();
        let top = 200.0;
        let obstacle = obstacle_at(pf.center_x() - tuning.obstacle_width / 2.0, top, &tuning);
        let y = top + tuning.obstacle_gap / 2.0;
        assert!(!detect_hazard(y, &[obstacle], &pf, &tuning));
    }

    #[test]
    fn test_upper_and_lower_segments() {
        let (tuning, pf) = setup();
        let top = 200.0;
        let obstacle = obstacle_at(pf.center_x() - 10.0, top, &tuning);
        let obstacles = [obstacle];

        assert!(detect_hazard(top - 5.0, &obstacles, &pf, &tuning));
        assert!(detect_hazard(top + tuning.obstacle_gap + 5.0, &obstacles, &pf, &tuning));
    }

    #[test]
    fn test_no_horizontal_overlap() {
        let (tuning, pf) = setup();
        let far_right = obstacle_at(pf.center_x() + 100.0, 200.0, &tuning);
        let far_left = obstacle_at(pf.center_x() - 200.0, 200.0, &tuning);
        // Well inside the upper segment's height, but not beside it
        assert!(!detect_hazard(150.0, &[far_right, far_left], &pf, &tuning));
    }

    #[test]
    fn test_pure() {
        let (tuning, pf) = setup();
        let obstacles = [obstacle_at(pf.center_x() - 20.0, 150.0, &tuning)];
        let first = detect_hazard(100.0, &obstacles, &pf, &tuning);
        for _ in 0..10 {
            assert_eq!(detect_hazard(100.0, &obstacles, &pf, &tuning), first);
        }
    }
}
