//! Scoring: one point per obstacle the character clears

use super::state::Obstacle;

/// Mark obstacles whose trailing edge is left of `center_x` and return how
/// many were newly passed. Each obstacle counts at most once.
pub fn award_passed(obstacles: &mut [Obstacle], center_x: f32) -> u32 {
    let mut gained = 0;
    for obstacle in obstacles.iter_mut().filter(|o| !o.passed) {
        if obstacle.right() < center_x {
            obstacle.passed = true;
            gained += 1;
        }
    }
    gained
}
