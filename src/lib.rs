//! Gap Runner - a side-scrolling obstacle-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, lives, scoring)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Best-score tracking and its storage seam
//! - `settings`: Player preferences owned by the presentation layer
//! - `platform`: Browser/native platform abstraction (clock, storage)
//! - `audio`: Web Audio collaborator (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{BestScoreStore, ScoreBoard};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
///
/// Distances are in playfield pixels, velocities in pixels per nominal frame.
pub mod consts {
    /// Nominal frame interval used to normalize wall-clock deltas (60 Hz)
    pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;
    /// Largest normalized delta a single tick may apply (2 nominal frames)
    pub const MAX_FRAME_DT: f32 = 2.0;

    /// Downward acceleration per frame²
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set by a jump (negative = up)
    pub const JUMP_VELOCITY: f32 = -8.0;
    /// Velocity set after taking damage, a small recovery hop
    pub const DAMAGE_NUDGE_VELOCITY: f32 = -4.0;

    /// Obstacle horizontal speed (pixels per frame, moving left)
    pub const OBSTACLE_SPEED: f32 = 3.0;
    pub const OBSTACLE_WIDTH: f32 = 70.0;
    /// Vertical clearance between the upper and lower hazard segments
    pub const OBSTACLE_GAP: f32 = 170.0;
    /// Minimum height of either hazard segment
    pub const OBSTACLE_MIN_HEIGHT: f32 = 80.0;
    /// Distance from the right edge the newest obstacle must travel before the next spawns
    pub const SPAWN_INTERVAL: f32 = 260.0;
    /// New obstacles appear this far past the right edge
    pub const SPAWN_MARGIN: f32 = 20.0;
    /// Obstacles are dropped once their trailing edge is this far past the left edge
    pub const DESPAWN_MARGIN: f32 = 100.0;

    /// Nominal character sprite size (square)
    pub const CHARACTER_SIZE: f32 = 40.0;
    /// Hitbox shrink on every side relative to the sprite
    pub const HITBOX_PADDING: f32 = 6.0;

    pub const TOTAL_LIVES: u8 = 3;
    /// Wall-clock length of the post-damage invulnerability window
    pub const INVULNERABILITY_MS: f64 = 1500.0;

    /// Tilt applied per unit of velocity (radians)
    pub const TILT_PER_VELOCITY: f32 = 0.08;
    /// Nose-up limit (radians, ~-25°)
    pub const MAX_TILT_UP: f32 = -0.45;
    /// Nose-down limit (radians, ~70°)
    pub const MAX_TILT_DOWN: f32 = 1.2;

    /// Fallback playfield size when the host reports nothing usable
    pub const DEFAULT_PLAYFIELD_WIDTH: f32 = 480.0;
    pub const DEFAULT_PLAYFIELD_HEIGHT: f32 = 640.0;
}
