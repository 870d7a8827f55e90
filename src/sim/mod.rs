//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Wall-clock time only enters as explicit arguments
//! - Randomness only through an injected `HeightSource`
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod lives;
pub mod physics;
pub mod scoring;
pub mod session;
pub mod state;
pub mod tick;
pub mod track;

pub use clock::FrameClock;
pub use collision::{Hitbox, character_hitbox, detect_hazard};
pub use lives::{HazardOutcome, apply_hazard};
pub use physics::{Character, tilt};
pub use scoring::award_passed;
pub use session::Session;
pub use state::{
    GameEvent, GamePhase, GameState, LifeState, Obstacle, ObstacleId, Playfield, Snapshot,
    TimerId,
};
pub use tick::{jump, tick};
pub use track::{HeightSource, ObstacleTrack};
