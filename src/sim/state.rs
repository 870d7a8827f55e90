//! Game state and core simulation types
//!
//! Exactly one `GameState` exists per session. It is owned by the session
//! controller and only mutated through tick/event operations.

use serde::{Deserialize, Serialize};

use super::physics::{Character, tilt};
use super::track::ObstacleTrack;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, waiting for the first start request
    #[default]
    Start,
    /// Simulation active
    Playing,
    /// Lives exhausted, simulation halted
    GameOver,
}

/// Identifier of a scheduled invulnerability-expiry timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// Life/invulnerability state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum LifeState {
    /// Hazards cost a life
    #[default]
    Vulnerable,
    /// Hazards are ignored until the timer fires or the deadline passes
    Invulnerable { timer: TimerId, expires_at_ms: f64 },
    /// No lives left (terminal)
    Eliminated,
}

impl LifeState {
    pub fn is_invulnerable(&self) -> bool {
        matches!(self, LifeState::Invulnerable { .. })
    }
}

/// Opaque obstacle identifier, unique for the lifetime of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u64);

/// An obstacle pair: an upper hazard of `top_height`, then the gap, then
/// a lower hazard down to the floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    /// Leading (left) edge, decreasing over time
    pub x: f32,
    pub top_height: f32,
    pub width: f32,
    /// Already counted toward the score
    pub passed: bool,
}

impl Obstacle {
    /// Trailing (right) edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom of the gap / top of the lower hazard
    #[inline]
    pub fn gap_end(&self, gap: f32) -> f32 {
        self.top_height + gap
    }
}

/// Playfield dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLAYFIELD_WIDTH,
            height: DEFAULT_PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    /// Build a playfield from a host measurement.
    ///
    /// Missing, zero or non-finite sizes fall back to the defaults, and the
    /// height is raised so an obstacle with both minimum segments still fits.
    pub fn new(width: f32, height: f32, tuning: &Tuning) -> Self {
        let width = if width.is_finite() && width > 0.0 {
            width
        } else {
            log::warn!("Unusable playfield width {}, using default", width);
            DEFAULT_PLAYFIELD_WIDTH
        };
        let height = if height.is_finite() && height > 0.0 {
            height
        } else {
            log::warn!("Unusable playfield height {}, using default", height);
            DEFAULT_PLAYFIELD_HEIGHT
        };
        Self {
            width,
            height: height.max(tuning.min_playfield_height()),
        }
    }

    /// Horizontal center, where the character flies
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.height / 2.0
    }
}

/// Things that happened during a tick or event, drained by the adapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Restarted,
    Jumped,
    ObstacleSpawned(ObstacleId),
    Scored { score: u32 },
    Damaged { lives_left: u8 },
    InvulnerabilityStarted { timer: TimerId, expires_at_ms: f64 },
    InvulnerabilityEnded,
    GameOver { score: u32 },
    NewBest { best: u32 },
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub playfield: Playfield,
    pub character: Character,
    pub track: ObstacleTrack,
    pub score: u32,
    pub lives: u8,
    pub life: LifeState,
    pub phase: GamePhase,
    /// Ticks simulated while playing
    pub time_ticks: u64,
    /// Pending events for adapters
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next timer ID (never reset, so stale timers never alias)
    next_timer: u32,
}

impl GameState {
    pub fn new(tuning: Tuning, playfield: Playfield) -> Self {
        Self {
            character: Character::centered(&playfield),
            track: ObstacleTrack::new(),
            score: 0,
            lives: tuning.total_lives,
            life: LifeState::Vulnerable,
            phase: GamePhase::Start,
            time_ticks: 0,
            events: Vec::new(),
            next_timer: 1,
            tuning,
            playfield,
        }
    }

    /// Allocate a new timer ID
    pub fn next_timer_id(&mut self) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        id
    }

    /// Put everything back to a fresh session, keeping ID counters
    pub fn reset(&mut self) {
        self.character = Character::centered(&self.playfield);
        self.track.clear();
        self.score = 0;
        self.lives = self.tuning.total_lives;
        self.life = LifeState::Vulnerable;
        self.time_ticks = 0;
    }

    pub fn is_invulnerable(&self) -> bool {
        self.life.is_invulnerable()
    }

    /// Immutable view for the presentation layer
    pub fn snapshot(&self, best: u32) -> Snapshot {
        Snapshot {
            phase: self.phase,
            character_x: self.playfield.center_x(),
            character_y: self.character.y,
            velocity: self.character.velocity,
            tilt: tilt(self.character.velocity),
            obstacles: self.track.obstacles().to_vec(),
            gap: self.tuning.obstacle_gap,
            score: self.score,
            best,
            lives: self.lives,
            invulnerable: self.is_invulnerable(),
            playfield: self.playfield,
        }
    }
}

/// Read-only copy of the state handed to presentation after each tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub character_x: f32,
    pub character_y: f32,
    pub velocity: f32,
    /// Cosmetic rotation in radians
    pub tilt: f32,
    pub obstacles: Vec<Obstacle>,
    pub gap: f32,
    pub score: u32,
    pub best: u32,
    pub lives: u8,
    pub invulnerable: bool,
    pub playfield: Playfield,
}
