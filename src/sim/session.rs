//! Session controller
//!
//! Owns the single `GameState` of a session and is the only way adapters
//! touch it. Input events, frame callbacks and timer callbacks all arrive
//! here as sequential calls on one thread, so no shadow copies of the state
//! are needed: presentation reads a [`Snapshot`] after each frame.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::FrameClock;
use super::lives;
use super::physics::Character;
use super::state::{GameEvent, GamePhase, GameState, Playfield, Snapshot, TimerId};
use super::tick::{jump, tick};
use super::track::{HeightSource, ObstacleTrack};
use crate::highscores::ScoreBoard;
use crate::tuning::Tuning;

pub struct Session<H: HeightSource = Pcg32> {
    state: GameState,
    clock: FrameClock,
    heights: H,
    scoreboard: ScoreBoard,
    /// Host is hidden/backgrounded; frames are ignored until resumed
    suspended: bool,
}

impl Session<Pcg32> {
    /// New session with default tuning and playfield, seeded RNG and the
    /// best score loaded by the persistence collaborator
    pub fn new(seed: u64, best: u32) -> Self {
        Self::with_height_source(
            Tuning::default(),
            Playfield::default(),
            Pcg32::seed_from_u64(seed),
            best,
        )
    }
}

impl<H: HeightSource> Session<H> {
    pub fn with_height_source(tuning: Tuning, playfield: Playfield, heights: H, best: u32) -> Self {
        // Fields are public, so hand-built tunings may still be out of range
        let tuning = tuning.sanitized();
        let clock = FrameClock::new(tuning.frame_interval_ms, tuning.max_frame_dt);
        let playfield = Playfield::new(playfield.width, playfield.height, &tuning);
        Self {
            state: GameState::new(tuning, playfield),
            clock,
            heights,
            scoreboard: ScoreBoard::new(best),
            suspended: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.scoreboard
    }

    /// `Start -> Playing`
    pub fn start(&mut self) -> bool {
        if self.state.phase != GamePhase::Start {
            return false;
        }
        self.state.phase = GamePhase::Playing;
        self.clock.reset();
        self.state.events.push(GameEvent::Started);
        log::info!("Session started");
        true
    }

    /// `GameOver -> Playing` with a full reset
    pub fn restart(&mut self) -> bool {
        if self.state.phase != GamePhase::GameOver {
            return false;
        }
        self.state.reset();
        self.state.phase = GamePhase::Playing;
        self.scoreboard.reset_current();
        self.clock.reset();
        self.state.events.push(GameEvent::Restarted);
        log::info!("Session restarted (best {})", self.scoreboard.best);
        true
    }

    /// Upward impulse; ignored outside `Playing`
    pub fn jump(&mut self) -> bool {
        jump(&mut self.state)
    }

    /// The single "button" of the game: start, jump or restart by phase
    pub fn primary_action(&mut self) {
        match self.state.phase {
            GamePhase::Start => {
                self.start();
            }
            GamePhase::Playing => {
                self.jump();
            }
            GamePhase::GameOver => {
                self.restart();
            }
        }
    }

    /// Frame callback: measure the clamped delta and run one tick
    pub fn advance(&mut self, now_ms: f64) {
        if self.suspended || self.state.phase != GamePhase::Playing {
            return;
        }
        let dt = self.clock.step(now_ms);
        self.step(dt, now_ms);
    }

    /// Run one tick with an explicit delta
    pub fn step(&mut self, dt: f32, now_ms: f64) {
        let was_playing = self.state.phase == GamePhase::Playing;
        tick(&mut self.state, dt, now_ms, &mut self.heights);
        self.scoreboard.current = self.state.score;

        if was_playing && self.state.phase == GamePhase::GameOver {
            self.finish();
        }
    }

    fn finish(&mut self) {
        if self.scoreboard.finish(self.state.score) {
            log::info!("New best score: {}", self.scoreboard.best);
            self.state.events.push(GameEvent::NewBest {
                best: self.scoreboard.best,
            });
        }
    }

    /// Invulnerability timer callback from the host event loop
    pub fn on_timer(&mut self, timer: TimerId) -> bool {
        lives::on_timer(&mut self.state, timer)
    }

    /// Host hidden: stop advancing
    pub fn suspend(&mut self) {
        if !self.suspended {
            self.suspended = true;
            log::info!("Session suspended");
        }
    }

    /// Host visible again: the next frame counts as one nominal frame
    pub fn resume(&mut self) {
        if self.suspended {
            self.suspended = false;
            self.clock.reset();
            log::info!("Session resumed");
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Re-measure the playfield (with fallback for unusable sizes)
    pub fn resize(&mut self, width: f32, height: f32) {
        let playfield = Playfield::new(width, height, &self.state.tuning);
        let (min, max) = ObstacleTrack::height_bounds(&playfield, &self.state.tuning);
        for obstacle in self.state.track.obstacles_mut() {
            obstacle.top_height = obstacle.top_height.clamp(min, max);
        }
        if self.state.phase == GamePhase::Start {
            self.state.character = Character::centered(&playfield);
        }
        self.state.playfield = playfield;
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(self.scoreboard.best)
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }
}
