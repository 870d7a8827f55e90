//! Simulation tick
//!
//! One call advances the game by one rendered frame. Outside `Playing`
//! nothing moves.

use super::collision::detect_hazard;
use super::lives::{HazardOutcome, apply_hazard, expire_if_due};
use super::scoring::award_passed;
use super::state::{GameEvent, GamePhase, GameState};
use super::track::HeightSource;

/// Advance the game state by `dt` nominal frames at wall-clock `now_ms`
pub fn tick(state: &mut GameState, dt: f32, now_ms: f64, heights: &mut dyn HeightSource) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    expire_if_due(state, now_ms);

    state.character.integrate(state.tuning.gravity, dt);

    if let Some(id) = state
        .track
        .update(dt, &state.playfield, &state.tuning, heights)
    {
        state.events.push(GameEvent::ObstacleSpawned(id));
    }

    let gained = award_passed(state.track.obstacles_mut(), state.playfield.center_x());
    if gained > 0 {
        state.score += gained;
        state.events.push(GameEvent::Scored { score: state.score });
        log::debug!("Score: {}", state.score);
    }

    let hazard = detect_hazard(
        state.character.y,
        state.track.obstacles(),
        &state.playfield,
        &state.tuning,
    );
    if hazard && apply_hazard(state, now_ms) == HazardOutcome::Eliminated {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!("Game over! Final score: {}", state.score);
    }
}

/// Apply a jump impulse. Does nothing unless playing.
pub fn jump(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    state.character.impulse(state.tuning.jump_velocity);
    state.events.push(GameEvent::Jumped);
    true
}
