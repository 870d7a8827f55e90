//! Life and invulnerability state machine
//!
//! `Vulnerable --hazard--> Invulnerable` (or `Eliminated` on the last life),
//! `Invulnerable --timer/deadline--> Vulnerable`. Hazards while invulnerable
//! are ignored, so at most one expiry timer is ever pending.

use super::state::{GameEvent, GameState, LifeState, TimerId};

/// What a hazard signal did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HazardOutcome {
    /// Already invulnerable (or eliminated)
    Ignored,
    /// Lost a life, now invulnerable
    Damaged { lives_left: u8, timer: TimerId },
    /// Lost the last life
    Eliminated,
}

/// Apply one hazard signal at wall-clock time `now_ms`
pub fn apply_hazard(state: &mut GameState, now_ms: f64) -> HazardOutcome {
    if !matches!(state.life, LifeState::Vulnerable) {
        return HazardOutcome::Ignored;
    }

    state.lives = state.lives.saturating_sub(1);

    if state.lives == 0 {
        state.life = LifeState::Eliminated;
        return HazardOutcome::Eliminated;
    }

    let timer = state.next_timer_id();
    let expires_at_ms = now_ms + state.tuning.invulnerability_ms;
    state.life = LifeState::Invulnerable {
        timer,
        expires_at_ms,
    };

    // Recovery hop; not re-checked against bounds this tick
    state.character.impulse(state.tuning.damage_nudge_velocity);

    state.events.push(GameEvent::Damaged {
        lives_left: state.lives,
    });
    state.events.push(GameEvent::InvulnerabilityStarted {
        timer,
        expires_at_ms,
    });
    log::info!("Hit! {} lives left", state.lives);

    HazardOutcome::Damaged {
        lives_left: state.lives,
        timer,
    }
}

/// Handle a fired expiry timer. Stale IDs are ignored.
pub fn on_timer(state: &mut GameState, fired: TimerId) -> bool {
    match state.life {
        LifeState::Invulnerable { timer, .. } if timer == fired => {
            end_invulnerability(state);
            true
        }
        _ => false,
    }
}

/// Expire the window if its deadline has passed (covers throttled timers)
pub fn expire_if_due(state: &mut GameState, now_ms: f64) -> bool {
    match state.life {
        LifeState::Invulnerable { expires_at_ms, .. } if now_ms >= expires_at_ms => {
            end_invulnerability(state);
            true
        }
        _ => false,
    }
}

fn end_invulnerability(state: &mut GameState) {
    state.life = LifeState::Vulnerable;
    state.events.push(GameEvent::InvulnerabilityEnded);
}
