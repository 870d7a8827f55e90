//! Scenario tests through the public session API

use gap_runner::consts::*;
use gap_runner::platform::MemoryStorage;
use gap_runner::sim::{
    GameEvent, GamePhase, HeightSource, LifeState, ObstacleTrack, Playfield, Session, detect_hazard,
};
use gap_runner::{BestScoreStore, Tuning};

/// Always picks the middle of the allowed range
struct Middle;

impl HeightSource for Middle {
    fn sample(&mut self, min: f32, max: f32) -> f32 {
        (min + max) / 2.0
    }
}

fn session() -> Session<Middle> {
    Session::with_height_source(Tuning::default(), Playfield::default(), Middle, 0)
}

/// Drive the character into the ceiling until the session ends
fn crash_until_game_over(session: &mut Session<Middle>, mut now: f64) -> f64 {
    while session.phase() == GamePhase::Playing {
        session.jump();
        session.step(1.0, now);
        now += INVULNERABILITY_MS + 1.0;
    }
    now
}

#[test]
fn test_fresh_session_first_tick() {
    let mut session = session();
    session.start();
    let y0 = session.state().character.y;
    assert_eq!(y0, DEFAULT_PLAYFIELD_HEIGHT / 2.0);

    session.step(1.0, 0.0);

    let state = session.state();
    assert_eq!(state.character.velocity, GRAVITY);
    assert_eq!(state.character.y, y0 + GRAVITY);
}

#[test]
fn test_first_spawn_is_single_and_in_bounds() {
    let mut session = session();
    session.start();
    session.step(1.0, 0.0);

    let state = session.state();
    assert_eq!(state.track.len(), 1);
    let obstacle = &state.track.obstacles()[0];
    assert_eq!(obstacle.x, state.playfield.width + SPAWN_MARGIN);
    let (min, max) = ObstacleTrack::height_bounds(&state.playfield, &state.tuning);
    assert!(obstacle.top_height >= min && obstacle.top_height <= max);
    assert!(
        session
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::ObstacleSpawned(_)))
    );
}

#[test]
fn test_ceiling_always_hazardous() {
    let tuning = Tuning::default();
    let pf = Playfield::default();
    for y in [0.0, -1.0, -500.0] {
        assert!(detect_hazard(y, &[], &pf, &tuning));
    }
}

#[test]
fn test_last_life_goes_straight_to_game_over() {
    let mut session = session();
    session.start();

    // Spend all but one life at the ceiling
    let mut now = 0.0;
    let mut last_timer = None;
    while session.state().lives > 1 {
        session.jump();
        session.step(1.0, now);
        now += INVULNERABILITY_MS + 1.0;
        for event in session.drain_events() {
            if let GameEvent::InvulnerabilityStarted { timer, .. } = event {
                last_timer = Some(timer);
            }
        }
    }
    assert!(session.on_timer(last_timer.unwrap()));
    assert_eq!(session.state().life, LifeState::Vulnerable);
    session.drain_events();

    // Final hit
    loop {
        session.jump();
        session.step(1.0, now);
        if session.phase() == GamePhase::GameOver {
            break;
        }
        now += FRAME_INTERVAL_MS;
    }

    let state = session.state();
    assert_eq!(state.lives, 0);
    assert!(!state.is_invulnerable());
    let events = session.drain_events();
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, GameEvent::InvulnerabilityStarted { .. }))
    );
}

#[test]
fn test_restart_resets_everything() {
    let mut session = session();
    session.start();
    for frame in 0..200 {
        session.step(1.0, frame as f64 * FRAME_INTERVAL_MS);
        if session.phase() == GamePhase::GameOver {
            break;
        }
    }
    crash_until_game_over(&mut session, 100_000.0);
    assert_eq!(session.phase(), GamePhase::GameOver);

    assert!(session.restart());
    let state = session.state();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
    assert_eq!(state.lives, TOTAL_LIVES);
    assert!(state.track.is_empty());
    assert!(!state.is_invulnerable());
    assert_eq!(state.character.y, state.playfield.center_y());
    assert_eq!(state.character.velocity, 0.0);
    assert_eq!(session.scoreboard().current, 0);
}

#[test]
fn test_game_over_halts_and_blocks_input() {
    let mut session = session();
    session.start();
    crash_until_game_over(&mut session, 0.0);

    let y = session.state().character.y;
    let ticks = session.state().time_ticks;
    assert!(!session.jump());
    assert!(!session.start());
    session.advance(1_000_000.0);
    session.step(1.0, 2_000_000.0);
    assert_eq!(session.state().character.y, y);
    assert_eq!(session.state().time_ticks, ticks);
}

#[test]
fn test_stale_timer_after_restart_is_ignored() {
    let mut session = session();
    session.start();

    session.jump();
    let mut now = 0.0;
    let mut first_timer = None;
    while first_timer.is_none() {
        session.step(1.0, now);
        now += FRAME_INTERVAL_MS;
        first_timer = session.drain_events().into_iter().find_map(|e| match e {
            GameEvent::InvulnerabilityStarted { timer, .. } => Some(timer),
            _ => None,
        });
    }
    let first_timer = first_timer.unwrap();

    crash_until_game_over(&mut session, now + INVULNERABILITY_MS + 1.0);
    session.restart();

    // Get hurt again in the new session, then deliver the old timer late
    session.jump();
    let mut now = 1_000_000.0;
    while !session.state().is_invulnerable() {
        session.step(1.0, now);
        now += FRAME_INTERVAL_MS;
    }
    assert!(!session.on_timer(first_timer));
    assert!(session.state().is_invulnerable());
}

#[test]
fn test_best_score_persisted_by_collaborator() {
    let mut store = BestScoreStore::new(Box::new(MemoryStorage::default()));
    let mut session = Session::with_height_source(
        Tuning::default(),
        Playfield::default(),
        Middle,
        store.load(),
    );
    session.start();

    // Fly through the middle of every gap for a while
    let gap = session.state().tuning.obstacle_gap;
    for frame in 0..1500 {
        let state = session.state();
        let reach = state.playfield.center_x() - state.tuning.character_size;
        let target = state
            .track
            .obstacles()
            .iter()
            .find(|o| o.right() > reach)
            .map(|o| o.top_height + gap / 2.0)
            .unwrap_or(state.playfield.center_y());
        if state.character.y > target + 10.0 && state.character.velocity >= 0.0 {
            session.jump();
        }
        session.step(1.0, frame as f64 * FRAME_INTERVAL_MS);
    }
    let score = session.state().score;
    assert!(score > 0);

    crash_until_game_over(&mut session, 10_000_000.0);
    let events = session.drain_events();
    let final_score = events
        .iter()
        .find_map(|e| match e {
            GameEvent::GameOver { score } => Some(*score),
            _ => None,
        })
        .unwrap();
    assert!(events.contains(&GameEvent::NewBest { best: final_score }));

    assert_eq!(store.save_max(final_score), final_score);
    assert_eq!(store.load(), final_score);
}
