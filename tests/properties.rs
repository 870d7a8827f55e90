//! Property tests for the simulation invariants

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use gap_runner::Tuning;
use gap_runner::consts::*;
use gap_runner::sim::{
    GameEvent, GamePhase, Obstacle, ObstacleId, ObstacleTrack, Playfield, Session, award_passed,
    detect_hazard,
};

/// One input per frame: maybe jump, then a frame of some length
#[derive(Debug, Clone)]
struct Frame {
    jump: bool,
    elapsed_ms: f64,
}

fn frame_strategy() -> impl Strategy<Value = Frame> {
    (any::<bool>(), 0.0f64..200.0).prop_map(|(jump, elapsed_ms)| Frame { jump, elapsed_ms })
}

proptest! {
    #[test]
    fn lives_and_score_stay_consistent(
        seed in any::<u64>(),
        frames in prop::collection::vec(frame_strategy(), 1..600),
    ) {
        let mut session = Session::new(seed, 0);
        session.start();
        let mut now = 0.0;
        let mut lives = session.state().lives;
        let mut score = session.state().score;
        let mut game_overs = 0;

        for frame in &frames {
            if frame.jump {
                session.jump();
            }
            now += frame.elapsed_ms;
            session.advance(now);

            let state = session.state();
            prop_assert!(state.lives <= lives);
            prop_assert!(state.lives <= TOTAL_LIVES);
            prop_assert!(state.score >= score);
            prop_assert_eq!(state.lives == 0, state.phase == GamePhase::GameOver);
            lives = state.lives;
            score = state.score;

            let passed = state.track.obstacles().iter().filter(|o| o.passed).count() as u32;
            prop_assert!(passed <= state.score);

            game_overs += session
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                .count();
        }
        prop_assert!(game_overs <= 1);
    }

    #[test]
    fn obstacle_heights_in_bounds(
        seed in any::<u64>(),
        width in 100.0f32..2000.0,
        height in 0.0f32..2000.0,
        frames in 1usize..1500,
    ) {
        let tuning = Tuning::default();
        let playfield = Playfield::new(width, height, &tuning);
        let mut track = ObstacleTrack::new();
        let mut rng = Pcg32::seed_from_u64(seed);

        for _ in 0..frames {
            track.update(1.0, &playfield, &tuning, &mut rng);
            for o in track.obstacles() {
                prop_assert!(o.top_height >= tuning.obstacle_min_height);
                prop_assert!(
                    o.top_height + tuning.obstacle_gap
                        <= playfield.height - tuning.obstacle_min_height + 1e-3
                );
            }
        }
    }

    #[test]
    fn inside_gap_is_never_a_hazard(
        top in OBSTACLE_MIN_HEIGHT..(DEFAULT_PLAYFIELD_HEIGHT - OBSTACLE_GAP - OBSTACLE_MIN_HEIGHT),
        x in -200.0f32..600.0,
        offset in 0.0f32..1.0,
    ) {
        let tuning = Tuning::default();
        let playfield = Playfield::default();
        let obstacle = Obstacle {
            id: ObstacleId(1),
            x,
            top_height: top,
            width: tuning.obstacle_width,
            passed: false,
        };
        // Any center that keeps the padded hitbox inside the gap
        let half = tuning.character_size / 2.0 - tuning.hitbox_padding;
        let lo = top + half + 0.5;
        let hi = top + tuning.obstacle_gap - half - 0.5;
        let y = lo + (hi - lo) * offset;

        let first = detect_hazard(y, std::slice::from_ref(&obstacle), &playfield, &tuning);
        prop_assert!(!first);
        prop_assert_eq!(
            first,
            detect_hazard(y, std::slice::from_ref(&obstacle), &playfield, &tuning)
        );
    }

    #[test]
    fn scoring_is_idempotent(
        xs in prop::collection::vec(-500.0f32..500.0, 0..20),
        center in 0.0f32..400.0,
    ) {
        let mut obstacles: Vec<Obstacle> = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| Obstacle {
                id: ObstacleId(i as u64),
                x,
                top_height: 100.0,
                width: OBSTACLE_WIDTH,
                passed: false,
            })
            .collect();

        let first = award_passed(&mut obstacles, center);
        let expected = xs.iter().filter(|&&x| x + OBSTACLE_WIDTH < center).count() as u32;
        prop_assert_eq!(first, expected);
        prop_assert_eq!(award_passed(&mut obstacles, center), 0);
    }
}
