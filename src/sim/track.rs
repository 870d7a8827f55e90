//! Obstacle track: spawning, scrolling and recycling
//!
//! Obstacles are stored in spawn order, which is also left-to-right order
//! since they all scroll at the same speed.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Obstacle, ObstacleId, Playfield};
use crate::tuning::Tuning;

/// Source of obstacle heights, injectable so tests can script them
pub trait HeightSource {
    /// Draw a value uniformly from `[min, max]`
    fn sample(&mut self, min: f32, max: f32) -> f32;
}

impl HeightSource for Pcg32 {
    fn sample(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.random_range(min..=max)
        } else {
            min
        }
    }
}

/// Ordered obstacle sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleTrack {
    obstacles: Vec<Obstacle>,
    /// Next obstacle ID (monotonic for the life of the track)
    next_id: u64,
}

impl Default for ObstacleTrack {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleTrack {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Drop every obstacle; IDs keep counting
    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Valid `top_height` range for this playfield
    pub fn height_bounds(playfield: &Playfield, tuning: &Tuning) -> (f32, f32) {
        let min = tuning.obstacle_min_height;
        let max = playfield.height - tuning.obstacle_gap - tuning.obstacle_min_height;
        (min, max.max(min))
    }

    /// Scroll, prune and spawn. Returns the ID of a newly spawned obstacle.
    pub fn update(
        &mut self,
        dt: f32,
        playfield: &Playfield,
        tuning: &Tuning,
        heights: &mut dyn HeightSource,
    ) -> Option<ObstacleId> {
        self.advance(tuning.obstacle_speed * dt);
        self.prune(tuning.despawn_margin);
        if self.should_spawn(playfield, tuning) {
            Some(self.spawn(playfield, tuning, heights))
        } else {
            None
        }
    }

    fn advance(&mut self, distance: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= distance;
        }
    }

    /// Remove obstacles well past the left edge
    fn prune(&mut self, margin: f32) {
        self.obstacles.retain(|o| o.right() >= -margin);
    }

    fn should_spawn(&self, playfield: &Playfield, tuning: &Tuning) -> bool {
        match self.obstacles.last() {
            None => true,
            Some(last) => playfield.width - last.x > tuning.spawn_interval,
        }
    }

    fn spawn(
        &mut self,
        playfield: &Playfield,
        tuning: &Tuning,
        heights: &mut dyn HeightSource,
    ) -> ObstacleId {
        let (min, max) = Self::height_bounds(playfield, tuning);
        // Clamp guards against sources that stray outside the range
        let top_height = heights.sample(min, max).clamp(min, max);

        let id = ObstacleId(self.next_id);
        self.next_id += 1;

        self.obstacles.push(Obstacle {
            id,
            x: playfield.width + tuning.spawn_margin,
            top_height,
            width: tuning.obstacle_width,
            passed: false,
        });
        log::debug!("Spawned obstacle {:?} top={:.1}", id, top_height);
        id
    }
}
