//! Data-driven game balance
//!
//! Every gameplay constant in one serializable struct so balance can be
//! tweaked from JSON without a rebuild. Defaults come from [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay constants for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub jump_velocity: f32,
    pub damage_nudge_velocity: f32,
    pub obstacle_speed: f32,
    pub obstacle_width: f32,
    pub obstacle_gap: f32,
    pub obstacle_min_height: f32,
    pub spawn_interval: f32,
    pub spawn_margin: f32,
    pub despawn_margin: f32,
    pub character_size: f32,
    pub hitbox_padding: f32,
    pub total_lives: u8,
    pub invulnerability_ms: f64,
    pub frame_interval_ms: f64,
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            damage_nudge_velocity: DAMAGE_NUDGE_VELOCITY,
            obstacle_speed: OBSTACLE_SPEED,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_gap: OBSTACLE_GAP,
            obstacle_min_height: OBSTACLE_MIN_HEIGHT,
            spawn_interval: SPAWN_INTERVAL,
            spawn_margin: SPAWN_MARGIN,
            despawn_margin: DESPAWN_MARGIN,
            character_size: CHARACTER_SIZE,
            hitbox_padding: HITBOX_PADDING,
            total_lives: TOTAL_LIVES,
            invulnerability_ms: INVULNERABILITY_MS,
            frame_interval_ms: FRAME_INTERVAL_MS,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields take their defaults and
    /// out-of-range values are repaired.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Replace values that would break simulation invariants with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Tuning::default();

        fn positive(value: &mut f32, fallback: f32, name: &str) {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("Tuning {} = {} is invalid, using {}", name, value, fallback);
                *value = fallback;
            }
        }

        positive(&mut self.gravity, defaults.gravity, "gravity");
        positive(&mut self.obstacle_speed, defaults.obstacle_speed, "obstacle_speed");
        positive(&mut self.obstacle_width, defaults.obstacle_width, "obstacle_width");
        positive(&mut self.obstacle_gap, defaults.obstacle_gap, "obstacle_gap");
        positive(
            &mut self.obstacle_min_height,
            defaults.obstacle_min_height,
            "obstacle_min_height",
        );
        positive(&mut self.spawn_interval, defaults.spawn_interval, "spawn_interval");
        positive(&mut self.character_size, defaults.character_size, "character_size");
        positive(&mut self.max_frame_dt, defaults.max_frame_dt, "max_frame_dt");

        if !self.spawn_margin.is_finite() || self.spawn_margin < 0.0 {
            log::warn!("Tuning spawn_margin = {} is invalid", self.spawn_margin);
            self.spawn_margin = defaults.spawn_margin;
        }
        if !self.despawn_margin.is_finite() || self.despawn_margin < 0.0 {
            log::warn!("Tuning despawn_margin = {} is invalid", self.despawn_margin);
            self.despawn_margin = defaults.despawn_margin;
        }

        // Jump must go up; the damage hop must be up but weaker than a jump
        if !self.jump_velocity.is_finite() || self.jump_velocity >= 0.0 {
            log::warn!("Tuning jump_velocity = {} must be negative", self.jump_velocity);
            self.jump_velocity = defaults.jump_velocity;
        }
        if !self.damage_nudge_velocity.is_finite()
            || self.damage_nudge_velocity >= 0.0
            || self.damage_nudge_velocity <= self.jump_velocity
        {
            log::warn!(
                "Tuning damage_nudge_velocity = {} must be in ({}, 0)",
                self.damage_nudge_velocity,
                self.jump_velocity
            );
            self.damage_nudge_velocity = self.jump_velocity / 2.0;
        }

        // Padding may not swallow the whole hitbox
        let max_padding = self.character_size / 2.0 - 1.0;
        if !self.hitbox_padding.is_finite() || self.hitbox_padding < 0.0 {
            self.hitbox_padding = 0.0;
        }
        if self.hitbox_padding > max_padding {
            log::warn!("Tuning hitbox_padding = {} too large", self.hitbox_padding);
            self.hitbox_padding = max_padding.max(0.0);
        }

        if self.total_lives == 0 {
            log::warn!("Tuning total_lives = 0, using {}", defaults.total_lives);
            self.total_lives = defaults.total_lives;
        }
        if !self.invulnerability_ms.is_finite() || self.invulnerability_ms < 0.0 {
            self.invulnerability_ms = defaults.invulnerability_ms;
        }
        if !self.frame_interval_ms.is_finite() || self.frame_interval_ms <= 0.0 {
            self.frame_interval_ms = defaults.frame_interval_ms;
        }

        self
    }

    /// Smallest playfield height in which an obstacle still fits
    pub fn min_playfield_height(&self) -> f32 {
        self.obstacle_gap + 2.0 * self.obstacle_min_height + self.character_size
    }
}
