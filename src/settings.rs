//! Player settings and preferences
//!
//! Owned by the presentation layer (the mute toggle lives here, not in the
//! simulation). Persisted separately from the best score.

use serde::{Deserialize, Serialize};

use crate::platform::Storage;

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Mute all sound
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Visual Effects ===
    /// Blink the character while invulnerable
    pub invulnerability_blink: bool,
    /// Tilt the character with its velocity
    pub tilt: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no blinking, no tilt)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,

            invulnerability_blink: true,
            tilt: true,

            show_fps: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "gap_runner_settings";

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Effective blink (respects reduced_motion)
    pub fn effective_blink(&self) -> bool {
        self.invulnerability_blink && !self.reduced_motion
    }

    /// Effective tilt (respects reduced_motion)
    pub fn effective_tilt(&self) -> bool {
        self.tilt && !self.reduced_motion
    }

    /// Tilt angle to draw for a snapshot's tilt, level when tilt is off
    pub fn display_tilt(&self, tilt: f32) -> f32 {
        if self.effective_tilt() { tilt } else { 0.0 }
    }

    /// Effective sound effect gain (0 when muted)
    pub fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective music gain (0 when muted)
    pub fn music_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings, falling back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        if let Some(json) = storage.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match serde_json::to_string(self) {
            Ok(json) => {
                storage.set(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}
