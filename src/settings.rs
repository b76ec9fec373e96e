//! Game settings and tuning knobs
//!
//! Structural constants live in `crate::consts`; everything a player or tester
//! may want to adjust per run lives here.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Beat detection sensitivity presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Sensitivity {
    Low,
    #[default]
    Medium,
    High,
}

impl Sensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::Low => "Low",
            Sensitivity::Medium => "Medium",
            Sensitivity::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Sensitivity::Low),
            "medium" | "med" => Some(Sensitivity::Medium),
            "high" => Some(Sensitivity::High),
            _ => None,
        }
    }

    /// Standard deviations a band must rise above its mean to count as a beat.
    /// Lower means more beats.
    pub fn beat_multiplier(&self) -> f32 {
        match self {
            Sensitivity::Low => 1.5,
            Sensitivity::Medium => 1.1,
            Sensitivity::High => 0.8,
        }
    }
}

/// What the beat detector reports while audio is paused or stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StaleBeatPolicy {
    /// Keep answering from the last statistics computed while playing
    #[default]
    Hold,
    /// Report no beat until audio plays again
    Suppress,
}

/// Per-run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for every random decision in the run
    pub seed: u64,

    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Beat detection ===
    pub sensitivity: Sensitivity,
    /// Threshold multiplier on the band standard deviation
    pub beat_multiplier: f32,
    pub stale_beats: StaleBeatPolicy,

    // === Gameplay ===
    /// Landing forgiveness around platform edges
    pub forgiveness: f32,
    /// Platforms a random level places before ending
    pub random_level_platforms: u32,
    /// Seconds between enemy spawns
    pub enemy_spawn_interval: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x6e69_6e6a_6162_6561,

            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            sensitivity: Sensitivity::Medium,
            beat_multiplier: Sensitivity::Medium.beat_multiplier(),
            stale_beats: StaleBeatPolicy::Hold,

            forgiveness: FORGIVENESS,
            random_level_platforms: RANDOM_LEVEL_PLATFORMS,
            enemy_spawn_interval: ENEMY_SPAWN_INTERVAL,
        }
    }
}

impl Settings {
    /// Create settings from a sensitivity preset
    pub fn from_sensitivity(sensitivity: Sensitivity) -> Self {
        let mut settings = Self::default();
        settings.apply_sensitivity(sensitivity);
        settings
    }

    /// Apply a sensitivity preset (overwrites the beat multiplier)
    pub fn apply_sensitivity(&mut self, sensitivity: Sensitivity) {
        self.sensitivity = sensitivity;
        self.beat_multiplier = sensitivity.beat_multiplier();
    }

    /// Check every value is usable by the simulation
    pub fn validate(&self) -> Result<()> {
        if !(self.viewport_width > 0.0) {
            return Err(Error::settings(format!(
                "viewport width must be positive, got {}",
                self.viewport_width
            )));
        }
        if !(self.viewport_height > 0.0) {
            return Err(Error::settings(format!(
                "viewport height must be positive, got {}",
                self.viewport_height
            )));
        }
        if !(self.beat_multiplier >= 0.0) {
            return Err(Error::settings(format!(
                "beat multiplier must not be negative, got {}",
                self.beat_multiplier
            )));
        }
        if !(self.forgiveness >= 0.0) {
            return Err(Error::settings(format!(
                "forgiveness must not be negative, got {}",
                self.forgiveness
            )));
        }
        if !(self.enemy_spawn_interval > 0.0) {
            return Err(Error::settings(format!(
                "enemy spawn interval must be positive, got {}",
                self.enemy_spawn_interval
            )));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse settings, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings (seed {})", settings.seed);
                settings
            }
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }
}
