//! Ninja Beats - a scrolling platformer driven by music
//!
//! Core modules:
//! - `sim`: Deterministic simulation (beat detection, level generation, collisions)
//! - `settings`: Runtime tuning knobs
//! - `error`: Crate error type

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::{Sensitivity, Settings, StaleBeatPolicy};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 480.0;

    /// Spectrum resolution delivered by the audio source
    pub const SPECTRUM_LEN: usize = 256;

    /// Platform sprite size
    pub const PLATFORM_WIDTH: f32 = 100.0;
    pub const PLATFORM_HEIGHT: f32 = 50.0;
    /// Vertical position (top edge) of floor platforms
    pub const FLOOR_HEIGHT: f32 = 400.0;
    /// Vertical position (top edge) of ceiling platforms
    pub const CEILING_HEIGHT: f32 = 50.0;
    /// Leftward scroll speed shared by platforms and coins
    pub const SCROLL_SPEED: f32 = 250.0;
    /// Slack kept in the platform buffer beyond the viewport
    pub const BUFFER_MARGIN: usize = 3;

    /// Background parallax speed
    pub const BACKGROUND_SPEED: f32 = 160.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 150.0;
    /// Vertical speed while midair
    pub const PLAYER_MIDAIR_SPEED: f32 = 600.0;
    /// Reduced fall speed right after a respawn
    pub const PLAYER_SPAWN_SPEED: f32 = 200.0;
    /// Distance within which the player still lands on a platform edge
    pub const FORGIVENESS: f32 = 25.0;

    /// Enemy defaults
    pub const ENEMY_COUNT: usize = 10;
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const ENEMY_START_X: f32 = 900.0;
    pub const ENEMY_START_Y: f32 = 300.0;
    pub const ENEMY_HEALTH: u8 = 2;
    pub const ENEMY_MIN_Y: f32 = 80.0;
    pub const ENEMY_MAX_Y: f32 = 400.0;
    pub const ENEMY_MIN_SPEED: f32 = 200.0;
    pub const ENEMY_MAX_SPEED: f32 = 400.0;
    pub const ENEMY_SPAWN_INTERVAL: f32 = 2.0;

    /// Coin and projectile defaults
    pub const COIN_SIZE: f32 = 20.0;
    pub const PROJECTILE_SIZE: f32 = 10.0;
    pub const PROJECTILE_SPEED: f32 = 600.0;

    /// Score deltas
    pub const COIN_SCORE: i64 = 150;
    pub const KILL_SCORE: i64 = 100;
    pub const DEATH_PENALTY: i64 = -400;
    /// How long a bonus/penalty popup stays on screen (seconds)
    pub const SCORE_POPUP_TIME: f32 = 3.0;

    /// Platforms placed by a random level before it ends
    pub const RANDOM_LEVEL_PLATFORMS: u32 = 100;
}

/// Number of platforms the scroll buffer may hold for a viewport width:
/// enough to cover the viewport plus a margin for the generator to catch up.
#[inline]
pub fn platform_capacity(viewport_width: f32) -> usize {
    (viewport_width / consts::PLATFORM_WIDTH).floor().max(0.0) as usize + consts::BUFFER_MARGIN
}

/// Horizontal position the last platform must reach before generation pauses
#[inline]
pub fn spawn_point(viewport_width: f32) -> f32 {
    viewport_width + consts::PLATFORM_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_capacity() {
        assert_eq!(platform_capacity(800.0), 11);
        assert_eq!(platform_capacity(850.0), 11);
        assert_eq!(platform_capacity(50.0), 3);
    }

    #[test]
    fn test_spawn_point() {
        assert_eq!(spawn_point(800.0), 900.0);
    }
}
