//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (buffer and pool order)
//! - No rendering or audio backend dependencies; audio arrives as a snapshot

pub mod actors;
pub mod beat;
pub mod collision;
pub mod generator;
pub mod level;
pub mod platform;
pub mod player;
pub mod score;
pub mod state;
pub mod tick;

pub use actors::{Coin, Enemy, Pool, Projectile, Recyclable};
pub use beat::{AudioInput, BandRange, BandStats, BeatBands, BeatDetector, LOG_LEN, Playback};
pub use collision::{Contact, Rect, platform_contact};
pub use generator::{
    GeneratorKind, GeneratorOutcome, LevelGenerator, MusicGenerator, RandomGenerator, Spawner,
};
pub use level::{Background, Level};
pub use platform::{Platform, PlatformKind, PlatformQueue};
pub use player::{Player, PlayerState};
pub use score::{ScoreCounter, ScorePopup};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, resolve_platforms, tick};
