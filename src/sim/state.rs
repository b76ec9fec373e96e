//! Game state and core simulation types
//!
//! Everything the renderer reads each tick lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::generator::{GeneratorKind, LevelGenerator};
use super::level::Level;
use super::player::Player;
use super::score::ScoreCounter;
use crate::error::Result;
use crate::settings::Settings;

/// Stream offset so actor randomness never mirrors the random generator's
const ACTOR_RNG_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    /// A finish gate was reached; ticks are no-ops from here on
    Ended,
}

/// Things that happened during a tick, for whoever drives the game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The music generator heard a beat and switched lanes
    Beat,
    /// The generator placed the finish gate
    GenerationEnded,
    /// The player reached the finish gate
    LevelComplete { score: i64 },
    PlayerRespawned,
    EnemyKilled { pos: Vec2 },
    CoinCollected,
}

/// Complete level state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub generator: LevelGenerator,
    pub level: Level,
    pub player: Player,
    pub score: ScoreCounter,
    /// RNG for enemy spawns
    pub rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Build a level with the chosen generator. Fails only on invalid settings.
    pub fn new(kind: GeneratorKind, settings: Settings) -> Result<Self> {
        settings.validate()?;
        let mut generator = LevelGenerator::new(kind, &settings)?;
        let level = generator.generate(&settings);
        let rng = Pcg32::seed_from_u64(settings.seed ^ ACTOR_RNG_STREAM);

        Ok(Self {
            settings,
            phase: GamePhase::Playing,
            time_ticks: 0,
            generator,
            level,
            player: Player::new(),
            score: ScoreCounter::new(0),
            rng,
            events: Vec::new(),
        })
    }

    pub fn random(settings: Settings) -> Result<Self> {
        Self::new(GeneratorKind::Random, settings)
    }

    pub fn music(settings: Settings) -> Result<Self> {
        Self::new(GeneratorKind::Music, settings)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    /// Apply a bonus/penalty with its popup just ahead of the player
    pub fn award(&mut self, delta: i64) {
        let pos = self.player.pos + Vec2::new(100.0, -20.0);
        self.score.add(delta, pos);
    }

    /// Mark the level finished, announcing it once
    pub fn complete(&mut self) {
        if self.phase == GamePhase::Ended {
            return;
        }
        self.phase = GamePhase::Ended;
        log::info!(
            "Level complete after {} ticks, score {}",
            self.time_ticks,
            self.score.score
        );
        self.push_event(GameEvent::LevelComplete {
            score: self.score.score,
        });
    }
}
