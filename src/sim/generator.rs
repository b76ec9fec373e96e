//! Level generators
//!
//! A generator decides *which lane* new platforms go into and *when* the level
//! ends; scrolling is the same for every generator. Both policies share a
//! [`Spawner`] that handles placement, eviction, lane toggling and the finish
//! gate.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::beat::{AudioInput, BeatDetector};
use super::level::Level;
use super::platform::{Platform, PlatformKind, PlatformQueue};
use crate::consts::PLATFORM_WIDTH;
use crate::error::Result;
use crate::settings::Settings;

/// Which generator drives a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratorKind {
    Random,
    Music,
}

/// Shared platform placement helper
#[derive(Debug, Clone)]
pub struct Spawner {
    /// Lane new platforms are placed in
    lane: PlatformKind,
    spawn_point: f32,
    ended: bool,
}

impl Spawner {
    pub fn new(viewport_width: f32, lane: PlatformKind) -> Self {
        Self {
            lane,
            spawn_point: crate::spawn_point(viewport_width),
            ended: false,
        }
    }

    #[inline]
    pub fn lane(&self) -> PlatformKind {
        self.lane
    }

    #[inline]
    pub fn spawn_point(&self) -> f32 {
        self.spawn_point
    }

    #[inline]
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// Fill an empty buffer: one platform at the origin, then touching
    /// neighbours until the spawn point is covered.
    pub fn seed(&mut self, platforms: &mut PlatformQueue) {
        platforms.push(Platform::new(0.0, self.lane));
        while self.needs_platform(platforms) {
            self.add_platform(platforms);
        }
    }

    /// True when the newest platform has scrolled inside the spawn point
    pub fn needs_platform(&self, platforms: &PlatformQueue) -> bool {
        platforms.last().is_none_or(|p| p.x < self.spawn_point)
    }

    fn next_x(&self, platforms: &PlatformQueue) -> f32 {
        platforms.last().map_or(0.0, |p| p.x + PLATFORM_WIDTH)
    }

    /// Append a platform right behind the newest one, evicting the oldest
    /// platform if the buffer is full.
    pub fn add_platform(&mut self, platforms: &mut PlatformQueue) {
        let x = self.next_x(platforms);
        platforms.push(Platform::new(x, self.lane));
    }

    /// Place the dual finish gate behind the newest platform. Only the first
    /// call has any effect.
    pub fn end_level(&mut self, platforms: &mut PlatformQueue) -> bool {
        if self.ended {
            return false;
        }
        let x = self.next_x(platforms);
        platforms.push(Platform::new(x, PlatformKind::FinishCeiling));
        platforms.push(Platform::new(x, PlatformKind::FinishFloor));
        self.ended = true;
        true
    }

    /// Switch the lane between floor and ceiling
    pub fn toggle_lane(&mut self) {
        self.lane = self.lane.toggled();
    }
}

/// What a generator did during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorOutcome {
    pub beat: bool,
    pub placed: bool,
    /// The finish gate was placed this tick
    pub ended: bool,
}

/// Toggles the lane by coin flip and ends after a fixed number of platforms
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    spawner: Spawner,
    rng: Pcg32,
    placed: u32,
    budget: u32,
}

impl RandomGenerator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            spawner: Spawner::new(settings.viewport_width, PlatformKind::Floor),
            rng: Pcg32::seed_from_u64(settings.seed),
            placed: 0,
            budget: settings.random_level_platforms,
        }
    }

    /// Platforms placed since the initial buffer was seeded
    pub fn placed(&self) -> u32 {
        self.placed
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn update(&mut self, platforms: &mut PlatformQueue) -> GeneratorOutcome {
        let mut outcome = GeneratorOutcome::default();
        if self.spawner.has_ended() {
            return outcome;
        }
        if self.placed >= self.budget {
            outcome.ended = self.spawner.end_level(platforms);
            log::info!("Random level ended after {} platforms", self.placed);
            return outcome;
        }

        if self.rng.random_bool(0.5) {
            self.spawner.toggle_lane();
        }

        if self.spawner.needs_platform(platforms) {
            self.spawner.add_platform(platforms);
            self.placed += 1;
            outcome.placed = true;
        }
        outcome
    }
}

/// Toggles the lane on detected beats and ends when the track stops
#[derive(Debug, Clone)]
pub struct MusicGenerator {
    spawner: Spawner,
    detector: BeatDetector,
}

impl MusicGenerator {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self::with_detector(settings, BeatDetector::new(settings)?))
    }

    pub fn with_detector(settings: &Settings, detector: BeatDetector) -> Self {
        Self {
            spawner: Spawner::new(settings.viewport_width, PlatformKind::Floor),
            detector,
        }
    }

    pub fn detector(&self) -> &BeatDetector {
        &self.detector
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn update(&mut self, platforms: &mut PlatformQueue, audio: &AudioInput) -> GeneratorOutcome {
        let mut outcome = GeneratorOutcome::default();
        if self.spawner.has_ended() {
            return outcome;
        }

        self.detector.update(audio);

        // Held flags from the last playing tick are not fresh beats
        if audio.is_playing() && self.detector.is_beat() {
            self.spawner.toggle_lane();
            outcome.beat = true;
        }

        if audio.is_playing() && self.spawner.needs_platform(platforms) {
            self.spawner.add_platform(platforms);
            outcome.placed = true;
        }

        if audio.is_stopped() {
            outcome.ended = self.spawner.end_level(platforms);
            if outcome.ended {
                log::info!("Music level ended: track stopped");
            }
        }
        outcome
    }
}

/// A level generator of either policy
#[derive(Debug, Clone)]
pub enum LevelGenerator {
    Random(RandomGenerator),
    Music(MusicGenerator),
}

impl LevelGenerator {
    pub fn new(kind: GeneratorKind, settings: &Settings) -> Result<Self> {
        Ok(match kind {
            GeneratorKind::Random => LevelGenerator::Random(RandomGenerator::new(settings)),
            GeneratorKind::Music => LevelGenerator::Music(MusicGenerator::new(settings)?),
        })
    }

    pub fn kind(&self) -> GeneratorKind {
        match self {
            LevelGenerator::Random(_) => GeneratorKind::Random,
            LevelGenerator::Music(_) => GeneratorKind::Music,
        }
    }

    pub fn spawner(&self) -> &Spawner {
        match self {
            LevelGenerator::Random(g) => &g.spawner,
            LevelGenerator::Music(g) => &g.spawner,
        }
    }

    fn spawner_mut(&mut self) -> &mut Spawner {
        match self {
            LevelGenerator::Random(g) => &mut g.spawner,
            LevelGenerator::Music(g) => &mut g.spawner,
        }
    }

    /// Build a level with its starting platforms in place
    pub fn generate(&mut self, settings: &Settings) -> Level {
        let mut level = Level::new(settings);
        self.spawner_mut().seed(&mut level.platforms);
        log::info!(
            "Generated {:?} level: {} platforms (capacity {})",
            self.kind(),
            level.platforms.len(),
            level.platforms.capacity()
        );
        level
    }

    /// Per-tick generation step
    pub fn update(&mut self, platforms: &mut PlatformQueue, audio: &AudioInput) -> GeneratorOutcome {
        match self {
            LevelGenerator::Random(g) => g.update(platforms),
            LevelGenerator::Music(g) => g.update(platforms, audio),
        }
    }

    pub fn has_ended(&self) -> bool {
        self.spawner().has_ended()
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::consts::PLATFORM_WIDTH;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn seeded_buffer_ends_just_past_spawn_point(width in 1.0f32..4000.0) {
            let mut platforms = PlatformQueue::for_viewport(width);
            let mut spawner = Spawner::new(width, PlatformKind::Floor);
            spawner.seed(&mut platforms);

            let last = platforms.last().unwrap().x;
            let spawn = crate::spawn_point(width);
            prop_assert!(last >= spawn, "last {} < spawn {}", last, spawn);
            prop_assert!(last < spawn + PLATFORM_WIDTH, "last {} overshoots {}", last, spawn);
            prop_assert!(platforms.len() <= crate::platform_capacity(width));
        }
    }
}
