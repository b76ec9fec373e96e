//! A level: the platform buffer, the actors that live in it, and the background

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actors::{Coin, Enemy, Pool};
use super::platform::PlatformQueue;
use crate::consts::*;
use crate::settings::Settings;

/// Two viewport-wide tiles scrolling left in a loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Background {
    pub tiles: [f32; 2],
    width: f32,
}

impl Background {
    pub fn new(width: f32) -> Self {
        Self {
            tiles: [0.0, width],
            width,
        }
    }

    pub fn update(&mut self, dt: f32) {
        for x in &mut self.tiles {
            if *x < -self.width {
                *x += 2.0 * self.width;
            }
            *x -= BACKGROUND_SPEED * dt;
        }
    }
}

/// Everything that scrolls past the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub platforms: PlatformQueue,
    pub enemies: Pool<Enemy>,
    pub coins: Pool<Coin>,
    pub background: Background,
    /// Seconds since the level started
    pub elapsed: f32,
    next_enemy_at: f32,
    enemy_interval: f32,
}

impl Level {
    /// Empty level sized for the configured viewport
    pub fn new(settings: &Settings) -> Self {
        Self {
            platforms: PlatformQueue::for_viewport(settings.viewport_width),
            enemies: Pool::filled(ENEMY_COUNT, Enemy::default),
            coins: Pool::new(),
            background: Background::new(settings.viewport_width),
            elapsed: 0.0,
            next_enemy_at: 0.0,
            enemy_interval: settings.enemy_spawn_interval,
        }
    }

    /// Advance background, enemies, coins and platforms by one tick
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        self.elapsed += dt;
        self.background.update(dt);

        if self.elapsed > self.next_enemy_at {
            match self.enemies.idle_mut() {
                Some(enemy) => enemy.spawn(rng),
                None => log::trace!("No idle enemy to spawn"),
            }
            self.next_enemy_at = self.elapsed + self.enemy_interval;
        }

        for enemy in self.enemies.iter_mut() {
            enemy.update(dt);
        }
        for coin in self.coins.iter_mut() {
            coin.update(dt);
        }
        self.platforms.scroll(dt);
    }

    /// Drop a coin at `pos`, recycling a collected or expired one if possible
    pub fn spawn_coin(&mut self, pos: Vec2) {
        self.coins.acquire(|| Coin::new(pos)).spawn(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_background_wraps() {
        let mut bg = Background::new(VIEWPORT_WIDTH);
        // 5 s at 160 units/s covers both tiles
        for _ in 0..300 {
            bg.update(SIM_DT);
        }
        for x in bg.tiles {
            assert!(x >= -VIEWPORT_WIDTH - BACKGROUND_SPEED * SIM_DT && x <= VIEWPORT_WIDTH);
        }
    }

    #[test]
    fn test_enemy_spawn_cadence() {
        let settings = Settings::default();
        let mut level = Level::new(&settings);
        let mut rng = Pcg32::seed_from_u64(1);

        level.update(SIM_DT, &mut rng);
        assert_eq!(level.enemies.active().count(), 1);

        // Nothing new until the interval elapses
        for _ in 0..60 {
            level.update(SIM_DT, &mut rng);
        }
        assert_eq!(level.enemies.active().count(), 1);

        for _ in 0..70 {
            level.update(SIM_DT, &mut rng);
        }
        assert_eq!(level.enemies.active().count(), 2);
    }

    #[test]
    fn test_enemy_pool_never_grows() {
        let settings = Settings {
            enemy_spawn_interval: 0.01,
            ..Settings::default()
        };
        let mut level = Level::new(&settings);
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            level.update(SIM_DT, &mut rng);
        }
        assert_eq!(level.enemies.len(), ENEMY_COUNT);
    }

    #[test]
    fn test_spawn_coin_recycles() {
        let mut level = Level::new(&Settings::default());
        level.spawn_coin(Vec2::new(300.0, 200.0));
        level.coins.iter_mut().for_each(|c| c.active = false);
        level.spawn_coin(Vec2::new(400.0, 200.0));
        assert_eq!(level.coins.len(), 1);
        assert_eq!(level.coins.iter().next().unwrap().pos.x, 400.0);
    }
}
