//! Enemies, coins and projectiles, plus the pool that recycles them
//!
//! Nothing here is ever freed during a level: inactive entries are reused
//! before a pool grows.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// An entity that can sit idle in a [`Pool`]
pub trait Recyclable {
    fn is_active(&self) -> bool;
}

/// Collection that hands out inactive entries before allocating new ones
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T: Recyclable> Pool<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Pool pre-filled with `count` idle entries
    pub fn filled(count: usize, make: impl FnMut() -> T) -> Self {
        Self {
            items: std::iter::repeat_with(make).take(count).collect(),
        }
    }

    /// First idle entry, if any
    pub fn idle_mut(&mut self) -> Option<&mut T> {
        self.items.iter_mut().find(|item| !item.is_active())
    }

    /// Reuse an idle entry or grow the pool with `make`
    pub fn acquire(&mut self, make: impl FnOnce() -> T) -> &mut T {
        match self.items.iter().position(|item| !item.is_active()) {
            Some(idx) => &mut self.items[idx],
            None => {
                self.items.push(make());
                let last = self.items.len() - 1;
                &mut self.items[last]
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn active(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|item| item.is_active())
    }

    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut().filter(|item| item.is_active())
    }

    /// Total entries, idle included
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A flying enemy that bounces between two heights while drifting left
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub dir: Vec2,
    pub speed: f32,
    pub health: u8,
    pub active: bool,
    /// Set when the latest hit took the last health point
    pub killed: bool,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            pos: Vec2::new(ENEMY_START_X, ENEMY_START_Y),
            dir: Vec2::NEG_X,
            speed: 0.0,
            health: ENEMY_HEALTH,
            active: false,
            killed: false,
        }
    }
}

impl Recyclable for Enemy {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Enemy {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(ENEMY_SIZE))
    }

    /// Activate at the start position heading left-ish at a random speed
    pub fn spawn(&mut self, rng: &mut impl Rng) {
        let slope = rng.random_range(-3..=2) as f32;
        self.pos = Vec2::new(ENEMY_START_X, ENEMY_START_Y);
        self.dir = Vec2::new(-1.0, slope).normalize();
        self.speed = rng.random_range(ENEMY_MIN_SPEED..ENEMY_MAX_SPEED);
        self.health = ENEMY_HEALTH;
        self.active = true;
        self.killed = false;
    }

    /// Take one point of damage
    pub fn hit(&mut self) {
        if self.active {
            self.health = self.health.saturating_sub(1);
        }
        self.active = self.health > 0;
        self.killed = !self.active;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        let bounds = self.bounds();
        if bounds.top() < ENEMY_MIN_Y || bounds.bottom() > ENEMY_MAX_Y {
            self.dir.y = -self.dir.y;
        }
        if bounds.right() < 0.0 {
            self.reset();
            return;
        }
        self.pos += self.dir * self.speed * dt;
    }
}

/// A coin dropped by a killed enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub active: bool,
}

impl Recyclable for Coin {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Coin {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, active: true }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(COIN_SIZE))
    }

    pub fn spawn(&mut self, pos: Vec2) {
        self.pos = pos;
        self.active = true;
    }

    pub fn update(&mut self, dt: f32) {
        if self.bounds().right() < 0.0 {
            self.active = false;
        }
        if !self.active {
            return;
        }
        self.pos.x -= SCROLL_SPEED * dt;
    }
}

/// A shot fired by the player toward the cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub dir: Vec2,
    pub active: bool,
}

impl Recyclable for Projectile {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Projectile {
    pub fn new(pos: Vec2, target: Vec2) -> Self {
        let mut projectile = Self {
            pos,
            dir: Vec2::ZERO,
            active: false,
        };
        projectile.fire(pos, target);
        projectile
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(PROJECTILE_SIZE))
    }

    /// Launch from `from` toward `target`, aiming with the projectile's centre
    pub fn fire(&mut self, from: Vec2, target: Vec2) {
        self.pos = from;
        let aim = target - from - Vec2::splat(PROJECTILE_SIZE / 2.0);
        self.dir = aim.normalize_or_zero();
        self.active = true;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.pos += self.dir * PROJECTILE_SPEED * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_pool_reuses_idle_entries() {
        let mut pool: Pool<Coin> = Pool::new();
        pool.acquire(|| Coin::new(Vec2::ZERO));
        assert_eq!(pool.len(), 1);

        // Active entry is not reused
        pool.acquire(|| Coin::new(Vec2::ONE));
        assert_eq!(pool.len(), 2);

        pool.iter_mut().next().unwrap().active = false;
        let coin = pool.acquire(|| Coin::new(Vec2::ONE));
        coin.spawn(Vec2::new(5.0, 5.0));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.active().count(), 2);
    }

    #[test]
    fn test_filled_pool_starts_idle() {
        let mut pool = Pool::filled(ENEMY_COUNT, Enemy::default);
        assert_eq!(pool.len(), ENEMY_COUNT);
        assert_eq!(pool.active().count(), 0);
        assert!(pool.idle_mut().is_some());
    }

    #[test]
    fn test_enemy_spawn_ranges() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut enemy = Enemy::default();
        for _ in 0..100 {
            enemy.spawn(&mut rng);
            assert!(enemy.active);
            assert_eq!(enemy.health, ENEMY_HEALTH);
            assert!(enemy.dir.x < 0.0);
            assert!((enemy.dir.length() - 1.0).abs() < 1e-5);
            assert!(enemy.speed >= ENEMY_MIN_SPEED && enemy.speed < ENEMY_MAX_SPEED);
        }
    }

    #[test]
    fn test_enemy_dies_after_two_hits() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut enemy = Enemy::default();
        enemy.spawn(&mut rng);

        enemy.hit();
        assert!(enemy.active);
        assert!(!enemy.killed);

        enemy.hit();
        assert!(!enemy.active);
        assert!(enemy.killed);
    }

    #[test]
    fn test_enemy_bounces_and_leaves() {
        let mut enemy = Enemy {
            pos: Vec2::new(500.0, ENEMY_MIN_Y - 1.0),
            dir: Vec2::new(-1.0, -1.0).normalize(),
            speed: 100.0,
            active: true,
            ..Enemy::default()
        };
        enemy.update(SIM_DT);
        assert!(enemy.dir.y > 0.0);

        enemy.pos.x = -ENEMY_SIZE - 1.0;
        enemy.update(SIM_DT);
        assert!(!enemy.active);
        assert_eq!(enemy.pos, Vec2::new(ENEMY_START_X, ENEMY_START_Y));
    }

    #[test]
    fn test_coin_scrolls_and_expires() {
        let mut coin = Coin::new(Vec2::new(0.0, 200.0));
        coin.update(0.1);
        assert_eq!(coin.pos.x, -25.0);
        assert!(coin.active);

        coin.pos.x = -COIN_SIZE - 1.0;
        coin.update(0.1);
        assert!(!coin.active);
    }

    #[test]
    fn test_projectile_flies_toward_target() {
        let from = Vec2::new(100.0, 100.0);
        let target = from + Vec2::new(200.0, 0.0) + Vec2::splat(PROJECTILE_SIZE / 2.0);
        let mut shot = Projectile::new(from, target);
        assert!(shot.active);
        assert!((shot.dir - Vec2::X).length() < 1e-5);

        shot.update(0.5);
        assert!((shot.pos.x - 400.0).abs() < 1e-3);
    }
}
