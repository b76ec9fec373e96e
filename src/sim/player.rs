//! The player: a runner that flips between floor and ceiling

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actors::{Pool, Projectile};
use super::collision::Rect;
use crate::consts::*;

/// Where the player currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    /// Standing on a floor platform
    Floor,
    /// Hanging under a ceiling platform
    Ceiling,
    /// Falling or rising between lanes
    #[default]
    Midair,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    /// Vertical direction, +1 down or -1 up
    pub dir: Vec2,
    pub speed: f32,
    pub state: PlayerState,
    /// Invulnerable after a respawn until the next floor landing
    pub respawned: bool,
    pub projectiles: Pool<Projectile>,
    /// Previous held state of the jump and fire controls
    prev_jump: bool,
    prev_fire: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            dir: Vec2::Y,
            speed: PLAYER_SPAWN_SPEED,
            state: PlayerState::Midair,
            respawned: false,
            projectiles: Pool::new(),
            prev_jump: false,
            prev_fire: false,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }

    /// Vertical velocity (positive is down)
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.dir * self.speed
    }

    /// Move along the current direction and advance live projectiles
    pub fn update(&mut self, dt: f32) {
        for projectile in self.projectiles.iter_mut() {
            projectile.update(dt);
        }
        self.pos += self.velocity() * dt;
    }

    /// Leave any surface: the platform underneath may have scrolled away
    pub fn release_support(&mut self) {
        if matches!(self.state, PlayerState::Floor | PlayerState::Ceiling) {
            self.state = PlayerState::Midair;
            self.speed = PLAYER_MIDAIR_SPEED;
        }
    }

    /// Snap onto a floor platform whose top edge is at `y + height`
    pub fn land_on_floor(&mut self, y: f32) {
        self.pos.y = y;
        self.state = PlayerState::Floor;
        self.respawned = false;
    }

    /// Snap under a ceiling platform whose bottom edge is at `y`
    pub fn land_on_ceiling(&mut self, y: f32) {
        self.pos.y = y;
        self.state = PlayerState::Ceiling;
    }

    /// Jump to the other lane on a rising edge of the jump control.
    /// Returns true if a jump happened.
    pub fn jump(&mut self, held: bool) -> bool {
        let pressed = held && !self.prev_jump;
        self.prev_jump = held;
        if !pressed {
            return false;
        }
        let dir = match self.state {
            PlayerState::Floor => Vec2::NEG_Y,
            PlayerState::Ceiling => Vec2::Y,
            PlayerState::Midair => return false,
        };
        self.dir = dir;
        self.speed = PLAYER_MIDAIR_SPEED;
        self.state = PlayerState::Midair;
        true
    }

    /// Fire toward `target` on a rising edge of the fire control, reusing a
    /// spent projectile when one is available. Returns true if a shot fired.
    pub fn shoot(&mut self, held: bool, target: Vec2) -> bool {
        let pressed = held && !self.prev_fire;
        self.prev_fire = held;
        if !pressed {
            return false;
        }
        let from = self.pos;
        self.projectiles
            .acquire(|| Projectile::new(from, target))
            .fire(from, target);
        true
    }

    /// Back to the start position, invulnerable and falling slowly
    pub fn respawn(&mut self) {
        self.pos = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
        self.respawned = true;
        self.dir = Vec2::Y;
        self.speed = PLAYER_SPAWN_SPEED;
        self.state = PlayerState::Midair;
    }

    /// Whether the player has left the viewport by more than its own height
    pub fn is_out_of_bounds(&self, viewport_height: f32) -> bool {
        self.pos.y < -PLAYER_HEIGHT || self.pos.y > viewport_height + PLAYER_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_floor() -> Player {
        let mut player = Player::new();
        player.land_on_floor(FLOOR_HEIGHT - PLAYER_HEIGHT);
        player
    }

    #[test]
    fn test_starts_midair() {
        let player = Player::new();
        assert_eq!(player.state, PlayerState::Midair);
        assert_eq!(player.speed, PLAYER_SPAWN_SPEED);
        assert!(player.dir.y > 0.0);
    }

    #[test]
    fn test_jump_from_floor_goes_up() {
        let mut player = on_floor();
        assert!(player.jump(true));
        assert_eq!(player.state, PlayerState::Midair);
        assert_eq!(player.dir, Vec2::NEG_Y);
        assert_eq!(player.speed, PLAYER_MIDAIR_SPEED);
    }

    #[test]
    fn test_jump_from_ceiling_goes_down() {
        let mut player = Player::new();
        player.dir = Vec2::NEG_Y;
        player.land_on_ceiling(CEILING_HEIGHT + PLATFORM_HEIGHT);
        assert!(player.jump(true));
        assert_eq!(player.dir, Vec2::Y);
    }

    #[test]
    fn test_held_jump_is_ignored() {
        let mut player = on_floor();
        player.jump(true);
        player.land_on_floor(FLOOR_HEIGHT - PLAYER_HEIGHT);
        assert!(!player.jump(true), "held key must not jump again");
        assert_eq!(player.state, PlayerState::Floor);

        player.jump(false);
        assert!(player.jump(true));
    }

    #[test]
    fn test_no_jump_midair() {
        let mut player = Player::new();
        assert!(!player.jump(true));
        assert_eq!(player.dir, Vec2::Y);
    }

    #[test]
    fn test_release_support() {
        let mut player = on_floor();
        player.speed = 0.0;
        player.release_support();
        assert_eq!(player.state, PlayerState::Midair);
        assert_eq!(player.speed, PLAYER_MIDAIR_SPEED);

        // Midair is left alone
        player.speed = PLAYER_SPAWN_SPEED;
        player.release_support();
        assert_eq!(player.speed, PLAYER_SPAWN_SPEED);
    }

    #[test]
    fn test_floor_landing_clears_invulnerability() {
        let mut player = Player::new();
        player.respawn();
        assert!(player.respawned);
        player.land_on_ceiling(CEILING_HEIGHT + PLATFORM_HEIGHT);
        assert!(player.respawned);
        player.land_on_floor(FLOOR_HEIGHT - PLAYER_HEIGHT);
        assert!(!player.respawned);
    }

    #[test]
    fn test_shoot_recycles_projectiles() {
        let mut player = Player::new();
        let target = Vec2::new(700.0, 150.0);
        assert!(player.shoot(true, target));
        assert!(!player.shoot(true, target));
        player.shoot(false, target);
        assert!(player.shoot(true, target));
        assert_eq!(player.projectiles.len(), 2);

        for shot in player.projectiles.iter_mut() {
            shot.active = false;
        }
        player.shoot(false, target);
        player.shoot(true, target);
        assert_eq!(player.projectiles.len(), 2);
        assert_eq!(player.projectiles.active().count(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut player = Player::new();
        assert!(!player.is_out_of_bounds(VIEWPORT_HEIGHT));
        player.pos.y = VIEWPORT_HEIGHT + PLAYER_HEIGHT + 1.0;
        assert!(player.is_out_of_bounds(VIEWPORT_HEIGHT));
        player.pos.y = -PLAYER_HEIGHT - 1.0;
        assert!(player.is_out_of_bounds(VIEWPORT_HEIGHT));
    }
}
