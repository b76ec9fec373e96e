//! Fixed timestep simulation tick
//!
//! One call per frame. Order matters: generator, level, player, then every
//! collision pass, then the score.

use glam::Vec2;

use super::beat::AudioInput;
use super::collision::{Contact, platform_contact};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held state of the jump control
    pub jump: bool,
    /// Held state of the fire control
    pub fire: bool,
    /// Cursor position to fire toward
    pub aim: Vec2,
    /// Pause toggle
    pub pause: bool,
    /// Audio snapshot (ignored by random levels)
    pub audio: AudioInput,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::Ended => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    let outcome = state.generator.update(&mut state.level.platforms, &input.audio);
    if outcome.beat {
        state.push_event(GameEvent::Beat);
    }
    if outcome.ended {
        state.push_event(GameEvent::GenerationEnded);
    }

    state.level.update(dt, &mut state.rng);

    state.player.shoot(input.fire, input.aim);
    state.player.update(dt);

    resolve_platforms(state);
    state.player.jump(input.jump);
    check_player_out_of_bounds(state);
    check_projectiles_out_of_bounds(state);
    check_player_coins(state);
    check_projectile_platforms(state);
    check_projectile_enemies(state);
    check_player_enemies(state);
    check_respawn_guard(state);

    state.score.update(dt);
}

/// Re-validate the player's support against every platform
pub fn resolve_platforms(state: &mut GameState) {
    state.player.release_support();

    let tolerance = state.settings.forgiveness;
    let mut finished = false;
    for platform in state.level.platforms.iter() {
        let bounds = state.player.bounds();
        match platform_contact(
            &bounds,
            state.player.dir.y,
            &platform.bounds(),
            platform.kind,
            tolerance,
        ) {
            Contact::Floor { y } => state.player.land_on_floor(y),
            Contact::Ceiling { y } => state.player.land_on_ceiling(y),
            Contact::Finish => finished = true,
            Contact::None => {}
        }
    }

    if finished {
        state.complete();
    }
}

fn respawn_player(state: &mut GameState) {
    state.player.respawn();
    state.award(DEATH_PENALTY);
    state.push_event(GameEvent::PlayerRespawned);
    log::debug!("Player respawned, score {}", state.score.score);
}

fn check_player_out_of_bounds(state: &mut GameState) {
    if state.player.is_out_of_bounds(state.settings.viewport_height) {
        respawn_player(state);
    }
}

fn check_projectiles_out_of_bounds(state: &mut GameState) {
    let (width, height) = (state.settings.viewport_width, state.settings.viewport_height);
    for projectile in state.player.projectiles.active_mut() {
        if !projectile.bounds().is_on_screen(width, height) {
            projectile.active = false;
        }
    }
}

fn check_player_coins(state: &mut GameState) {
    let player = state.player.bounds();
    let mut collected = 0;
    for coin in state.level.coins.active_mut() {
        if coin.bounds().intersects(&player) {
            coin.active = false;
            collected += 1;
        }
    }
    for _ in 0..collected {
        state.award(COIN_SCORE);
        state.push_event(GameEvent::CoinCollected);
    }
}

fn check_projectile_platforms(state: &mut GameState) {
    for platform in state.level.platforms.iter() {
        let bounds = platform.bounds();
        if let Some(projectile) = state
            .player
            .projectiles
            .active_mut()
            .find(|p| p.bounds().intersects(&bounds))
        {
            projectile.active = false;
        }
    }
}

fn check_projectile_enemies(state: &mut GameState) {
    let mut kills = Vec::new();
    for enemy in state.level.enemies.active_mut() {
        let bounds = enemy.bounds();
        let Some(projectile) = state
            .player
            .projectiles
            .active_mut()
            .find(|p| p.bounds().intersects(&bounds))
        else {
            continue;
        };
        projectile.active = false;
        enemy.hit();
        if enemy.killed {
            kills.push(enemy.pos);
        }
    }

    for pos in kills {
        state.award(KILL_SCORE);
        state.level.spawn_coin(pos);
        state.push_event(GameEvent::EnemyKilled { pos });
        log::debug!("Enemy killed at ({:.0}, {:.0})", pos.x, pos.y);
    }
}

fn check_player_enemies(state: &mut GameState) {
    if state.player.respawned {
        return;
    }
    let player = state.player.bounds();
    let Some(enemy) = state
        .level
        .enemies
        .active_mut()
        .find(|e| e.bounds().intersects(&player))
    else {
        return;
    };
    enemy.hit();
    respawn_player(state);
}

/// Stop an invulnerable player at floor height so it cannot fall out again
/// before it has landed.
fn check_respawn_guard(state: &mut GameState) {
    let player = &mut state.player;
    if player.respawned && player.pos.y + PLAYER_HEIGHT - 1.0 >= FLOOR_HEIGHT {
        player.speed = 0.0;
    }
}
