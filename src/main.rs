//! Ninja Beats headless runner
//!
//! Plays one music level against a synthetic spectrum with a simple
//! autopilot, then logs how it went. Pass a settings JSON file as the first
//! argument to override the defaults.

use glam::Vec2;

use ninja_beats::Settings;
use ninja_beats::consts::*;
use ninja_beats::sim::beat::LOW_BAND;
use ninja_beats::sim::{
    AudioInput, GameEvent, GameState, PlatformKind, PlayerState, Rect, TickInput, tick,
};

/// Ticks of music before the synthetic track stops
const MUSIC_TICKS: u64 = 60 * 45;
/// Hard cap so a stuck run still terminates
const MAX_TICKS: u64 = 60 * 120;
/// Low-band kick every half second (120 BPM)
const KICK_PERIOD: u64 = 30;
/// Ticks between autopilot shots
const FIRE_PERIOD: u64 = 20;

fn load_settings() -> Settings {
    let Some(path) = std::env::args().nth(1) else {
        return Settings::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => Settings::from_json_or_default(&json),
        Err(e) => {
            log::warn!("Could not read {}: {}", path, e);
            Settings::default()
        }
    }
}

/// Spectrum with a loud low band on kicks and a quiet floor elsewhere
fn synthetic_spectrum(t: u64) -> Vec<f32> {
    let mut bins = vec![0.2; SPECTRUM_LEN];
    let low = if t % KICK_PERIOD == 0 { 4.0 } else { 1.0 };
    for bin in &mut bins[LOW_BAND.first..=LOW_BAND.last] {
        *bin = low;
    }
    // Slow wobble so the bands are never perfectly flat
    let wobble = 0.05 * ((t as f32) * 0.37).sin();
    for bin in &mut bins[LOW_BAND.last + 1..] {
        *bin += wobble;
    }
    bins
}

/// Jump when the lane ahead disappears but the other lane continues
fn wants_jump(state: &GameState) -> bool {
    let player = state.player.bounds();
    let ahead = Rect::new(
        Vec2::new(player.right(), player.top()),
        Vec2::new(PLATFORM_WIDTH / 2.0, player.size.y),
    );
    let lane_ahead = |kind: PlatformKind| {
        state
            .level
            .platforms
            .iter()
            .any(|p| p.kind == kind && p.bounds().overlaps_horizontally(&ahead))
    };

    match state.player.state {
        PlayerState::Floor => !lane_ahead(PlatformKind::Floor) && lane_ahead(PlatformKind::Ceiling),
        PlayerState::Ceiling => !lane_ahead(PlatformKind::Ceiling) && lane_ahead(PlatformKind::Floor),
        PlayerState::Midair => false,
    }
}

/// Aim at the nearest live enemy, if any
fn target(state: &GameState) -> Option<Vec2> {
    state
        .level
        .enemies
        .active()
        .map(|e| e.bounds())
        .min_by(|a, b| a.left().total_cmp(&b.left()))
        .map(|r| r.pos + r.size / 2.0)
}

fn main() {
    env_logger::init();
    log::info!("Ninja Beats (headless) starting...");

    let settings = load_settings();
    let mut state = match GameState::music(settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Could not start level: {}", e);
            std::process::exit(1);
        }
    };

    let mut input = TickInput::default();
    let (mut beats, mut kills, mut coins, mut deaths) = (0u32, 0u32, 0u32, 0u32);

    for t in 0..MAX_TICKS {
        input.audio = if t < MUSIC_TICKS {
            AudioInput::playing(synthetic_spectrum(t))
        } else {
            AudioInput::stopped()
        };

        // Release between presses so every jump is a fresh edge
        input.jump = wants_jump(&state) && !input.jump;
        let aim = target(&state);
        input.fire = aim.is_some() && t % FIRE_PERIOD == 0;
        input.aim = aim.unwrap_or_default();

        tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            match event {
                GameEvent::Beat => beats += 1,
                GameEvent::GenerationEnded => log::info!("Track stopped at tick {}", t),
                GameEvent::LevelComplete { score } => log::info!("Finished with score {}", score),
                GameEvent::PlayerRespawned => deaths += 1,
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::CoinCollected => coins += 1,
            }
        }

        if state.is_ended() {
            break;
        }
    }

    if !state.is_ended() {
        log::warn!("Tick cap reached before the finish gate");
    }
    log::info!(
        "ticks={} score={} beats={} kills={} coins={} deaths={}",
        state.time_ticks,
        state.score.score,
        beats,
        kills,
        coins,
        deaths
    );
}
