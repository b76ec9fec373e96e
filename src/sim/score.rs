//! Running score with transient bonus/penalty popups

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SCORE_POPUP_TIME;

/// A bonus or penalty shown briefly next to the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePopup {
    pub delta: i64,
    pub pos: Vec2,
    /// Seconds left on screen
    pub remaining: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreCounter {
    pub score: i64,
    pub popup: Option<ScorePopup>,
}

impl ScoreCounter {
    pub fn new(initial: i64) -> Self {
        Self {
            score: initial,
            popup: None,
        }
    }

    /// One tick of play: passive gain and popup expiry
    pub fn update(&mut self, dt: f32) {
        self.score += 1;
        if let Some(popup) = &mut self.popup {
            popup.remaining -= dt;
            if popup.remaining <= 0.0 {
                self.popup = None;
            }
        }
    }

    /// Apply a bonus (positive) or penalty (negative) and show it at `pos`
    pub fn add(&mut self, delta: i64, pos: Vec2) {
        self.score += delta;
        self.popup = Some(ScorePopup {
            delta,
            pos,
            remaining: SCORE_POPUP_TIME,
        });
    }
}
