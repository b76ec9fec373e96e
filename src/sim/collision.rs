//! Collision geometry and platform contact rules
//!
//! Everything here is axis-aligned: sprites are boxes anchored at their
//! top-left corner, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::platform::PlatformKind;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap; boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.overlaps_horizontally(other)
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.left() < other.right() && other.left() < self.right()
    }

    /// Whether any part of the box lies inside a viewport of the given size
    pub fn is_on_screen(&self, width: f32, height: f32) -> bool {
        self.right() >= 0.0 && self.left() <= width && self.bottom() >= 0.0 && self.top() <= height
    }
}

/// Outcome of testing the player against one platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Player lands on top; `y` is the player's new top edge
    Floor { y: f32 },
    /// Player sticks underneath; `y` is the player's new top edge
    Ceiling { y: f32 },
    /// Player reached a finish gate
    Finish,
    None,
}

/// Decide how the player touches a platform.
///
/// Floor and ceiling platforms only catch a player moving toward their
/// contact edge whose leading edge is within `tolerance` of it, so a player
/// jumping away from a surface is never pulled back. Finish platforms
/// complete the level on overlap, or once they have scrolled past the player.
pub fn platform_contact(
    player: &Rect,
    vertical_dir: f32,
    platform: &Rect,
    kind: PlatformKind,
    tolerance: f32,
) -> Contact {
    match kind {
        PlatformKind::Floor => {
            if vertical_dir > 0.0
                && player.overlaps_horizontally(platform)
                && (player.bottom() - platform.top()).abs() <= tolerance
            {
                Contact::Floor {
                    y: platform.top() - player.size.y,
                }
            } else {
                Contact::None
            }
        }
        PlatformKind::Ceiling => {
            if vertical_dir < 0.0
                && player.overlaps_horizontally(platform)
                && (player.top() - platform.bottom()).abs() <= tolerance
            {
                Contact::Ceiling {
                    y: platform.bottom(),
                }
            } else {
                Contact::None
            }
        }
        PlatformKind::FinishFloor | PlatformKind::FinishCeiling => {
            if player.intersects(platform) || platform.right() < player.left() {
                Contact::Finish
            } else {
                Contact::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn floor_at(x: f32) -> Rect {
        Rect::new(
            Vec2::new(x, FLOOR_HEIGHT),
            Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT),
        )
    }

    fn ceiling_at(x: f32) -> Rect {
        Rect::new(
            Vec2::new(x, CEILING_HEIGHT),
            Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT),
        )
    }

    fn player_with_bottom(bottom: f32) -> Rect {
        Rect::new(
            Vec2::new(PLAYER_START_X, bottom - PLAYER_HEIGHT),
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        )
    }

    #[test]
    fn test_intersects_is_strict() {
        let a = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        let c = Rect::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&b));
    }

    #[test]
    fn test_floor_snap_within_tolerance() {
        let player = player_with_bottom(395.0);
        let contact =
            platform_contact(&player, 1.0, &floor_at(0.0), PlatformKind::Floor, FORGIVENESS);
        assert_eq!(
            contact,
            Contact::Floor {
                y: FLOOR_HEIGHT - PLAYER_HEIGHT
            }
        );
    }

    #[test]
    fn test_floor_no_snap_outside_tolerance() {
        let player = player_with_bottom(200.0);
        let contact =
            platform_contact(&player, 1.0, &floor_at(0.0), PlatformKind::Floor, FORGIVENESS);
        assert_eq!(contact, Contact::None);

        // Sunk too deep into the platform: falls through
        let player = player_with_bottom(FLOOR_HEIGHT + FORGIVENESS + 1.0);
        let contact =
            platform_contact(&player, 1.0, &floor_at(0.0), PlatformKind::Floor, FORGIVENESS);
        assert_eq!(contact, Contact::None);
    }

    #[test]
    fn test_floor_ignores_rising_player() {
        let player = player_with_bottom(FLOOR_HEIGHT - 10.0);
        let contact =
            platform_contact(&player, -1.0, &floor_at(0.0), PlatformKind::Floor, FORGIVENESS);
        assert_eq!(contact, Contact::None);
    }

    #[test]
    fn test_floor_requires_horizontal_overlap() {
        let player = player_with_bottom(FLOOR_HEIGHT + 5.0);
        let contact =
            platform_contact(&player, 1.0, &floor_at(300.0), PlatformKind::Floor, FORGIVENESS);
        assert_eq!(contact, Contact::None);
    }

    #[test]
    fn test_ceiling_snap() {
        let bottom_edge = CEILING_HEIGHT + PLATFORM_HEIGHT;
        let player = Rect::new(
            Vec2::new(PLAYER_START_X, bottom_edge - 10.0),
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        );
        let contact =
            platform_contact(&player, -1.0, &ceiling_at(0.0), PlatformKind::Ceiling, FORGIVENESS);
        assert_eq!(contact, Contact::Ceiling { y: bottom_edge });

        let contact =
            platform_contact(&player, 1.0, &ceiling_at(0.0), PlatformKind::Ceiling, FORGIVENESS);
        assert_eq!(contact, Contact::None);
    }

    #[test]
    fn test_finish_on_overlap_or_passed() {
        let player = player_with_bottom(FLOOR_HEIGHT + 5.0);
        let gate = floor_at(PLAYER_START_X);
        assert_eq!(
            platform_contact(&player, 0.0, &gate, PlatformKind::FinishFloor, 0.0),
            Contact::Finish
        );

        // Midair between the gates: nothing until the gate is behind us
        let player = player_with_bottom(300.0);
        let ceiling_gate = ceiling_at(PLAYER_START_X);
        assert_eq!(
            platform_contact(&player, 1.0, &ceiling_gate, PlatformKind::FinishCeiling, 0.0),
            Contact::None
        );
        let passed = ceiling_at(PLAYER_START_X - PLATFORM_WIDTH - 1.0);
        assert_eq!(
            platform_contact(&player, 1.0, &passed, PlatformKind::FinishCeiling, 0.0),
            Contact::Finish
        );
    }
}
