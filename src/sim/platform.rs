//! Platforms and the bounded scroll buffer that holds them

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Platform types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Floor,
    Ceiling,
    FinishFloor,
    FinishCeiling,
}

impl PlatformKind {
    /// Top edge for platforms of this kind
    pub fn height(&self) -> f32 {
        match self {
            PlatformKind::Floor | PlatformKind::FinishFloor => FLOOR_HEIGHT,
            PlatformKind::Ceiling | PlatformKind::FinishCeiling => CEILING_HEIGHT,
        }
    }

    pub fn is_finish(&self) -> bool {
        matches!(self, PlatformKind::FinishFloor | PlatformKind::FinishCeiling)
    }

    /// Opposite lane (finish kinds are terminal and stay put)
    pub fn toggled(&self) -> Self {
        match self {
            PlatformKind::Floor => PlatformKind::Ceiling,
            PlatformKind::Ceiling => PlatformKind::Floor,
            other => *other,
        }
    }
}

/// A scrolling platform. Only `x` changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub kind: PlatformKind,
    pub x: f32,
}

impl Platform {
    pub fn new(x: f32, kind: PlatformKind) -> Self {
        Self { kind, x }
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.kind.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            Vec2::new(self.x, self.y()),
            Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT),
        )
    }

    /// Scroll left by one timestep
    #[inline]
    pub fn scroll(&mut self, dt: f32) {
        self.x -= SCROLL_SPEED * dt;
    }

    /// Whether any of the platform is horizontally inside the viewport
    pub fn is_visible(&self, viewport_width: f32) -> bool {
        self.x + PLATFORM_WIDTH > 0.0 && self.x < viewport_width
    }
}

/// FIFO platform buffer with a hard capacity.
///
/// Pushing onto a full buffer evicts the oldest platform first, whether or not
/// it is still visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformQueue {
    platforms: VecDeque<Platform>,
    capacity: usize,
}

impl PlatformQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            platforms: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Buffer sized for a viewport of the given width
    pub fn for_viewport(viewport_width: f32) -> Self {
        Self::new(crate::platform_capacity(viewport_width))
    }

    pub fn push(&mut self, platform: Platform) {
        while self.platforms.len() >= self.capacity {
            self.evict_oldest();
        }
        self.platforms.push_back(platform);
    }

    pub fn evict_oldest(&mut self) -> Option<Platform> {
        self.platforms.pop_front()
    }

    pub fn last(&self) -> Option<&Platform> {
        self.platforms.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Move every platform left by one timestep
    pub fn scroll(&mut self, dt: f32) {
        for platform in &mut self.platforms {
            platform.scroll(dt);
        }
    }

    /// Platforms that overlap the viewport, in creation order
    pub fn visible(&self, viewport_width: f32) -> impl Iterator<Item = &Platform> {
        self.platforms
            .iter()
            .filter(move |p| p.is_visible(viewport_width))
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn capacity_never_exceeded(width in 1.0f32..4000.0, pushes in 0usize..200) {
            let mut queue = PlatformQueue::for_viewport(width);
            for i in 0..pushes {
                queue.push(Platform::new(i as f32 * PLATFORM_WIDTH, PlatformKind::Floor));
                prop_assert!(queue.len() <= crate::platform_capacity(width));
            }
        }
    }
}
