//! Falling letter entity and its lifecycle state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Lifecycle of a letter: `Falling -> Hit | Missed -> Expired -> removed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterState {
    Falling,
    /// Typed by the player
    Hit,
    /// Crossed the line
    Missed,
    /// Resolution animation finished; pruned at the end of the tick
    Expired,
}

/// Logical color, mapped to a palette by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTag {
    Normal,
    Hit,
    Miss,
}

/// Axis-aligned bounding box in canvas space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// True if the boxes share interior area (touching edges do not count)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// A falling word of one to three uppercase letters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Letter {
    pub id: u32,
    text: String,
    /// Top-left corner; x is fixed at spawn
    pub pos: Vec2,
    pub render_size: f32,
    state: LetterState,
    /// Timestamp (ms) of the transition out of `Falling`
    resolved_at_ms: Option<f64>,
}

impl Letter {
    pub fn new(id: u32, text: impl Into<String>, pos: Vec2, size: f32) -> Self {
        Self {
            id,
            text: text.into(),
            pos,
            render_size: size,
            state: LetterState::Falling,
            resolved_at_ms: None,
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters (all ASCII)
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    pub fn state(&self) -> LetterState {
        self.state
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.state == LetterState::Falling
    }

    pub fn resolved_at_ms(&self) -> Option<f64> {
        self.resolved_at_ms
    }

    pub fn color(&self) -> ColorTag {
        match self.state {
            LetterState::Falling => ColorTag::Normal,
            LetterState::Hit => ColorTag::Hit,
            LetterState::Missed | LetterState::Expired => ColorTag::Miss,
        }
    }

    /// Footprint used for placement (based on the spawn glyph size, not the
    /// animated render size)
    pub fn bounds(&self, letter_size: f32) -> Aabb {
        word_bounds(self.pos, self.len(), letter_size)
    }

    /// Mark as typed. Returns false if the letter was already resolved.
    pub fn resolve_hit(&mut self, now_ms: f64) -> bool {
        self.resolve(LetterState::Hit, now_ms)
    }

    /// Mark as missed. Returns false if the letter was already resolved.
    pub fn resolve_miss(&mut self, now_ms: f64) -> bool {
        self.resolve(LetterState::Missed, now_ms)
    }

    fn resolve(&mut self, to: LetterState, now_ms: f64) -> bool {
        if self.state != LetterState::Falling {
            return false;
        }
        self.state = to;
        self.resolved_at_ms = Some(now_ms);
        true
    }

    /// Advance the post-resolution animation. Grows the glyph while inside the
    /// window and flips to `Expired` once it has elapsed.
    pub fn animate_resolution(&mut self, now_ms: f64, window_ms: f64, grow: f32) {
        let Some(at) = self.resolved_at_ms else {
            return;
        };
        if self.state == LetterState::Expired {
            return;
        }
        if now_ms - at < window_ms {
            self.render_size += grow;
        } else {
            self.state = LetterState::Expired;
        }
    }
}

/// Bounding box of an `n`-character word whose top-left corner is `origin`
pub fn word_bounds(origin: Vec2, n: usize, letter_size: f32) -> Aabb {
    Aabb::new(origin, Vec2::new(n as f32 * letter_size, letter_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_is_one_way() {
        let mut letter = Letter::new(1, "CAT", Vec2::new(10.0, 0.0), 30.0);
        assert!(letter.is_falling());
        assert_eq!(letter.color(), ColorTag::Normal);

        assert!(letter.resolve_hit(100.0));
        assert_eq!(letter.state(), LetterState::Hit);
        assert_eq!(letter.resolved_at_ms(), Some(100.0));
        assert_eq!(letter.color(), ColorTag::Hit);

        // A hit letter can never become missed (or be hit again)
        assert!(!letter.resolve_miss(120.0));
        assert!(!letter.resolve_hit(130.0));
        assert_eq!(letter.state(), LetterState::Hit);
        assert_eq!(letter.resolved_at_ms(), Some(100.0));
    }

    #[test]
    fn test_animation_grows_then_expires() {
        let mut letter = Letter::new(1, "Q", Vec2::ZERO, 30.0);

        // Falling letters do not animate
        letter.animate_resolution(50.0, 200.0, 2.0);
        assert_eq!(letter.render_size, 30.0);

        letter.resolve_miss(1000.0);
        letter.animate_resolution(1000.0, 200.0, 2.0);
        letter.animate_resolution(1100.0, 200.0, 2.0);
        assert_eq!(letter.render_size, 34.0);
        assert_eq!(letter.state(), LetterState::Missed);

        letter.animate_resolution(1200.0, 200.0, 2.0);
        assert_eq!(letter.state(), LetterState::Expired);
        assert_eq!(letter.render_size, 34.0);
        assert_eq!(letter.text(), "Q");
    }

    #[test]
    fn test_aabb_intersects() {
        let a = word_bounds(Vec2::new(0.0, 0.0), 2, 30.0);
        let b = word_bounds(Vec2::new(45.0, 10.0), 1, 30.0);
        let c = word_bounds(Vec2::new(60.0, 0.0), 1, 30.0);
        let d = word_bounds(Vec2::new(0.0, 40.0), 3, 30.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        // Edge contact is not an overlap
        assert!(!a.intersects(&c));
        assert!(!a.intersects(&d));
    }
}
