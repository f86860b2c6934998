//! Keystroke matching
//!
//! Keys accumulate in a [`TypingBuffer`] that is discarded after a period of
//! inactivity. The timeout is a deadline compared against the caller's clock
//! rather than a scheduled callback, so there is nothing to cancel.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState};

/// The player's in-progress input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypingBuffer {
    text: String,
    /// Contents are discarded at or after this timestamp (ms)
    deadline_ms: Option<f64>,
}

impl TypingBuffer {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn deadline_ms(&self) -> Option<f64> {
        self.deadline_ms
    }

    /// Append a key and push the deadline out by `timeout_ms`
    pub fn push(&mut self, key: char, now_ms: f64, timeout_ms: f64) {
        self.text.push(key.to_ascii_uppercase());
        self.deadline_ms = Some(now_ms + timeout_ms);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.deadline_ms = None;
    }

    /// Discard the contents if the deadline has passed; returns what was dropped
    pub fn expire(&mut self, now_ms: f64) -> Option<String> {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                Some(std::mem::take(&mut self.text))
            }
            _ => None,
        }
    }
}

/// What a single keystroke did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Completed a falling letter
    Hit { id: u32, points: i64 },
    /// Buffer is a proper prefix of at least one falling letter
    Partial,
    /// Buffer matches nothing; it keeps growing until it times out
    NoMatch,
}

/// Drop a timed-out buffer, recording a `BufferCleared` event if it held anything
pub fn expire_buffer(state: &mut GameState, now_ms: f64) {
    if let Some(discarded) = state.typed.expire(now_ms) {
        if !discarded.is_empty() {
            log::debug!("Typed buffer '{}' timed out", discarded);
            state.events.push(GameEvent::BufferCleared { discarded });
        }
    }
}

/// Feed one keystroke to the matcher.
///
/// Letters are scanned in spawn order; the first falling letter whose text
/// equals the buffer is hit, credited and the buffer cleared. At most one
/// letter resolves per key.
pub fn on_key(state: &mut GameState, key: char, now_ms: f64) -> KeyOutcome {
    expire_buffer(state, now_ms);
    state
        .typed
        .push(key, now_ms, state.config.buffer_timeout_ms);

    let typed = state.typed.as_str();
    let mut partial = false;
    let target = state.letters.iter_mut().find(|letter| {
        if !letter.is_falling() || !letter.text().starts_with(typed) {
            return false;
        }
        if letter.text() == typed {
            return true;
        }
        partial = true;
        false
    });

    let Some(letter) = target else {
        return if partial {
            KeyOutcome::Partial
        } else {
            KeyOutcome::NoMatch
        };
    };

    letter.resolve_hit(now_ms);
    let id = letter.id;
    let text = letter.text().to_string();
    let points = state.config.score_per_letter * text.len() as i64;
    state.score += points;
    state.typed.clear();

    log::debug!("Hit '{}' (+{}) score={}", text, points, state.score);
    state.events.push(GameEvent::Hit { id, text, points });
    KeyOutcome::Hit { id, points }
}
