//! Idle/demo mode - a bot that types for the player
//!
//! It always chases the falling letter closest to the line and types at a fixed
//! cadence, so it keeps up early on and eventually loses once letters fall fast
//! enough.

use crate::session::Session;
use crate::sim::{GameState, KeyOutcome};

#[derive(Debug, Clone)]
pub struct Autoplayer {
    /// Minimum time between two keystrokes (ms)
    pub key_interval_ms: f64,
    last_key_ms: Option<f64>,
}

impl Default for Autoplayer {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl Autoplayer {
    pub fn new(key_interval_ms: f64) -> Self {
        Self {
            key_interval_ms,
            last_key_ms: None,
        }
    }

    /// Next character to type, if the bot is ready and has a target
    pub fn next_key(&mut self, state: &GameState, now_ms: f64) -> Option<char> {
        if let Some(last) = self.last_key_ms {
            if now_ms - last < self.key_interval_ms {
                return None;
            }
        }

        let target = state.falling().max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

        // A buffer that has timed out is as good as empty
        let typed = match state.typed.deadline_ms() {
            Some(deadline) if now_ms >= deadline => "",
            _ => state.typed.as_str(),
        };
        // Something else is in the buffer; wait for it to time out
        if !target.text().starts_with(typed) {
            return None;
        }

        let key = target.text()[typed.len()..].chars().next()?;
        self.last_key_ms = Some(now_ms);
        Some(key)
    }

    /// Type into `session` if it is time to
    pub fn drive(&mut self, session: &mut Session, now_ms: f64) -> Option<KeyOutcome> {
        let key = self.next_key(session.state(), now_ms)?;
        session.key(key, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::Letter;
    use glam::Vec2;

    #[test]
    fn test_types_lowest_letter_at_cadence() {
        let mut session = Session::new(GameConfig::default(), 1);
        session.start();
        {
            let state = session.state_mut();
            state
                .letters
                .push(Letter::new(1, "AB", Vec2::new(0.0, 100.0), 30.0));
            state
                .letters
                .push(Letter::new(2, "XY", Vec2::new(100.0, 300.0), 30.0));
        }

        let mut bot = Autoplayer::new(100.0);
        assert_eq!(bot.drive(&mut session, 0.0), Some(KeyOutcome::Partial));
        // Too soon for another key
        assert_eq!(bot.drive(&mut session, 50.0), None);
        assert_eq!(
            bot.drive(&mut session, 100.0),
            Some(KeyOutcome::Hit { id: 2, points: 20 })
        );
        assert_eq!(
            bot.next_key(session.state(), 200.0),
            Some('A')
        );
    }

    #[test]
    fn test_waits_out_foreign_buffer() {
        let mut session = Session::new(GameConfig::default(), 1);
        session.start();
        session
            .state_mut()
            .letters
            .push(Letter::new(1, "Q", Vec2::new(0.0, 100.0), 30.0));
        session.key('Z', 0.0);

        let mut bot = Autoplayer::new(10.0);
        assert_eq!(bot.next_key(session.state(), 100.0), None);
        // Once the buffer times out the bot can go
        assert_eq!(bot.next_key(session.state(), 600.0), Some('Q'));
    }
}
