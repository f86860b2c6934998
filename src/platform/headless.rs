//! In-memory collaborators for tests and the native demo

use std::cell::Cell;

use super::{Clock, Display, LifecycleUi, Renderer};
use crate::sim::ColorTag;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Line {
        y: f32,
    },
    Letter {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: ColorTag,
    },
}

/// Keeps the draw calls of the most recent frame
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Number of `clear` calls (one per rendered frame)
    pub frames: u64,
    pub commands: Vec<DrawCmd>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts drawn in the last frame, in draw order
    pub fn letter_texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Letter { text, .. } => Some(text.as_str()),
                DrawCmd::Line { .. } => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.frames += 1;
        self.commands.clear();
    }

    fn draw_line(&mut self, y: f32) {
        self.commands.push(DrawCmd::Line { y });
    }

    fn draw_letter(&mut self, text: &str, x: f32, y: f32, size: f32, color: ColorTag) {
        self.commands.push(DrawCmd::Letter {
            text: text.to_string(),
            x,
            y,
            size,
            color,
        });
    }
}

/// Last published score and buffer
#[derive(Debug, Default)]
pub struct ScoreBoard {
    pub score: Option<i64>,
    pub buffer: String,
    pub updates: u64,
}

impl Display for ScoreBoard {
    fn set_score_text(&mut self, score: i64) {
        self.score = Some(score);
        self.updates += 1;
    }

    fn set_buffer_text(&mut self, typed: &str) {
        self.buffer.clear();
        self.buffer.push_str(typed);
    }
}

/// Remembers the game-over notification
#[derive(Debug, Default)]
pub struct GameOverLatch {
    pub final_score: Option<i64>,
    pub calls: u32,
}

impl LifecycleUi for GameOverLatch {
    fn on_game_over(&mut self, final_score: i64) {
        log::info!("Game over with score {}", final_score);
        self.final_score = Some(final_score);
        self.calls += 1;
    }
}

/// Hand-driven clock
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) -> f64 {
        let now = self.now.get() + ms;
        self.now.set(now);
        now
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
