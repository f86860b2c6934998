//! Platform abstraction layer
//!
//! The simulation never touches a canvas, the DOM or a clock directly. The
//! session driver talks to these collaborators instead:
//! - [`Renderer`]: draws the line and the letters, in registry order
//! - [`Display`]: shows the score (and optionally the typed buffer)
//! - [`LifecycleUi`]: told once when the game ends
//! - [`Clock`]: monotonic milliseconds for keystroke timestamps
//!
//! Start and restart requests flow the other way, as calls to
//! [`Session::start`](crate::Session::start) and
//! [`Session::restart`](crate::Session::restart).

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::ColorTag;

pub trait Renderer {
    fn clear(&mut self);
    fn draw_line(&mut self, y: f32);
    fn draw_letter(&mut self, text: &str, x: f32, y: f32, size: f32, color: ColorTag);
}

pub trait Display {
    fn set_score_text(&mut self, score: i64);

    /// Current typed buffer; ignored unless the display has somewhere to put it
    fn set_buffer_text(&mut self, _typed: &str) {}
}

pub trait LifecycleUi {
    fn on_game_over(&mut self, final_score: i64);
}

pub trait Clock {
    fn now_ms(&self) -> f64;
}
