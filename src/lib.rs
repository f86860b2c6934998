//! Letter Rain - a falling-letters typing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, letter lifecycle, input matching, difficulty)
//! - `session`: Frame driver and start/restart lifecycle
//! - `platform`: Renderer/display/clock collaborators (headless and browser)
//! - `config`: Data-driven game tuning and variant presets
//! - `autoplay`: Idle/demo mode bot

pub mod autoplay;
pub mod config;
pub mod platform;
pub mod session;
pub mod sim;

pub use autoplay::Autoplayer;
pub use config::{ConfigError, GameConfig, MissEdge, SpawnPolicyKind, Variant};
pub use session::{FrameStatus, Session, SessionPhase};

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions (pixels)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
    /// The red line letters must not cross
    pub const LINE_Y: f32 = 550.0;

    /// Letter glyph size (pixels); also the width of one character cell
    pub const LETTER_SIZE: f32 = 30.0;
    /// Longest word a spawner may emit
    pub const MAX_WORD_LEN: usize = 3;

    /// Fall speed at score 0 (pixels per tick)
    pub const INITIAL_SPEED: f32 = 2.0;
    /// Points per character
    pub const SCORE_PER_LETTER: i64 = 10;

    /// Spawn interval at score 0 and its floor (ms)
    pub const SPAWN_INTERVAL_MS: u32 = 1000;
    pub const MIN_SPAWN_INTERVAL_MS: u32 = 500;

    /// Typed buffer is cleared after this much keyboard inactivity (ms)
    pub const BUFFER_TIMEOUT_MS: f64 = 500.0;

    /// Difficulty is re-derived whenever score lands on a multiple of this
    pub const DIFFICULTY_STEP: i64 = 100;
    /// Score from which fall speed (instead of spawn rate) ramps
    pub const SPEED_RAMP_SCORE: i64 = 1000;
    /// Fractional speed increase per step above `SPEED_RAMP_SCORE`
    pub const SPEED_STEP_FACTOR: f32 = 0.05;

    /// Score per extra unit of word length
    pub const WORD_LENGTH_STEP: i64 = 200;

    /// Phased spawner: placement attempts before accepting an overlap
    pub const PLACEMENT_ATTEMPTS: u32 = 10;

    /// Undrained events kept per session; older ones are discarded
    pub const MAX_PENDING_EVENTS: usize = 256;
}
