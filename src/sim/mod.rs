//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timestamps come from the caller, never from a clock
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod difficulty;
pub mod input;
pub mod letter;
pub mod spawn;
pub mod state;
pub mod tick;

pub use difficulty::{Difficulty, compute_difficulty};
pub use input::{KeyOutcome, TypingBuffer, expire_buffer, on_key};
pub use letter::{Aabb, ColorTag, Letter, LetterState};
pub use spawn::{
    PhasedPolicy, Placement, SimplePolicy, SpawnPolicy, maybe_spawn, place, policy_for, spawn_letter,
};
pub use state::{EventLog, GameEvent, GameState};
pub use tick::{tick, update_letters};
