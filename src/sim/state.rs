//! Game state and core simulation types
//!
//! Everything one play session mutates lives here.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::input::TypingBuffer;
use super::letter::Letter;
use crate::config::GameConfig;
use crate::consts::MAX_PENDING_EVENTS;

/// Something notable that happened during a tick or keystroke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32, text: String },
    /// Typed by the player; `points` were credited
    Hit { id: u32, text: String, points: i64 },
    /// Crossed the line; `penalty` was deducted
    Missed { id: u32, text: String, penalty: i64 },
    /// Resolution animation finished and the letter was removed
    Expired { id: u32 },
    DifficultyChanged { score: i64, difficulty: Difficulty },
    /// The typed buffer timed out before matching anything
    BufferCleared { discarded: String },
}

/// Events waiting for the host, capped at `MAX_PENDING_EVENTS`.
///
/// Once full, each new event pushes out the oldest one, so a host that never
/// drains only loses history.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: VecDeque<GameEvent>,
    dropped: u64,
}

impl EventLog {
    pub fn push(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn contains(&self, event: &GameEvent) -> bool {
        self.events.contains(event)
    }

    /// Events pushed out before anyone drained them
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub config: GameConfig,
    pub score: i64,
    pub difficulty: Difficulty,
    /// Live letters in spawn order
    pub letters: Vec<Letter>,
    pub typed: TypingBuffer,
    /// Letters spawned so far this session
    pub spawned: u32,
    /// Timestamp (ms) of the last spawn; `None` until the first one
    pub last_spawn_ms: Option<f64>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Terminal flag, set once by the session driver
    pub is_over: bool,
    /// Events since the driver last drained them
    #[serde(skip)]
    pub events: EventLog,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, config: GameConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty: Difficulty::initial(&config),
            config,
            score: 0,
            letters: Vec::new(),
            typed: TypingBuffer::default(),
            spawned: 0,
            last_spawn_ms: None,
            time_ticks: 0,
            is_over: false,
            events: EventLog::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Live letter by id
    pub fn letter(&self, id: u32) -> Option<&Letter> {
        self.letters.iter().find(|l| l.id == id)
    }

    /// Letters still waiting to be typed
    pub fn falling(&self) -> impl Iterator<Item = &Letter> {
        self.letters.iter().filter(|l| l.is_falling())
    }
}
