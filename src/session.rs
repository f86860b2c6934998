//! Game loop driver and session lifecycle
//!
//! A [`Session`] owns the [`GameState`] and the spawn policy. The host calls
//! [`Session::frame`] once per display refresh and [`Session::key`] for each
//! keystroke; both run on the same thread, so no locking is involved.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::platform::{Display, LifecycleUi, Renderer};
use crate::sim::{GameEvent, GameState, KeyOutcome, SpawnPolicy, on_key, policy_for, tick};

/// Where a session is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for a start request
    NotStarted,
    Running,
    /// Score went negative; waiting for a restart request
    GameOver,
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stop,
}

pub struct Session {
    phase: SessionPhase,
    state: GameState,
    policy: Box<dyn SpawnPolicy>,
}

impl Session {
    /// Session using the spawn policy named by `config`
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let policy = policy_for(config.spawn_policy);
        Self::with_policy(config, seed, policy)
    }

    /// Session with a caller-supplied spawn policy
    pub fn with_policy(config: GameConfig, seed: u64, policy: Box<dyn SpawnPolicy>) -> Self {
        log::info!(
            "New {} session (seed {}, {} spawner)",
            config.variant.as_str(),
            seed,
            policy.name()
        );
        Self {
            phase: SessionPhase::NotStarted,
            state: GameState::new(seed, config),
            policy,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted setups (placing letters, forcing a score)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn score(&self) -> i64 {
        self.state.score
    }

    pub fn config(&self) -> &GameConfig {
        &self.state.config
    }

    /// `NotStarted -> Running`. Returns false if the session was not waiting to start.
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::NotStarted {
            return false;
        }
        log::info!("Session started");
        self.phase = SessionPhase::Running;
        true
    }

    /// `GameOver -> Running` with a fresh state. Returns false unless the game was over.
    pub fn restart(&mut self, seed: u64) -> bool {
        if self.phase != SessionPhase::GameOver {
            return false;
        }
        let config = self.state.config.clone();
        self.state = GameState::new(seed, config);
        self.phase = SessionPhase::Running;
        log::info!("Session restarted with seed {}", seed);
        true
    }

    /// Feed a keystroke. Ignored (returns `None`) unless the session is running.
    pub fn key(&mut self, key: char, now_ms: f64) -> Option<KeyOutcome> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        Some(on_key(&mut self.state, key, now_ms))
    }

    /// Run one frame: tick, render, publish score, then check for game over
    pub fn frame(
        &mut self,
        now_ms: f64,
        renderer: &mut dyn Renderer,
        display: &mut dyn Display,
        ui: &mut dyn LifecycleUi,
    ) -> FrameStatus {
        if self.phase != SessionPhase::Running || self.state.is_over {
            return FrameStatus::Stop;
        }

        tick(&mut self.state, self.policy.as_ref(), now_ms);

        self.render(renderer);
        display.set_score_text(self.state.score);
        display.set_buffer_text(self.state.typed.as_str());

        if self.state.score < 0 {
            self.state.is_over = true;
            self.phase = SessionPhase::GameOver;
            log::info!(
                "Game over after {} ticks, {} letters spawned",
                self.state.time_ticks,
                self.state.spawned
            );
            ui.on_game_over(self.state.score);
            return FrameStatus::Stop;
        }

        FrameStatus::Continue
    }

    /// Draw the line and every live letter in registry order
    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.clear();
        renderer.draw_line(self.state.config.line_y);
        for letter in &self.state.letters {
            renderer.draw_letter(
                letter.text(),
                letter.pos.x,
                letter.pos.y,
                letter.render_size,
                letter.color(),
            );
        }
    }

    /// Take the events recorded since the last call (only the newest
    /// `MAX_PENDING_EVENTS` are kept between calls)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.events.drain()
    }
}
