//! Per-frame simulation tick
//!
//! Order matters: spawn, then advance/resolve letters, then re-derive difficulty
//! from whatever score the update left behind.

use super::input::expire_buffer;
use super::letter::LetterState;
use super::spawn::{SpawnPolicy, maybe_spawn};
use super::state::{GameEvent, GameState};

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, policy: &dyn SpawnPolicy, now_ms: f64) {
    if state.is_over {
        return;
    }

    state.time_ticks += 1;

    maybe_spawn(state, policy, now_ms);
    update_letters(state, now_ms);

    if state.difficulty.step(state.score, &state.config) {
        log::info!(
            "Difficulty at score {}: speed {:.2}, spawn every {}ms",
            state.score,
            state.difficulty.fall_speed,
            state.difficulty.spawn_interval_ms
        );
        state.events.push(GameEvent::DifficultyChanged {
            score: state.score,
            difficulty: state.difficulty,
        });
    }

    // Keep the visible buffer honest between keystrokes
    expire_buffer(state, now_ms);
}

/// Single pass over the registry: move falling letters, resolve misses,
/// animate resolved letters and prune the expired ones
pub fn update_letters(state: &mut GameState, now_ms: f64) {
    let config = &state.config;
    let speed = state.difficulty.fall_speed;

    for letter in state.letters.iter_mut() {
        if letter.is_falling() {
            let edge = config.miss_edge.lower_edge(letter.pos.y, config.letter_size);
            if edge < config.line_y {
                letter.pos.y += speed;
                continue;
            }

            letter.resolve_miss(now_ms);
            state.score -= config.score_per_letter;
            log::debug!("Missed '{}' score={}", letter.text(), state.score);
            state.events.push(GameEvent::Missed {
                id: letter.id,
                text: letter.text().to_string(),
                penalty: config.score_per_letter,
            });
        }

        letter.animate_resolution(now_ms, config.resolve_window_ms, config.grow_per_tick);
        if letter.state() == LetterState::Expired {
            state.events.push(GameEvent::Expired { id: letter.id });
        }
    }

    state
        .letters
        .retain(|l| l.state() != LetterState::Expired);
}
