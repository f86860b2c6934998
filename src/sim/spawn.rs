//! Letter spawning: what word comes next and where it appears
//!
//! Sequencing is a pluggable [`SpawnPolicy`]; placement is shared and only
//! differs in how many candidates a policy is willing to try.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::letter::{Letter, word_bounds};
use super::state::{GameEvent, GameState};
use crate::config::{GameConfig, SpawnPolicyKind};
use crate::consts::*;

/// Spawn sequencing strategy
pub trait SpawnPolicy {
    fn name(&self) -> &'static str;

    /// Word for the `spawned`-th letter of the session (0-based)
    fn next_word(&self, spawned: u32, score: i64, rng: &mut Pcg32) -> String;

    /// Initial y of a new letter
    fn start_y(&self, letter_size: f32) -> f32;

    /// Placement candidates tried before an overlap is accepted (1 = no avoidance)
    fn placement_attempts(&self) -> u32;
}

/// Random words; longer words become possible every 200 points
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplePolicy;

impl SpawnPolicy for SimplePolicy {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn next_word(&self, _spawned: u32, score: i64, rng: &mut Pcg32) -> String {
        let max_len = score / WORD_LENGTH_STEP;
        let n = if max_len > 0 && rng.random_bool(0.4) {
            rng.random_range(1..=max_len.min(MAX_WORD_LEN as i64)) as usize
        } else {
            1
        };
        random_word(n, rng)
    }

    fn start_y(&self, _letter_size: f32) -> f32 {
        0.0
    }

    fn placement_attempts(&self) -> u32 {
        1
    }
}

/// Alphabet warm-up, then random singles, then random words
#[derive(Debug, Clone, Copy, Default)]
pub struct PhasedPolicy;

impl PhasedPolicy {
    /// Spawns spent on A..Z in order
    pub const ALPHABET_SPAWNS: u32 = 26;
    /// Spawns spent on single random letters after the alphabet
    pub const SINGLES_SPAWNS: u32 = 26;
}

impl SpawnPolicy for PhasedPolicy {
    fn name(&self) -> &'static str {
        "phased"
    }

    fn next_word(&self, spawned: u32, score: i64, rng: &mut Pcg32) -> String {
        if spawned < Self::ALPHABET_SPAWNS {
            return char::from(b'A' + spawned as u8).to_string();
        }
        if spawned < Self::ALPHABET_SPAWNS + Self::SINGLES_SPAWNS {
            return random_word(1, rng);
        }

        let max_len = (score / WORD_LENGTH_STEP + 1).clamp(1, MAX_WORD_LEN as i64);
        let n = rng.random_range(1..=max_len) as usize;
        random_word(n, rng)
    }

    fn start_y(&self, letter_size: f32) -> f32 {
        -letter_size
    }

    fn placement_attempts(&self) -> u32 {
        PLACEMENT_ATTEMPTS
    }
}

/// Build the policy a config asks for
pub fn policy_for(kind: SpawnPolicyKind) -> Box<dyn SpawnPolicy> {
    match kind {
        SpawnPolicyKind::Simple => Box::new(SimplePolicy),
        SpawnPolicyKind::Phased => Box::new(PhasedPolicy),
    }
}

fn random_word(n: usize, rng: &mut Pcg32) -> String {
    (0..n)
        .map(|_| char::from(b'A' + rng.random_range(0..26u8)))
        .collect()
}

/// Result of a placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    /// Candidates generated (1..=max attempts)
    pub attempts: u32,
    /// True if the accepted candidate still overlaps a live letter
    pub overlapping: bool,
}

/// Pick a spot for an `n`-character word.
///
/// x is uniform over the positions that keep the word on the canvas (clamped
/// to 0 when the canvas is narrower than the word). Candidates overlapping a
/// live letter are rejected until `max_attempts` is reached; the last one is
/// then accepted regardless.
pub fn place(
    n: usize,
    start_y: f32,
    max_attempts: u32,
    letters: &[Letter],
    config: &GameConfig,
    rng: &mut Pcg32,
) -> Placement {
    let max_x = (config.canvas_width - n as f32 * config.letter_size).max(0.0);
    let max_attempts = max_attempts.max(1);

    let mut placement = Placement {
        pos: Vec2::new(0.0, start_y),
        attempts: 0,
        overlapping: false,
    };
    while placement.attempts < max_attempts {
        placement.attempts += 1;
        let x = if max_x > 0.0 {
            rng.random_range(0.0..=max_x)
        } else {
            0.0
        };
        placement.pos = Vec2::new(x, start_y);

        let candidate = word_bounds(placement.pos, n, config.letter_size);
        placement.overlapping = letters
            .iter()
            .any(|l| l.bounds(config.letter_size).intersects(&candidate));
        if !placement.overlapping {
            break;
        }
    }
    placement
}

/// Spawn a letter if the spawn interval has elapsed. Returns the new letter's id.
///
/// The first call of a session always spawns.
pub fn maybe_spawn(state: &mut GameState, policy: &dyn SpawnPolicy, now_ms: f64) -> Option<u32> {
    let due = match state.last_spawn_ms {
        Some(last) => now_ms - last > state.difficulty.spawn_interval_ms as f64,
        None => true,
    };
    if !due {
        return None;
    }
    state.last_spawn_ms = Some(now_ms);
    Some(spawn_letter(state, policy))
}

/// Spawn one letter unconditionally
pub fn spawn_letter(state: &mut GameState, policy: &dyn SpawnPolicy) -> u32 {
    let word = policy.next_word(state.spawned, state.score, &mut state.rng);
    let placement = place(
        word.len(),
        policy.start_y(state.config.letter_size),
        policy.placement_attempts(),
        &state.letters,
        &state.config,
        &mut state.rng,
    );
    if placement.overlapping && policy.placement_attempts() > 1 {
        log::debug!(
            "No free spot for '{}' after {} attempts, accepting overlap",
            word,
            placement.attempts
        );
    }

    let id = state.next_entity_id();
    log::debug!(
        "Spawn #{} '{}' at x={:.1} ({} policy)",
        state.spawned,
        word,
        placement.pos.x,
        policy.name()
    );
    state.events.push(GameEvent::Spawned {
        id,
        text: word.clone(),
    });
    state
        .letters
        .push(Letter::new(id, word, placement.pos, state.config.letter_size));
    state.spawned += 1;
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use rand::SeedableRng;

    #[test]
    fn test_simple_policy_single_letters_below_200() {
        let mut rng = Pcg32::seed_from_u64(7);
        for spawned in 0..200 {
            let word = SimplePolicy.next_word(spawned, 190, &mut rng);
            assert_eq!(word.len(), 1);
            assert!(word.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_simple_policy_word_length_bounds() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut saw_long = false;
        for _ in 0..500 {
            let word = SimplePolicy.next_word(0, 450, &mut rng);
            // 450 / 200 = 2
            assert!((1..=2).contains(&word.len()));
            saw_long |= word.len() == 2;
        }
        assert!(saw_long);

        for _ in 0..500 {
            let word = SimplePolicy.next_word(0, 100_000, &mut rng);
            assert!((1..=MAX_WORD_LEN).contains(&word.len()));
        }
    }

    #[test]
    fn test_simple_policy_single_letter_share() {
        let mut rng = Pcg32::seed_from_u64(17);
        const DRAWS: usize = 20_000;

        // P(one letter) = 0.6 + 0.4 / N
        for (score, expected) in [(400, 0.6 + 0.4 / 2.0), (600, 0.6 + 0.4 / 3.0)] {
            let singles = (0..DRAWS)
                .filter(|_| SimplePolicy.next_word(0, score, &mut rng).len() == 1)
                .count();
            let share = singles as f64 / DRAWS as f64;
            assert!(
                (share - expected).abs() < 0.02,
                "score {}: share {} expected {}",
                score,
                share,
                expected
            );
        }
    }

    #[test]
    fn test_phased_policy_sequence() {
        let mut rng = Pcg32::seed_from_u64(3);
        let alphabet: String = (0..26)
            .map(|i| PhasedPolicy.next_word(i, 0, &mut rng))
            .collect();
        assert_eq!(alphabet, "ABCDEFGHIJKLMNOPQRSTUVWXYZ");

        for i in 26..52 {
            assert_eq!(PhasedPolicy.next_word(i, 5000, &mut rng).len(), 1);
        }

        // Phase 3 at score 0: min(3, 0 + 1) = 1
        for i in 52..100 {
            assert_eq!(PhasedPolicy.next_word(i, 0, &mut rng).len(), 1);
        }
        // Phase 3 at high score: up to 3 letters
        let mut lens = [false; 4];
        for i in 52..400 {
            let w = PhasedPolicy.next_word(i, 900, &mut rng);
            assert!((1..=3).contains(&w.len()));
            lens[w.len()] = true;
        }
        assert!(lens[1] && lens[2] && lens[3]);
    }

    #[test]
    fn test_start_y() {
        assert_eq!(SimplePolicy.start_y(30.0), 0.0);
        assert_eq!(PhasedPolicy.start_y(30.0), -30.0);
    }

    #[test]
    fn test_place_keeps_word_on_canvas() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(5);
        for n in 1..=3 {
            for _ in 0..200 {
                let p = place(n, 0.0, 1, &[], &config, &mut rng);
                assert!(p.pos.x >= 0.0);
                assert!(p.pos.x + n as f32 * config.letter_size <= config.canvas_width);
                assert_eq!(p.attempts, 1);
            }
        }
    }

    #[test]
    fn test_place_narrow_canvas_clamps_to_zero() {
        let config = GameConfig {
            canvas_width: 40.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        let p = place(3, 0.0, 1, &[], &config, &mut rng);
        assert_eq!(p.pos.x, 0.0);
    }

    #[test]
    fn test_place_exact_width_gives_up_after_budget() {
        let config = GameConfig {
            canvas_width: 60.0,
            ..GameConfig::from_variant(Variant::Retro)
        };
        let blocker = Letter::new(1, "XY", Vec2::new(0.0, -30.0), config.letter_size);
        let mut rng = Pcg32::seed_from_u64(9);

        let p = place(2, -30.0, PLACEMENT_ATTEMPTS, &[blocker], &config, &mut rng);
        assert_eq!(p.pos, Vec2::new(0.0, -30.0));
        assert_eq!(p.attempts, PLACEMENT_ATTEMPTS);
        assert!(p.overlapping);
    }

    #[test]
    fn test_place_avoids_overlap_when_possible() {
        let config = GameConfig::from_variant(Variant::Retro);
        let mut rng = Pcg32::seed_from_u64(21);
        // Block the left half of the spawn row
        let letters: Vec<Letter> = (0..4)
            .map(|i| Letter::new(i, "XXX", Vec2::new(i as f32 * 90.0, -30.0), 30.0))
            .collect();

        for _ in 0..50 {
            let p = place(1, -30.0, PLACEMENT_ATTEMPTS, &letters, &config, &mut rng);
            if !p.overlapping {
                assert!(p.pos.x >= 360.0);
            }
        }
    }

    #[test]
    fn test_phased_spawn_on_full_row_accepts_overlap() {
        // One cell wide: every candidate lands on the blocker
        let config = GameConfig {
            canvas_width: 30.0,
            ..GameConfig::from_variant(Variant::Retro)
        };
        let mut state = GameState::new(4, config);
        let blocker = state.next_entity_id();
        state
            .letters
            .push(Letter::new(blocker, "Z", Vec2::new(0.0, -30.0), 30.0));

        let id = maybe_spawn(&mut state, &PhasedPolicy, 0.0).expect("first spawn is due");

        assert_eq!(state.letters.len(), 2);
        let letter = state.letter(id).expect("pushed");
        assert_eq!(letter.text(), "A");
        assert_eq!(letter.pos, Vec2::new(0.0, -30.0));
        assert!(letter.is_falling());
        assert!(state.events.contains(&GameEvent::Spawned {
            id,
            text: "A".into()
        }));
    }

    #[test]
    fn test_phased_spawn_finds_gap_in_crowded_row() {
        let mut state = GameState::new(8, GameConfig::from_variant(Variant::Retro));
        // Fill x in [0, 720) and leave the last 80px free
        for i in 0..8 {
            let id = state.next_entity_id();
            state
                .letters
                .push(Letter::new(id, "XXX", Vec2::new(i as f32 * 90.0, -30.0), 30.0));
        }

        let mut free = 0;
        for _ in 0..20 {
            let id = spawn_letter(&mut state, &PhasedPolicy);
            let x = state.letter(id).expect("pushed").pos.x;
            if x >= 720.0 {
                free += 1;
            }
            state.letters.retain(|l| l.id != id);
        }
        assert_eq!(state.spawned, 20);
        // Only x in [720, 770] is free; each spawn gets ten tries at it
        assert!(free > 0);
    }

    #[test]
    fn test_maybe_spawn_respects_interval() {
        let mut state = GameState::new(1, GameConfig::default());
        let policy = SimplePolicy;

        assert!(maybe_spawn(&mut state, &policy, 0.0).is_some());
        assert!(maybe_spawn(&mut state, &policy, 500.0).is_none());
        // Strictly greater than the interval is required
        assert!(maybe_spawn(&mut state, &policy, 1000.0).is_none());
        assert!(maybe_spawn(&mut state, &policy, 1000.5).is_some());

        assert_eq!(state.letters.len(), 2);
        assert_eq!(state.spawned, 2);
        assert!(state.letters.iter().all(|l| l.pos.y == 0.0));
    }
}
