//! Game tuning and variant presets
//!
//! Persisted as JSON (LocalStorage on web, a file named by `LETTER_RAIN_CONFIG` on native).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Problems found while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("line y {line_y} lies outside the canvas (height {canvas_height})")]
    LineOutsideCanvas { line_y: f32, canvas_height: f32 },
    #[error("minimum spawn interval {floor}ms exceeds base interval {base}ms")]
    IntervalFloorAboveBase { floor: u32, base: u32 },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
}

/// The two shipped flavours of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Plain canvas, simple spawner
    #[default]
    Classic,
    /// Terminal-styled, phased spawner with overlap avoidance
    Retro,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Retro => "Retro",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "plain" => Some(Variant::Classic),
            "retro" | "dos" => Some(Variant::Retro),
            _ => None,
        }
    }
}

/// Which spawn sequencing strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnPolicyKind {
    /// Random words whose length grows with score
    Simple,
    /// A..Z, then 26 random singles, then random words of up to three letters
    Phased,
}

/// Where a falling letter's "lower edge" is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissEdge {
    /// The letter's y coordinate itself
    Top,
    /// Half a letter below its y coordinate
    HalfSize,
}

impl MissEdge {
    /// Y coordinate compared against the line
    #[inline]
    pub fn lower_edge(self, y: f32, letter_size: f32) -> f32 {
        match self {
            MissEdge::Top => y,
            MissEdge::HalfSize => y + letter_size / 2.0,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Preset this config was derived from (drives the renderer palette)
    pub variant: Variant,

    // === Playfield ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub line_y: f32,
    pub letter_size: f32,

    // === Pacing ===
    /// Fall speed at score 0 (pixels per tick)
    pub initial_speed: f32,
    pub spawn_interval_ms: u32,
    pub min_spawn_interval_ms: u32,
    pub score_per_letter: i64,

    // === Input ===
    pub buffer_timeout_ms: f64,

    // === Lifecycle ===
    pub spawn_policy: SpawnPolicyKind,
    pub miss_edge: MissEdge,
    /// How long a resolved letter keeps growing before removal (ms)
    pub resolve_window_ms: f64,
    /// Render size increase per tick while resolved
    pub grow_per_tick: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_variant(Variant::Classic)
    }
}

impl GameConfig {
    /// Create a config from a variant preset
    pub fn from_variant(variant: Variant) -> Self {
        let (spawn_policy, miss_edge, resolve_window_ms) = match variant {
            Variant::Classic => (SpawnPolicyKind::Simple, MissEdge::Top, 200.0),
            Variant::Retro => (SpawnPolicyKind::Phased, MissEdge::HalfSize, 300.0),
        };

        Self {
            variant,

            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            line_y: LINE_Y,
            letter_size: LETTER_SIZE,

            initial_speed: INITIAL_SPEED,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            score_per_letter: SCORE_PER_LETTER,

            buffer_timeout_ms: BUFFER_TIMEOUT_MS,

            spawn_policy,
            miss_edge,
            resolve_window_ms,
            grow_per_tick: 2.0,
        }
    }

    /// Check that the config describes a playable field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, f64); 7] = [
            ("canvas_width", self.canvas_width as f64),
            ("canvas_height", self.canvas_height as f64),
            ("letter_size", self.letter_size as f64),
            ("initial_speed", self.initial_speed as f64),
            ("spawn_interval_ms", self.spawn_interval_ms as f64),
            ("score_per_letter", self.score_per_letter as f64),
            ("buffer_timeout_ms", self.buffer_timeout_ms),
        ];
        if let Some(&(field, value)) = positive.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(ConfigError::NonPositive { field, value });
        }

        if !(self.line_y > 0.0 && self.line_y <= self.canvas_height) {
            return Err(ConfigError::LineOutsideCanvas {
                line_y: self.line_y,
                canvas_height: self.canvas_height,
            });
        }

        if self.min_spawn_interval_ms > self.spawn_interval_ms {
            return Err(ConfigError::IntervalFloorAboveBase {
                floor: self.min_spawn_interval_ms,
                base: self.spawn_interval_ms,
            });
        }

        Ok(())
    }

    /// Parse and validate a JSON config.
    ///
    /// Fields missing from a JSON object come from the preset named by its
    /// `variant` (Classic when absent), so `{"variant": "Retro"}` is the full
    /// Retro preset.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = match serde_json::from_str::<serde_json::Value>(json)? {
            serde_json::Value::Object(overrides) => {
                let variant = match overrides.get("variant") {
                    Some(v) => Variant::deserialize(v)?,
                    None => Variant::default(),
                };
                let mut merged = match serde_json::to_value(Self::from_variant(variant))? {
                    serde_json::Value::Object(preset) => preset,
                    _ => serde_json::Map::new(),
                };
                merged.extend(overrides);
                serde_json::from_value(serde_json::Value::Object(merged))?
            }
            other => serde_json::from_value(other)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// LocalStorage key holding the JSON config
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "letter_rain_config";
    /// Environment variable naming a JSON config file
    #[cfg(not(target_arch = "wasm32"))]
    const CONFIG_ENV: &'static str = "LETTER_RAIN_CONFIG";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded {} config from LocalStorage", config.variant.as_str());
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Read and validate a JSON config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load config from the file named by `LETTER_RAIN_CONFIG`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(Self::CONFIG_ENV) else {
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.to_string_lossy());
                config
            }
            Err(e) => {
                log::warn!("Using default config ({}): {}", path.to_string_lossy(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ_in_policy_and_window() {
        let classic = GameConfig::from_variant(Variant::Classic);
        let retro = GameConfig::from_variant(Variant::Retro);

        assert_eq!(classic.spawn_policy, SpawnPolicyKind::Simple);
        assert_eq!(classic.miss_edge, MissEdge::Top);
        assert_eq!(classic.resolve_window_ms, 200.0);

        assert_eq!(retro.spawn_policy, SpawnPolicyKind::Phased);
        assert_eq!(retro.miss_edge, MissEdge::HalfSize);
        assert_eq!(retro.resolve_window_ms, 300.0);

        assert!(classic.validate().is_ok());
        assert!(retro.validate().is_ok());
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!(Variant::from_str("DOS"), Some(Variant::Retro));
        assert_eq!(Variant::from_str("classic"), Some(Variant::Classic));
        assert_eq!(Variant::from_str("neon"), None);
    }

    #[test]
    fn test_miss_edge() {
        assert_eq!(MissEdge::Top.lower_edge(100.0, 30.0), 100.0);
        assert_eq!(MissEdge::HalfSize.lower_edge(100.0, 30.0), 115.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = GameConfig {
            letter_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "letter_size", .. })
        ));

        let config = GameConfig {
            line_y: 700.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LineOutsideCanvas { .. })
        ));

        let config = GameConfig {
            min_spawn_interval_ms: 2000,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IntervalFloorAboveBase { .. })
        ));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{ "initial_speed": 3.5, "line_y": 500.0 }"#).unwrap();
        assert_eq!(config.initial_speed, 3.5);
        assert_eq!(config.line_y, 500.0);
        assert_eq!(config.letter_size, LETTER_SIZE);
        assert_eq!(config.spawn_policy, SpawnPolicyKind::Simple);

        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_from_json_variant_picks_preset() {
        let retro = GameConfig::from_json(r#"{ "variant": "Retro" }"#).unwrap();
        assert_eq!(retro, GameConfig::from_variant(Variant::Retro));
        assert_eq!(retro.spawn_policy, SpawnPolicyKind::Phased);
        assert_eq!(retro.miss_edge, MissEdge::HalfSize);
        assert_eq!(retro.resolve_window_ms, 300.0);

        // Explicit fields still win over the preset
        let tweaked =
            GameConfig::from_json(r#"{ "variant": "Retro", "resolve_window_ms": 250.0 }"#).unwrap();
        assert_eq!(tweaked.spawn_policy, SpawnPolicyKind::Phased);
        assert_eq!(tweaked.resolve_window_ms, 250.0);

        assert!(matches!(
            GameConfig::from_json(r#"{ "variant": "Neon" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn test_from_file() {
        let path = std::env::temp_dir().join("letter_rain_config_test.json");
        std::fs::write(&path, r#"{ "variant": "Retro", "initial_speed": 4.0 }"#).unwrap();
        let config = GameConfig::from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.spawn_policy, SpawnPolicyKind::Phased);
        assert_eq!(config.initial_speed, 4.0);

        assert!(matches!(
            GameConfig::from_file(std::env::temp_dir().join("letter_rain_missing.json")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_saved_config_round_trips() {
        let mut config = GameConfig::from_variant(Variant::Retro);
        config.initial_speed = 3.0;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }
}
