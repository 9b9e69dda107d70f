//! Gameplay tuning.
//! Defaults are overridden by config.toml if present; missing keys keep
//! their defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_MOVE_SPEED: f32 = 160.0; // units/sec
const DEFAULT_JUMP_IMPULSE: f32 = 600.0;
const DEFAULT_GRAVITY: f32 = 1400.0; // units/sec^2
const DEFAULT_GROUNDED_EPSILON: f32 = 0.1;

const DEFAULT_METER_START: f32 = 0.7;
const DEFAULT_METER_DECAY: f32 = 0.02; // per second
const DEFAULT_COLLECTIBLE_BONUS: f32 = 0.2;
const DEFAULT_METER_LOW: f32 = 0.3;

const DEFAULT_STOMP_POINTS: u32 = 10;
const DEFAULT_STOMP_HEIGHT_RATIO: f32 = 0.3;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MovementCfg {
    pub speed: f32,
    pub jump_impulse: f32,
    pub gravity: f32,
    // Below this vertical speed the player counts as grounded
    pub grounded_epsilon: f32,
}

impl Default for MovementCfg {
    fn default() -> Self {
        Self {
            speed: DEFAULT_MOVE_SPEED,
            jump_impulse: DEFAULT_JUMP_IMPULSE,
            gravity: DEFAULT_GRAVITY,
            grounded_epsilon: DEFAULT_GROUNDED_EPSILON,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MeterCfg {
    pub start: f32,
    pub decay_per_second: f32,
    pub collectible_bonus: f32,
    // HUD warns at or below this fraction
    pub low_threshold: f32,
}

impl Default for MeterCfg {
    fn default() -> Self {
        Self {
            start: DEFAULT_METER_START,
            decay_per_second: DEFAULT_METER_DECAY,
            collectible_bonus: DEFAULT_COLLECTIBLE_BONUS,
            low_threshold: DEFAULT_METER_LOW,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ScoringCfg {
    pub stomp_points: u32,
    // Fraction of the enemy height the player must be above its center
    pub stomp_height_ratio: f32,
}

impl Default for ScoringCfg {
    fn default() -> Self {
        Self {
            stomp_points: DEFAULT_STOMP_POINTS,
            stomp_height_ratio: DEFAULT_STOMP_HEIGHT_RATIO,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WindowCfg {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowCfg {
    fn default() -> Self {
        Self {
            title: "Stoop Runner".to_string(),
            width: 960.0,
            height: 540.0,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub movement: MovementCfg,
    pub meter: MeterCfg,
    pub scoring: ScoringCfg,
    pub window: WindowCfg,
    /// Optional level file; the built-in level is used when absent.
    pub level: Option<PathBuf>,
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<GameConfig>(s)
    }
}

/// Load the config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::info!("{} not found, using default tuning", path.display());
            return Ok(GameConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    GameConfig::from_toml_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
