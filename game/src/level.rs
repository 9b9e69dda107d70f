//! Level layout: where the platforms, pickups, roaches and the goal sit.
//!
//! A layout is built once per scene load and never changes during play.
//! Positions are box centers in world units, y up.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use stoop_engine::Patrol;
use thiserror::Error;

/// What a body is, as far as gameplay cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityTag {
    Player,
    Ground,
    Enemy,
    Collectible,
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolDef {
    pub distance: f32,
    pub leg_seconds: f32,
}

impl From<PatrolDef> for Patrol {
    fn from(def: PatrolDef) -> Self {
        Patrol {
            distance: def.distance,
            leg_seconds: def.leg_seconds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub tag: EntityTag,
    pub position: Vec2,
    pub size: Vec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patrol: Option<PatrolDef>,
}

impl Placement {
    pub fn new(tag: EntityTag, position: Vec2, size: Vec2) -> Self {
        Self {
            tag,
            position,
            size,
            patrol: None,
        }
    }

    pub fn with_patrol(mut self, distance: f32, leg_seconds: f32) -> Self {
        self.patrol = Some(PatrolDef {
            distance,
            leg_seconds,
        });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpawn {
    pub position: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid level: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("placement {index} has a non-positive size")]
    EmptySize { index: usize },
    #[error("placement {index} is tagged player; use the [player] table instead")]
    PlayerPlacement { index: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    name: String,
    player: PlayerSpawn,
    #[serde(default)]
    placements: Vec<Placement>,
}

impl LevelLayout {
    pub fn new(
        name: impl Into<String>,
        player: PlayerSpawn,
        placements: Vec<Placement>,
    ) -> Result<Self, LevelError> {
        let layout = Self {
            name: name.into(),
            player,
            placements,
        };
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, LevelError> {
        let layout = toml::from_str::<LevelLayout>(s)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn to_toml_string_pretty(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    fn validate(&self) -> Result<(), LevelError> {
        for (index, placement) in self.placements.iter().enumerate() {
            if placement.tag == EntityTag::Player {
                return Err(LevelError::PlayerPlacement { index });
            }
            if placement.size.x <= 0.0 || placement.size.y <= 0.0 {
                return Err(LevelError::EmptySize { index });
            }
        }
        if !self.placements.iter().any(|p| p.tag == EntityTag::Goal) {
            log::warn!("level '{}' has no goal", self.name);
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn player(&self) -> PlayerSpawn {
        self.player
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn count(&self, tag: EntityTag) -> usize {
        self.placements.iter().filter(|p| p.tag == tag).count()
    }

    /// The street the game ships with.
    pub fn stoop_block() -> Self {
        const STOOP: Vec2 = Vec2::new(160.0, 110.0);
        const COLLECTIBLE: Vec2 = Vec2::new(24.0, 42.0);
        const ROACH: Vec2 = Vec2::new(48.0, 28.0);

        let mut placements = vec![Placement::new(
            EntityTag::Ground,
            Vec2::new(1300.0, 80.0),
            Vec2::new(2600.0, 60.0),
        )];

        let stoops = [
            (360.0, 140.0),
            (640.0, 190.0),
            (980.0, 170.0),
            (1280.0, 220.0),
            (1680.0, 160.0),
        ];
        for (x, y) in stoops {
            placements.push(Placement::new(EntityTag::Ground, Vec2::new(x, y), STOOP));
        }

        let items = [
            (420.0, 240.0),
            (700.0, 280.0),
            (900.0, 220.0),
            (1160.0, 300.0),
            (1500.0, 240.0),
            (1820.0, 260.0),
        ];
        for (x, y) in items {
            let item = Placement::new(EntityTag::Collectible, Vec2::new(x, y), COLLECTIBLE);
            placements.push(item);
        }

        // Each roach paces 60 units right and back, 1.2s per leg
        for x in [520.0, 860.0, 1220.0, 1540.0, 1900.0] {
            let roach = Placement::new(EntityTag::Enemy, Vec2::new(x, 120.0), ROACH);
            placements.push(roach.with_patrol(60.0, 1.2));
        }

        placements.push(Placement::new(
            EntityTag::Goal,
            Vec2::new(2300.0, 150.0),
            Vec2::new(40.0, 100.0),
        ));

        Self {
            name: "Stoop Block".to_string(),
            player: PlayerSpawn {
                position: Vec2::new(120.0, 200.0),
                size: Vec2::new(48.0, 72.0),
            },
            placements,
        }
    }
}

/// Load a level file, or the built-in level when `path` is `None`.
pub fn load_level(path: Option<&Path>) -> Result<LevelLayout, LevelError> {
    let Some(path) = path else {
        return Ok(LevelLayout::stoop_block());
    };
    let content = fs::read_to_string(path).map_err(|source| LevelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let layout = LevelLayout::from_toml_str(&content)?;
    log::info!(
        "Loaded level '{}' from {} ({} placements)",
        layout.name(),
        path.display(),
        layout.placements().len()
    );
    Ok(layout)
}
