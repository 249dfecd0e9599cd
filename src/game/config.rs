//! Scene Configuration
//!
//! Tunables for the maze, the enemies and the game loop. Every field has a
//! default matching the 160x160 scene, so a config file only needs to name
//! what it changes.

use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::vec3::Vec3;
use crate::game::enemy::{default_spawns, EnemySpawn};
use crate::game::layout::{LayoutError, MazeLayout};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for a scene.
    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Maze layout failed validation.
    #[error("invalid maze layout: {0}")]
    Layout(#[from] LayoutError),

    /// A config value is out of range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Rectangle on the horizontal plane enemies must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    /// Minimum X
    pub min_x: f32,
    /// Maximum X
    pub max_x: f32,
    /// Minimum Z
    pub min_z: f32,
    /// Maximum Z
    pub max_z: f32,
}

impl SceneBounds {
    /// Bounds for a `width` x `depth` scene, inset by `margin` on every side.
    pub fn inset(width: f32, depth: f32, margin: f32) -> Self {
        Self {
            min_x: margin,
            max_x: width - margin,
            min_z: margin,
            max_z: depth - margin,
        }
    }

    /// Inclusive containment test on x/z.
    #[inline]
    pub fn contains(&self, position: Vec3) -> bool {
        position.x >= self.min_x
            && position.x <= self.max_x
            && position.z >= self.min_z
            && position.z <= self.max_z
    }

    /// Center of the rectangle at height `y`.
    pub fn center(&self, y: f32) -> Vec3 {
        Vec3::new(
            (self.min_x + self.max_x) / 2.0,
            y,
            (self.min_z + self.max_z) / 2.0,
        )
    }
}

impl Default for SceneBounds {
    fn default() -> Self {
        Self::inset(160.0, 160.0, 2.5)
    }
}

/// Scene tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Edge length of one grid cell (world units)
    pub cell_size: f32,
    /// Height of wall blocks
    pub wall_height: f32,
    /// Height teleport pads are placed at
    pub teleport_height: f32,
    /// Player-vs-enemy and player-vs-teleport trigger distance
    pub collision_radius: f32,
    /// Destinations closer than this to the triggering pad are skipped
    pub teleport_min_separation: f32,
    /// Half-size of the box enemies occupy against walls
    pub enemy_radius: f32,
    /// Speed for spawns that do not name one (units/second)
    pub default_enemy_speed: f32,
    /// Rectangle enemies are confined to
    pub bounds: SceneBounds,
    /// Seconds before the player can teleport again
    pub teleport_cooldown: f32,
    /// Seconds before the player can be respawned again
    pub respawn_cooldown: f32,
    /// Per-tick probability of a random heading change
    pub random_turn_chance: f32,
    /// Maximum draws when picking a heading after a blocked move
    pub redirect_attempts: u32,
    /// Draws whose dot product with the blocked heading exceeds this are retried
    pub redirect_dot_threshold: f32,
    /// Camera target hint sent with start and respawn relocations
    pub camera_target: Vec3,
    /// Longest frame delta accepted from the frame clock (seconds)
    pub max_frame_delta: f32,
    /// RNG seed for the scene
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            cell_size: 5.0,
            wall_height: 3.0,
            teleport_height: 0.5,
            collision_radius: 2.5,
            teleport_min_separation: 0.5,
            enemy_radius: 0.8,
            default_enemy_speed: 2.0,
            bounds: SceneBounds::default(),
            teleport_cooldown: 3.0,
            respawn_cooldown: 2.0,
            random_turn_chance: 0.01,
            redirect_attempts: 10,
            redirect_dot_threshold: 0.5,
            camera_target: Vec3::new(80.0, 2.0, 80.0),
            max_frame_delta: 0.25,
            seed: 42,
        }
    }
}

impl SceneConfig {
    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("cell_size", self.cell_size)?;
        positive("wall_height", self.wall_height)?;
        positive("collision_radius", self.collision_radius)?;
        positive("enemy_radius", self.enemy_radius)?;
        positive("max_frame_delta", self.max_frame_delta)?;
        non_negative("teleport_min_separation", self.teleport_min_separation)?;
        non_negative("default_enemy_speed", self.default_enemy_speed)?;
        non_negative("teleport_cooldown", self.teleport_cooldown)?;
        non_negative("respawn_cooldown", self.respawn_cooldown)?;

        if !(0.0..=1.0).contains(&self.random_turn_chance) {
            return Err(invalid("random_turn_chance", "must be between 0 and 1"));
        }
        if !(-1.0..=1.0).contains(&self.redirect_dot_threshold) {
            return Err(invalid("redirect_dot_threshold", "must be between -1 and 1"));
        }
        if self.redirect_attempts == 0 {
            return Err(invalid("redirect_attempts", "must be at least 1"));
        }

        let b = &self.bounds;
        let finite = [b.min_x, b.max_x, b.min_z, b.max_z].iter().all(|v| v.is_finite());
        if !finite || b.min_x > b.max_x || b.min_z > b.max_z {
            return Err(invalid("bounds", "must be finite with min <= max"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a positive number"))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a non-negative number"))
    }
}

/// Everything needed to set up a scene, loadable from one JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneFile {
    /// Tunables
    #[serde(default)]
    pub config: SceneConfig,
    /// Maze layout
    #[serde(default = "MazeLayout::builtin")]
    pub layout: MazeLayout,
    /// Initial enemy placements
    #[serde(default = "default_spawns")]
    pub spawns: Vec<EnemySpawn>,
}

impl Default for SceneFile {
    fn default() -> Self {
        Self {
            config: SceneConfig::default(),
            layout: MazeLayout::builtin(),
            spawns: default_spawns(),
        }
    }
}

impl SceneFile {
    /// Parse and validate a scene from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let scene: SceneFile = serde_json::from_str(json)?;
        scene.config.validate()?;
        Ok(scene)
    }

    /// Read, parse and validate a scene file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Replace the layout with one read from a text layout file.
    pub fn with_layout_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        self.layout = MazeLayout::parse_text(&text)?;
        Ok(self)
    }
}
