//! # Configuration Module
//!
//! World configuration loaded once at startup. Every field has a default, so a
//! JSON file only needs to list the values it overrides:
//!
//! ```json
//! { "render_distance": 4, "height_strategy": "perlin", "seed": 42 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    engine_state::voxels::chunk::{TerrainSettings, CHUNK_DIMENSION},
    error::{Result, WorldError},
};

/// Largest accepted `render_distance`. The load window holds `(2r)²` chunks.
pub const MAX_RENDER_DISTANCE: i32 = 64;

/// The height function used to shape terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightStrategy {
    /// `amplitude * sin(f*x) * sin(f*z)`; smooth rolling hills, no randomness.
    #[default]
    Sine,
    /// Gradient noise over a permutation table shuffled from `seed`.
    Perlin,
    /// Multi-octave Perlin noise from the `noise` crate, seeded from `seed`.
    Fbm,
}

/// Tunable parameters of the voxel world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Vertical extent of every chunk, in blocks.
    pub world_height: usize,
    /// Terrain baseline; a column's top is `sea_level + height(x, z)`.
    pub sea_level: i32,
    /// Chunks loaded on each side of the observer's chunk.
    pub render_distance: i32,
    /// Seed for the randomized height strategies.
    pub seed: u64,
    pub height_strategy: HeightStrategy,
    pub height_amplitude: f64,
    pub height_frequency: f64,
    /// How far below the lowest surrounding surface a block still counts as shell.
    pub shell_depth: i32,
    /// Upper bound on chunk constructions running at the same time.
    pub max_concurrent_loads: usize,
    pub light_direction: [f32; 3],
    /// Distance kept between the ground and the camera when snapping.
    pub eye_height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_height: 164,
            sea_level: 64,
            render_distance: 8,
            seed: 0,
            height_strategy: HeightStrategy::Sine,
            height_amplitude: 5.0,
            height_frequency: 0.1,
            shell_depth: 2,
            max_concurrent_loads: 64,
            light_direction: [0.5, 1.0, 0.3],
            eye_height: 1.7,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::info!("Loaded world configuration from {}", path.display());
        Ok(config)
    }

    /// Rejects configurations the engine cannot stream.
    pub fn validate(&self) -> Result<()> {
        if self.world_height == 0 || self.world_height > u16::MAX as usize {
            return Err(WorldError::InvalidConfig(format!(
                "world_height must be in 1..={}, got {}",
                u16::MAX,
                self.world_height
            )));
        }
        if self.sea_level < 0 || self.sea_level as usize > self.world_height {
            return Err(WorldError::InvalidConfig(format!(
                "sea_level must be in 0..={}, got {}",
                self.world_height, self.sea_level
            )));
        }
        if !(1..=MAX_RENDER_DISTANCE).contains(&self.render_distance) {
            return Err(WorldError::InvalidConfig(format!(
                "render_distance must be in 1..={}, got {}",
                MAX_RENDER_DISTANCE, self.render_distance
            )));
        }
        if self.shell_depth < 0 {
            return Err(WorldError::InvalidConfig(format!(
                "shell_depth must not be negative, got {}",
                self.shell_depth
            )));
        }
        if self.max_concurrent_loads == 0 {
            return Err(WorldError::InvalidConfig(
                "max_concurrent_loads must be at least 1".to_string(),
            ));
        }
        if !self.height_amplitude.is_finite() || !self.height_frequency.is_finite() {
            return Err(WorldError::InvalidConfig(
                "height_amplitude and height_frequency must be finite".to_string(),
            ));
        }
        if !self.eye_height.is_finite() || self.eye_height < 0.0 {
            return Err(WorldError::InvalidConfig(format!(
                "eye_height must be a non-negative number, got {}",
                self.eye_height
            )));
        }
        Ok(())
    }

    /// The subset of the configuration a chunk needs while generating.
    pub fn terrain_settings(&self) -> TerrainSettings {
        TerrainSettings {
            world_height: self.world_height,
            sea_level: self.sea_level,
            shell_depth: self.shell_depth,
            footprint: CHUNK_DIMENSION as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            WorldConfig::from_json_str(r#"{ "render_distance": 3, "height_strategy": "perlin" }"#)
                .unwrap();
        assert_eq!(config.render_distance, 3);
        assert_eq!(config.height_strategy, HeightStrategy::Perlin);
        assert_eq!(config.world_height, 164);
        assert_eq!(config.sea_level, 64);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "render_distance": 0 }"#),
            Err(WorldError::InvalidConfig(_))
        ));
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "render_distance": 100000 }"#),
            Err(WorldError::InvalidConfig(_))
        ));
        let farthest = WorldConfig {
            render_distance: MAX_RENDER_DISTANCE,
            ..WorldConfig::default()
        };
        assert!(farthest.validate().is_ok());
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "world_height": 32, "sea_level": 64 }"#),
            Err(WorldError::InvalidConfig(_))
        ));
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "max_concurrent_loads": 0 }"#),
            Err(WorldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            WorldConfig::from_json_str("{ render_distance: "),
            Err(WorldError::Json(_))
        ));
    }
}
