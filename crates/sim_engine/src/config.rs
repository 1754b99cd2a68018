//! Simulation configuration
//!
//! All tunables live in one serializable structure so a sandbox can be
//! reconfigured from a TOML file without recompiling. Every knob has a
//! default, and `validate` rejects combinations the runtime cannot honor.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::scene::Aabb;
use crate::spatial::OctreeConfig;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Rejected by validation
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Spatial index tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialConfig {
    /// Half-extent of the cubic world volume, centered on the origin
    pub world_half_extent: f32,
    /// Leaf occupant count above which a cell subdivides
    pub max_occupancy: usize,
    /// Maximum subdivision depth (root is depth 0)
    pub max_depth: u32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            world_half_extent: 50.0,
            max_occupancy: 3,
            max_depth: 4,
        }
    }
}

/// Physics stepping tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Fixed timestep in seconds
    pub timestep: f32,
    /// Gravitational acceleration, applied to every dynamic body
    pub gravity: [f32; 3],
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            gravity: [0.0, -9.81, 0.0],
        }
    }
}

/// Top-level simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    /// Spatial index settings
    #[serde(default)]
    pub spatial: SpatialConfig,
    /// Physics stepping settings
    #[serde(default)]
    pub physics: PhysicsConfig,
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check the configuration for values the runtime cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.spatial.world_half_extent > 0.0) {
            return Err(ConfigError::Validation(
                "world_half_extent must be positive".to_string(),
            ));
        }
        if self.spatial.max_occupancy == 0 {
            return Err(ConfigError::Validation(
                "max_occupancy must be at least 1".to_string(),
            ));
        }
        if !(self.physics.timestep > 0.0) {
            return Err(ConfigError::Validation(
                "timestep must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The world volume as an axis-aligned box
    pub fn world_bounds(&self) -> Aabb {
        let h = self.spatial.world_half_extent;
        Aabb::new(Vec3::new(-h, -h, -h), Vec3::new(h, h, h))
    }

    /// Octree settings derived from the spatial section
    pub fn octree_config(&self) -> OctreeConfig {
        OctreeConfig {
            max_occupancy: self.spatial.max_occupancy,
            max_depth: self.spatial.max_depth,
        }
    }

    /// Gravity as a vector
    pub fn gravity(&self) -> Vec3 {
        Vec3::new(
            self.physics.gravity[0],
            self.physics.gravity[1],
            self.physics.gravity[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_occupancy_is_rejected() {
        let mut config = SimConfig::default();
        config.spatial.max_occupancy = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn toml_round_trip_preserves_settings() {
        let mut config = SimConfig::default();
        config.spatial.max_depth = 6;
        config.physics.gravity = [0.0, -3.7, 0.0];

        let text = toml::to_string_pretty(&config).unwrap();
        let back: SimConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.spatial.max_depth, 6);
        assert_eq!(back.physics.gravity[1], -3.7);
    }

    #[test]
    fn save_then_load_round_trips_through_a_file() {
        let path = std::env::temp_dir().join("sim_engine_config_round_trip.toml");
        let path = path.to_str().unwrap();

        let mut config = SimConfig::default();
        config.spatial.world_half_extent = 30.0;
        config.physics.timestep = 1.0 / 120.0;
        config.save_to_file(path).unwrap();

        let back = SimConfig::load_from_file(path).unwrap();
        std::fs::remove_file(path).unwrap();
        assert_eq!(back.spatial.world_half_extent, 30.0);
        assert_eq!(back.physics.timestep, 1.0 / 120.0);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let text = "[spatial]\nworld_half_extent = 25.0\nmax_occupancy = 2\nmax_depth = 3\n";
        let config: SimConfig = toml::from_str(text).unwrap();
        assert_eq!(config.spatial.max_occupancy, 2);
        assert_eq!(config.world_bounds().max.x, 25.0);
        assert_eq!(config.physics.gravity[1], -9.81);
    }
}
