//! Simulation tuning.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Tunable constants for the simulation.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Projectile travel per epoch, in cells.
    pub projectile_speed: f32,
    /// Maximum distance from the firing point before a projectile vanishes.
    pub projectile_range: f32,
    /// Minimum number of epochs between two shots of the same unit.
    pub fire_cooldown_epochs: u64,
    /// Grid size of the built-in empty level (columns, rows).
    pub default_world_size: (u32, u32),
    /// Cell size in pixels of the built-in empty level.
    pub default_cell_size: (u32, u32),
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            projectile_speed: 0.1,
            projectile_range: 4.0,
            fire_cooldown_epochs: 10,
            default_world_size: (16, 10),
            default_cell_size: (64, 64),
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON. Missing fields keep their default values.
    pub fn from_json_str(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimConfig::from_json_str(r#"{ "projectile_range": 10.0 }"#).unwrap();
        assert_eq!(config.projectile_range, 10.0);
        assert_eq!(config.fire_cooldown_epochs, 10);
        assert_eq!(config.default_world_size, (16, 10));
    }

    #[test]
    fn test_bad_json_is_rejected() {
        assert!(SimConfig::from_json_str(r#"{ "projectile_speed": "fast" }"#).is_err());
    }
}
