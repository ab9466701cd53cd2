//! Configuration management for environment parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every tuning value of the foraging loop (forces,
//! turn rates, reward shaping, spawn ranges) is read from here.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impl)
//! 2. `config.toml` file (overrides defaults)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [agent]
//! move_force = 2.0
//! training_mode = true
//! max_steps = 5000
//!
//! [reward]
//! nectar_per_feed = 0.01
//! feed_bonus = 0.1
//! facing_bonus = 0.02
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Agent body and control parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// Force applied per unit of movement action.
    pub move_force: f32,
    /// Pitch rate in degrees per second at full command.
    pub pitch_speed: f32,
    /// Yaw rate in degrees per second at full command.
    pub yaw_speed: f32,
    /// Pitch is clamped to `[-max_pitch_angle, max_pitch_angle]` degrees.
    pub max_pitch_angle: f32,
    /// Maximum change of the smoothed turn command per second.
    pub turn_smoothing_rate: f32,
    /// Beak tip position in the body's local frame.
    pub beak_tip_offset: Vec3,
    /// Effective radius of the beak tip when touching nectar.
    pub beak_tip_radius: f32,
    pub training_mode: bool,
    /// Episode step limit; ignored (forced to 0) outside training.
    pub max_steps: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            move_force: 2.0,
            pitch_speed: 100.0,
            yaw_speed: 100.0,
            max_pitch_angle: 80.0,
            turn_smoothing_rate: 2.0,
            beak_tip_offset: Vec3::new(0.0, 0.0, 0.12),
            beak_tip_radius: 0.008,
            training_mode: true,
            max_steps: 5000,
        }
    }
}

/// Reward shaping and nectar transfer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RewardConfig {
    /// Nectar requested from a flower per contact.
    pub nectar_per_feed: f32,
    /// Flat reward for every successful feed.
    pub feed_bonus: f32,
    /// Extra reward scaled by how squarely the agent faces the flower.
    pub facing_bonus: f32,
    /// Reward applied when the body hits the area boundary.
    pub boundary_penalty: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            nectar_per_feed: 0.01,
            feed_bonus: 0.10,
            facing_bonus: 0.02,
            boundary_penalty: -1.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AreaConfig {
    /// Diameter of the region the agent and flowers live in; normalises distances.
    pub diameter: f32,
    /// Maximum random pitch/roll applied to plants on reset, in degrees.
    pub plant_tilt: f32,
    /// Maximum random yaw applied to plants on reset, in degrees.
    pub plant_yaw: f32,
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            diameter: 20.0,
            plant_tilt: 5.0,
            plant_yaw: 180.0,
        }
    }
}

/// Rejection-sampling parameters for safe spawn placement.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    pub max_attempts: u32,
    /// Radius of the overlap probe around a candidate position.
    pub safety_radius: f32,
    pub flower_distance_min: f32,
    pub flower_distance_max: f32,
    pub height_min: f32,
    pub height_max: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Maximum absolute pitch of a free-floating spawn, in degrees.
    pub max_pitch: f32,
    /// Probability of spawning next to a flower in training mode.
    pub near_flower_chance: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            safety_radius: 0.05,
            flower_distance_min: 0.1,
            flower_distance_max: 0.2,
            height_min: 1.2,
            height_max: 2.5,
            radius_min: 2.0,
            radius_max: 7.0,
            max_pitch: 60.0,
            near_flower_chance: 0.5,
        }
    }
}

/// Fixed-step simulation parameters used by the harness.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Duration of one action step in seconds.
    pub fixed_delta: f32,
    pub seed: Option<u64>,
    /// Linear velocity damping per second.
    pub linear_drag: f32,
    /// Collision radius of the agent body.
    pub body_radius: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_delta: 0.02,
            seed: None,
            linear_drag: 2.0,
            body_radius: 0.1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub reward: RewardConfig,
    pub area: AreaConfig,
    pub spawn: SpawnConfig,
    pub sim: SimConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // Agent validation
        anyhow::ensure!(self.agent.move_force >= 0.0, "Move force must be non-negative");
        anyhow::ensure!(self.agent.pitch_speed >= 0.0, "Pitch speed must be non-negative");
        anyhow::ensure!(self.agent.yaw_speed >= 0.0, "Yaw speed must be non-negative");
        anyhow::ensure!(
            self.agent.max_pitch_angle > 0.0 && self.agent.max_pitch_angle < 90.0,
            "Max pitch angle must be in (0, 90)"
        );
        anyhow::ensure!(
            self.agent.turn_smoothing_rate > 0.0,
            "Turn smoothing rate must be positive"
        );
        anyhow::ensure!(
            self.agent.beak_tip_radius > 0.0,
            "Beak tip radius must be positive"
        );
        anyhow::ensure!(
            self.agent.beak_tip_offset.is_finite(),
            "Beak tip offset must be finite"
        );

        // Reward validation
        anyhow::ensure!(
            self.reward.nectar_per_feed > 0.0 && self.reward.nectar_per_feed <= 1.0,
            "Nectar per feed must be in (0.0, 1.0]"
        );
        anyhow::ensure!(self.reward.feed_bonus >= 0.0, "Feed bonus must be non-negative");
        anyhow::ensure!(
            self.reward.facing_bonus >= 0.0,
            "Facing bonus must be non-negative"
        );
        anyhow::ensure!(
            self.reward.boundary_penalty <= 0.0,
            "Boundary penalty must not be positive"
        );

        // Area validation
        anyhow::ensure!(self.area.diameter > 0.0, "Area diameter must be positive");
        anyhow::ensure!(
            (0.0..=90.0).contains(&self.area.plant_tilt),
            "Plant tilt must be in [0, 90]"
        );
        anyhow::ensure!(
            (0.0..=180.0).contains(&self.area.plant_yaw),
            "Plant yaw must be in [0, 180]"
        );

        // Spawn validation
        anyhow::ensure!(self.spawn.max_attempts > 0, "Spawn attempts must be positive");
        anyhow::ensure!(
            self.spawn.safety_radius > 0.0,
            "Spawn safety radius must be positive"
        );
        anyhow::ensure!(
            self.spawn.flower_distance_min >= 0.0
                && self.spawn.flower_distance_min <= self.spawn.flower_distance_max,
            "Flower spawn distance range is invalid"
        );
        anyhow::ensure!(
            self.spawn.height_min <= self.spawn.height_max,
            "Spawn height range is invalid"
        );
        anyhow::ensure!(
            self.spawn.radius_min >= 0.0 && self.spawn.radius_min <= self.spawn.radius_max,
            "Spawn radius range is invalid"
        );
        anyhow::ensure!(
            (0.0..90.0).contains(&self.spawn.max_pitch),
            "Spawn pitch must be in [0, 90)"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.spawn.near_flower_chance),
            "Near flower chance must be in [0.0, 1.0]"
        );

        // Simulation validation
        anyhow::ensure!(self.sim.fixed_delta > 0.0, "Fixed delta must be positive");
        anyhow::ensure!(self.sim.fixed_delta <= 1.0, "Fixed delta too large (max 1.0)");
        anyhow::ensure!(self.sim.linear_drag >= 0.0, "Linear drag must be non-negative");
        anyhow::ensure!(self.sim.body_radius > 0.0, "Body radius must be positive");

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`, falling back to defaults.
    ///
    /// A default file is written when none exists. An unreadable or invalid
    /// file is reported and left untouched.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Ok(content) = fs::read_to_string(path) {
            match Self::from_toml(&content) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", path.display(), e);
                }
            }
        }
        let default = Self::default();
        if !path.exists() {
            if let Ok(toml_str) = toml::to_string(&default) {
                let _ = fs::write(path, toml_str);
            }
        }
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_reward_shaping() {
        let config = AppConfig::default();
        assert_eq!(config.reward.nectar_per_feed, 0.01);
        assert_eq!(config.reward.feed_bonus, 0.10);
        assert_eq!(config.reward.facing_bonus, 0.02);
        assert_eq!(config.spawn.max_attempts, 100);
    }

    #[test]
    fn test_invalid_pitch_angle() {
        let config = AppConfig {
            agent: AgentConfig {
                max_pitch_angle: 95.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_spawn_range() {
        let config = AppConfig {
            spawn: SpawnConfig {
                radius_min: 8.0,
                radius_max: 7.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_positive_boundary_penalty_rejected() {
        let config = AppConfig {
            reward: RewardConfig {
                boundary_penalty: 1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml("[agent]\ntraining_mode = false\n").unwrap();
        assert!(!config.agent.training_mode);
        assert_eq!(config.agent.move_force, 2.0);
        assert_eq!(config.area.diameter, 20.0);
    }

    #[test]
    fn test_toml_roundtrip_preserves_vectors() {
        let config = AppConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
