//! # Nectar Core
//!
//! Foraging environment logic for a single hummingbird agent.
//!
//! This crate contains:
//! - Flower discovery and nectar-region binding over a scene graph
//! - Nectar depletion and reset
//! - The agent's observation, action and reward loop
//! - Collision-free spawn placement
//! - Configuration, errors and structured logging
//!
//! ## Example
//!
//! ```
//! use nectar_core::config::AppConfig;
//! use nectar_core::env::ForagingEnv;
//! use nectar_data::{SceneGraph, Transform};
//!
//! let mut config = AppConfig::default();
//! config.sim.seed = Some(42);
//! let mut env = ForagingEnv::new(SceneGraph::new("area", Transform::IDENTITY), config).unwrap();
//!
//! env.begin_episode();
//! env.apply_action(&[0.0, 0.5, 0.0, 0.0, 0.0]).unwrap();
//! let observation = env.collect_observation();
//! assert_eq!(observation.len(), 10);
//! ```

/// Hummingbird control loop
pub mod agent;
/// Scene graph and flower index pairing
pub mod area;
/// Overlap and closest-point queries
pub mod collision;
/// Configuration management for environment parameters
pub mod config;
/// Seeded environment wrapper for training loops
pub mod env;
/// Error types
pub mod error;
/// Nectar depletion and reset
pub mod flower;
/// Flower discovery and O(1) region lookup
pub mod index;
/// Episode metrics and logging setup
pub mod metrics;
/// Observation vector layout
pub mod observation;
/// Nectar and petal region resolution
pub mod region;
/// Safe spawn placement
pub mod spawn;

pub use agent::HummingbirdAgent;
pub use area::FlowerArea;
pub use collision::{CollisionQuery, SceneCollision};
pub use env::ForagingEnv;
pub use error::{NectarError, Result};
pub use flower::FlowerLogic;
pub use index::{FlowerIndex, RebuildReport};
pub use metrics::{init_logging, EpisodeMetrics};
