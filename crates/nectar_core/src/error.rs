//! Error types for nectar_core.
//!
//! None of these abort the simulation. Binding problems are collected into a
//! `RebuildReport`, misuse of the agent API is returned to the caller.

use nectar_data::{NodeId, RegionId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NectarError {
    /// No region could be resolved as the flower's nectar region.
    #[error("Flower '{flower}' ({node:?}) is missing a nectar region")]
    MissingNectarRegion { flower: String, node: NodeId },

    /// The resolved nectar region already belongs to another flower.
    #[error("Duplicate nectar region {region:?} on '{flower}', already bound to '{existing}'")]
    DuplicateNectarRegion {
        region: RegionId,
        flower: String,
        existing: String,
    },

    #[error("Freeze/unfreeze is not supported in training mode")]
    FreezeInTraining,

    #[error("Expected {expected} action values, got {actual}")]
    InvalidAction { expected: usize, actual: usize },

    #[error("Unknown scene node: {0:?}")]
    UnknownNode(NodeId),
}

/// Result type alias for nectar_core operations.
pub type Result<T> = std::result::Result<T, NectarError>;
