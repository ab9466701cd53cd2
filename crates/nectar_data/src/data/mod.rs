//! Core data structures for the Nectar foraging environment.

pub mod body;
pub mod flower;
pub mod scene;
