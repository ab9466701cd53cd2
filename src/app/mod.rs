pub mod harness;
pub mod meadow;
pub mod physics;
pub mod policy;

pub use harness::{EpisodeSummary, Harness};
pub use meadow::{build_meadow, MeadowConfig};
pub use policy::{Policy, PolicyKind};
