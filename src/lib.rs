pub mod app;
pub mod model;

use crate::app::{build_meadow, Harness, MeadowConfig, PolicyKind};
use crate::model::config::AppConfig;
use crate::model::env::ForagingEnv;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Builds a harness over a freshly generated meadow.
///
/// The meadow layout and the environment share `seed`, so a run is fully
/// reproducible from it.
pub fn meadow_harness(
    config: AppConfig,
    meadow: &MeadowConfig,
    policy: PolicyKind,
    seed: u64,
) -> anyhow::Result<Harness> {
    let mut config = config;
    config.sim.seed = Some(seed);
    let scene = build_meadow(meadow, &mut ChaCha8Rng::seed_from_u64(seed));
    let env = ForagingEnv::new(scene, config)?;
    let report = env.rebuild_report();
    tracing::info!(
        seed,
        flowers = report.flowers,
        missing = report.missing_count(),
        duplicates = report.duplicate_count(),
        "Meadow ready"
    );
    Ok(Harness::new(env, policy.build(seed)))
}
