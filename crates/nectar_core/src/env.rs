//! Training-facing wrapper tying one area, one agent and a seeded RNG together.

use crate::agent::HummingbirdAgent;
use crate::area::FlowerArea;
use crate::collision::{CollisionQuery, SceneCollision};
use crate::config::AppConfig;
use crate::error::Result;
use crate::index::RebuildReport;
use crate::metrics::EpisodeMetrics;
use crate::observation::OBSERVATION_SIZE;
use crate::spawn::SpawnOutcome;
use glam::Vec3;
use nectar_data::{RegionId, SceneGraph};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct ForagingEnv<C = SceneCollision> {
    pub config: AppConfig,
    pub area: FlowerArea,
    pub agent: HummingbirdAgent,
    pub collision: C,
    rng: ChaCha8Rng,
    metrics: EpisodeMetrics,
    rebuild_report: RebuildReport,
    episode_open: bool,
}

impl ForagingEnv<SceneCollision> {
    pub fn new(scene: SceneGraph, config: AppConfig) -> anyhow::Result<Self> {
        Self::with_collision(scene, config, SceneCollision)
    }
}

impl<C: CollisionQuery> ForagingEnv<C> {
    /// Builds the area, binds its flowers and initialises the agent.
    ///
    /// Fails when `config` does not validate.
    pub fn with_collision(scene: SceneGraph, config: AppConfig, collision: C) -> anyhow::Result<Self> {
        config.validate()?;
        let mut area = FlowerArea::construct(scene, &config.area);
        let rebuild_report = area.bind_references();

        let mut agent = HummingbirdAgent::new(&config);
        agent.initialize();

        let rng = match config.sim.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            config,
            area,
            agent,
            collision,
            rng,
            metrics: EpisodeMetrics::new(),
            rebuild_report,
            episode_open: false,
        })
    }

    /// Closes the running episode, if any, and starts a new one.
    pub fn begin_episode(&mut self) -> SpawnOutcome {
        self.end_episode();
        self.episode_open = true;
        self.agent.begin_episode(
            &mut self.area,
            &self.collision,
            &self.config.spawn,
            &mut self.rng,
        )
    }

    /// Records the running episode into the metrics.
    pub fn end_episode(&mut self) {
        if std::mem::take(&mut self.episode_open) {
            self.metrics.record_episode(
                self.agent.step_count(),
                self.agent.nectar_obtained(),
                self.agent.episode_reward(),
            );
        }
    }

    pub fn collect_observation(&self) -> [f32; OBSERVATION_SIZE] {
        self.agent.collect_observation(&self.area)
    }

    pub fn apply_action(&mut self, action: &[f32]) -> Result<()> {
        self.agent.apply_action(action, self.config.sim.fixed_delta)
    }

    pub fn take_reward(&mut self) -> f32 {
        self.agent.take_reward()
    }

    pub fn is_episode_done(&self) -> bool {
        self.agent.is_episode_done()
    }

    pub fn on_fixed_step(&mut self) {
        self.agent.on_fixed_step(&self.area);
    }

    /// Debug segment from the beak tip to the tracked nectar.
    pub fn on_render_step(&self) -> Option<(Vec3, Vec3)> {
        self.agent.debug_line(&self.area)
    }

    pub fn on_region_contact(&mut self, region: RegionId, sustained: bool) -> f32 {
        self.agent
            .on_region_contact(&mut self.area, &self.collision, region, sustained)
    }

    pub fn on_body_collision(&mut self, tag: &str) {
        self.agent.on_body_collision(tag);
    }

    pub fn freeze(&mut self) -> Result<()> {
        self.agent.freeze()
    }

    pub fn unfreeze(&mut self) -> Result<()> {
        self.agent.unfreeze()
    }

    /// Rebuilds the flower index; handles held by the agent become stale.
    pub fn rebuild_index(&mut self) -> &RebuildReport {
        self.rebuild_report = self.area.bind_references();
        &self.rebuild_report
    }

    /// Report of the most recent index build.
    pub fn rebuild_report(&self) -> &RebuildReport {
        &self.rebuild_report
    }

    pub fn metrics(&self) -> &EpisodeMetrics {
        &self.metrics
    }
}
