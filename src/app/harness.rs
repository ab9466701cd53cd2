//! Headless episode runner.
//!
//! Stands in for both the physics engine and the training loop: integrates
//! the body, turns region overlaps into contact callbacks and feeds a
//! scripted policy with observations.

use super::physics;
use super::policy::Policy;
use anyhow::Result;
use nectar_core::ForagingEnv;
use nectar_data::RegionId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Per-episode results, printed by the binary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub steps: u32,
    pub nectar: f32,
    pub reward: f32,
    pub boundary_hits: u32,
    pub safe_spawn: bool,
}

pub struct Harness {
    pub env: ForagingEnv,
    policy: Box<dyn Policy>,
    touching: HashSet<RegionId>,
    episodes: u32,
}

impl Harness {
    pub fn new(env: ForagingEnv, policy: Box<dyn Policy>) -> Self {
        Self {
            env,
            policy,
            touching: HashSet::new(),
            episodes: 0,
        }
    }

    /// Runs one episode for at most `step_cap` steps.
    ///
    /// The agent's own step limit ends the episode earlier when set.
    pub fn run_episode(&mut self, step_cap: u32) -> Result<EpisodeSummary> {
        let spawn = self.env.begin_episode();
        self.touching.clear();
        self.episodes += 1;

        let mut summary = EpisodeSummary {
            episode: self.episodes,
            steps: 0,
            nectar: 0.0,
            reward: 0.0,
            boundary_hits: 0,
            safe_spawn: spawn.safe,
        };

        while summary.steps < step_cap && !self.env.is_episode_done() {
            let observation = self.env.collect_observation();
            let action = self.policy.act(&observation);
            self.env.apply_action(&action)?;

            summary.boundary_hits += self.physics_step();
            self.env.on_fixed_step();
            summary.reward += self.env.take_reward();
            summary.steps += 1;
        }

        summary.nectar = self.env.agent.nectar_obtained();
        tracing::debug!(
            episode = summary.episode,
            steps = summary.steps,
            nectar = summary.nectar,
            reward = summary.reward,
            "Harness episode done"
        );
        Ok(summary)
    }

    /// Runs `episodes` episodes back to back and closes the last one.
    pub fn run(&mut self, episodes: u32, step_cap: u32) -> Result<Vec<EpisodeSummary>> {
        let mut out = Vec::with_capacity(episodes as usize);
        for _ in 0..episodes {
            out.push(self.run_episode(step_cap)?);
        }
        self.env.end_episode();
        Ok(out)
    }

    /// Advances the body one fixed step and dispatches contacts.
    ///
    /// Returns the number of boundary collisions entered this step.
    fn physics_step(&mut self) -> u32 {
        let dt = self.env.config.sim.fixed_delta;
        let drag = self.env.config.sim.linear_drag;
        let radius = self.env.config.sim.body_radius;
        let beak_radius = self.env.config.agent.beak_tip_radius;

        physics::integrate(&mut self.env.agent.body, dt, drag);

        let position = self.env.agent.body.position;
        let beak = self.env.agent.beak_tip();
        let mut now: Vec<RegionId> = self.env.collision.contacts(&self.env.area, position, radius);
        // The beak only senses triggers; solids collide with the body sphere.
        for region in self.env.collision.contacts(&self.env.area, beak, beak_radius) {
            let is_trigger = self.env.area.scene.region(region).is_some_and(|r| r.is_trigger);
            if is_trigger && !now.contains(&region) {
                now.push(region);
            }
        }

        let mut boundary_hits = 0;
        for &region in &now {
            let Some((is_trigger, tag)) = self
                .env
                .area
                .scene
                .region(region)
                .map(|r| (r.is_trigger, r.tag.clone().unwrap_or_default()))
            else {
                continue;
            };
            let sustained = self.touching.contains(&region);

            if is_trigger {
                self.env.on_region_contact(region, sustained);
                continue;
            }

            let hit = physics::resolve_penetration(&mut self.env.agent.body, radius, &self.env.area, region);
            if hit && !sustained {
                if tag == nectar_data::BOUNDARY_TAG {
                    boundary_hits += 1;
                }
                self.env.on_body_collision(&tag);
            }
        }
        self.touching = now.into_iter().collect();
        boundary_hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::meadow::{build_meadow, MeadowConfig};
    use crate::app::policy::{Idle, PolicyKind};
    use nectar_core::config::AppConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn harness(seed: u64, kind: PolicyKind) -> Harness {
        let mut config = AppConfig::default();
        config.sim.seed = Some(seed);
        let scene = build_meadow(&MeadowConfig::default(), &mut ChaCha8Rng::seed_from_u64(seed));
        Harness::new(ForagingEnv::new(scene, config).unwrap(), kind.build(seed))
    }

    #[test]
    fn test_same_seed_same_episodes() {
        let a = harness(3, PolicyKind::Random).run(2, 200).unwrap();
        let b = harness(3, PolicyKind::Random).run(2, 200).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_step_cap_respected() {
        let mut h = harness(4, PolicyKind::Seek);
        let summary = h.run_episode(50).unwrap();
        assert_eq!(summary.steps, 50);
        assert!(summary.nectar >= 0.0);
    }

    #[test]
    fn test_agent_step_limit_ends_episode() {
        let mut config = AppConfig::default();
        config.agent.max_steps = 10;
        config.sim.seed = Some(1);
        let scene = build_meadow(&MeadowConfig::default(), &mut ChaCha8Rng::seed_from_u64(1));
        let mut h = Harness::new(ForagingEnv::new(scene, config).unwrap(), Box::new(Idle));

        let summary = h.run_episode(1000).unwrap();
        assert_eq!(summary.steps, 10);
        assert_eq!(h.env.metrics().episodes(), 0);
        h.env.end_episode();
        assert_eq!(h.env.metrics().episodes(), 1);
    }
}
