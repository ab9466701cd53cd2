//! The hummingbird's perception, action and reward loop.
//!
//! The agent never owns flowers. It tracks the nearest one through a
//! generational [`FlowerHandle`] and resolves it against the area on every
//! use, so a rebuild of the index silently drops the reference instead of
//! leaving it dangling.

use crate::area::FlowerArea;
use crate::collision::CollisionQuery;
use crate::config::{AgentConfig, AppConfig, RewardConfig, SpawnConfig};
use crate::error::{NectarError, Result};
use crate::flower::FlowerLogic;
use crate::observation::{self, OBSERVATION_SIZE};
use crate::spawn::{euler_degrees, find_spawn_pose, SpawnOutcome};
use glam::{EulerRot, Vec3};
use nectar_data::{Body, Flower, FlowerHandle, RegionId, BOUNDARY_TAG};
use rand::Rng;

/// Number of values in an action: move x/y/z, pitch, yaw.
pub const ACTION_SIZE: usize = 5;

fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Wraps an angle in degrees into `[-180, 180]`.
fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone)]
pub struct HummingbirdAgent {
    config: AgentConfig,
    reward: RewardConfig,
    pub body: Body,
    nearest: Option<FlowerHandle>,
    frozen: bool,
    smooth_pitch: f32,
    smooth_yaw: f32,
    nectar_obtained: f32,
    pending_reward: f32,
    episode_reward: f32,
    step_count: u32,
    max_steps: u32,
}

impl HummingbirdAgent {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: config.agent.clone(),
            reward: config.reward.clone(),
            body: Body::default(),
            nearest: None,
            frozen: false,
            smooth_pitch: 0.0,
            smooth_yaw: 0.0,
            nectar_obtained: 0.0,
            pending_reward: 0.0,
            episode_reward: 0.0,
            step_count: 0,
            max_steps: config.agent.max_steps,
        }
    }

    /// One-time setup. Outside training the episode never ends on its own.
    pub fn initialize(&mut self) {
        if !self.config.training_mode {
            self.max_steps = 0;
        }
    }

    /// Resets per-episode state and places the agent at a safe spawn.
    pub fn begin_episode<C, R>(
        &mut self,
        area: &mut FlowerArea,
        collision: &C,
        spawn: &SpawnConfig,
        rng: &mut R,
    ) -> SpawnOutcome
    where
        C: CollisionQuery + ?Sized,
        R: Rng + ?Sized,
    {
        if self.config.training_mode {
            area.reset_flowers(rng);
        }

        self.nectar_obtained = 0.0;
        self.pending_reward = 0.0;
        self.episode_reward = 0.0;
        self.step_count = 0;
        self.smooth_pitch = 0.0;
        self.smooth_yaw = 0.0;
        self.body.velocity = Vec3::ZERO;
        self.body.angular_velocity = Vec3::ZERO;
        self.body.pending_force = Vec3::ZERO;

        let near_flower = if self.config.training_mode {
            rng.gen_bool(f64::from(spawn.near_flower_chance))
        } else {
            true
        };
        let outcome = find_spawn_pose(area, collision, spawn, near_flower, rng);
        self.body.position = outcome.position;
        self.body.rotation = outcome.rotation;

        self.update_nearest_flower(area);
        tracing::debug!(
            position = ?outcome.position,
            mode = ?outcome.mode,
            attempts = outcome.attempts,
            nearest = ?self.nearest,
            "Episode begin"
        );
        outcome
    }

    /// Applies `[move_x, move_y, move_z, pitch, yaw]`, each clamped to `[-1, 1]`.
    ///
    /// A frozen agent ignores actions. Only the length is checked before that.
    pub fn apply_action(&mut self, action: &[f32], dt: f32) -> Result<()> {
        if action.len() != ACTION_SIZE {
            return Err(NectarError::InvalidAction {
                expected: ACTION_SIZE,
                actual: action.len(),
            });
        }
        if self.frozen {
            return Ok(());
        }

        let a: Vec<f32> = action
            .iter()
            .map(|&v| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) })
            .collect();
        self.body
            .add_force(Vec3::new(a[0], a[1], a[2]) * self.config.move_force);

        let max_delta = self.config.turn_smoothing_rate * dt;
        self.smooth_pitch = move_towards(self.smooth_pitch, a[3], max_delta);
        self.smooth_yaw = move_towards(self.smooth_yaw, a[4], max_delta);

        let (yaw, pitch, _) = self.body.rotation.to_euler(EulerRot::YXZ);
        let pitch = wrap_degrees(pitch.to_degrees() + self.smooth_pitch * dt * self.config.pitch_speed)
            .clamp(-self.config.max_pitch_angle, self.config.max_pitch_angle);
        let yaw = yaw.to_degrees() + self.smooth_yaw * dt * self.config.yaw_speed;
        self.body.rotation = euler_degrees(pitch, yaw, 0.0);

        self.step_count += 1;
        Ok(())
    }

    /// Observation for the current step; all zeros when no flower is tracked.
    pub fn collect_observation(&self, area: &FlowerArea) -> [f32; OBSERVATION_SIZE] {
        let target = self.nearest_in(area).map(|f| &f.pose);
        observation::assemble(
            self.body.rotation,
            self.beak_tip(),
            self.body.forward(),
            target,
            area.diameter,
        )
    }

    /// Re-selects the closest flower that still has nectar.
    ///
    /// Ties keep the flower found first; no flower with nectar clears the
    /// tracked handle.
    pub fn update_nearest_flower(&mut self, area: &FlowerArea) {
        let beak = self.beak_tip();
        let mut best: Option<(FlowerHandle, f32)> = None;

        for handle in area.index.handles() {
            let Some(flower) = area.flower(handle) else {
                continue;
            };
            if !flower.has_nectar() {
                continue;
            }
            let distance = flower.pose.position.distance(beak);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((handle, distance));
            }
        }
        self.nearest = best.map(|(h, _)| h);
    }

    pub fn nearest_flower(&self) -> Option<FlowerHandle> {
        self.nearest
    }

    fn nearest_in<'a>(&self, area: &'a FlowerArea) -> Option<&'a Flower> {
        self.nearest.and_then(|h| area.flower(h))
    }

    /// World position of the beak tip.
    pub fn beak_tip(&self) -> Vec3 {
        self.body.position + self.body.rotation * self.config.beak_tip_offset
    }

    /// Handles a trigger contact (entered or sustained) with `region`.
    ///
    /// Only the beak feeds: the contact counts when the closest point of the
    /// region lies within the beak tip radius. Returns the nectar taken.
    pub fn on_region_contact<C>(
        &mut self,
        area: &mut FlowerArea,
        collision: &C,
        region: RegionId,
        sustained: bool,
    ) -> f32
    where
        C: CollisionQuery + ?Sized,
    {
        let Some(handle) = area.index.handle_for(region) else {
            return 0.0;
        };
        if !area.index.is_region_active(region) {
            return 0.0;
        }
        let beak = self.beak_tip();
        let Some(closest) = collision.closest_point(area, region, beak) else {
            return 0.0;
        };
        if closest.distance(beak) >= self.config.beak_tip_radius {
            return 0.0;
        }

        let forward = self.body.forward().normalize_or_zero();
        let Some(flower) = area.flower_mut(handle) else {
            return 0.0;
        };
        let taken = flower.feed(self.reward.nectar_per_feed);
        let emptied = !flower.has_nectar();
        let alignment = forward.dot(-flower.pose.up.normalize_or_zero());
        self.nectar_obtained += taken;

        if self.config.training_mode {
            let bonus = self.reward.feed_bonus + self.reward.facing_bonus * alignment.clamp(0.0, 1.0);
            self.add_reward(bonus);
        }
        tracing::trace!(?region, sustained, taken, "Fed on nectar");

        if emptied {
            self.update_nearest_flower(area);
        }
        taken
    }

    /// Handles a solid collision of the body with something tagged `tag`.
    pub fn on_body_collision(&mut self, tag: &str) {
        if self.config.training_mode && tag == BOUNDARY_TAG {
            self.add_reward(self.reward.boundary_penalty);
        }
    }

    /// Stops the agent in place. Only allowed outside training.
    pub fn freeze(&mut self) -> Result<()> {
        if self.config.training_mode {
            let err = NectarError::FreezeInTraining;
            tracing::error!("{}", err);
            return Err(err);
        }
        self.frozen = true;
        self.body.sleep();
        Ok(())
    }

    pub fn unfreeze(&mut self) -> Result<()> {
        if self.config.training_mode {
            let err = NectarError::FreezeInTraining;
            tracing::error!("{}", err);
            return Err(err);
        }
        self.frozen = false;
        self.body.wake_up();
        Ok(())
    }

    /// Per fixed-step upkeep: retarget once the tracked flower runs dry or disappears.
    pub fn on_fixed_step(&mut self, area: &FlowerArea) {
        if let Some(handle) = self.nearest {
            let dry = area.flower(handle).map_or(true, |f| !f.has_nectar());
            if dry {
                self.update_nearest_flower(area);
            }
        }
    }

    /// Segment from the beak tip to the tracked nectar centre, for debug drawing.
    pub fn debug_line(&self, area: &FlowerArea) -> Option<(Vec3, Vec3)> {
        self.nearest_in(area)
            .map(|flower| (self.beak_tip(), flower.pose.center))
    }

    fn add_reward(&mut self, amount: f32) {
        self.pending_reward += amount;
        self.episode_reward += amount;
    }

    /// Returns the reward accumulated since the last call and clears it.
    pub fn take_reward(&mut self) -> f32 {
        std::mem::take(&mut self.pending_reward)
    }

    pub fn episode_reward(&self) -> f32 {
        self.episode_reward
    }

    pub fn nectar_obtained(&self) -> f32 {
        self.nectar_obtained
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub fn is_episode_done(&self) -> bool {
        self.max_steps > 0 && self.step_count >= self.max_steps
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn training_mode(&self) -> bool {
        self.config.training_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(training: bool) -> HummingbirdAgent {
        let mut config = AppConfig::default();
        config.agent.training_mode = training;
        let mut agent = HummingbirdAgent::new(&config);
        agent.initialize();
        agent
    }

    #[test]
    fn test_move_towards() {
        assert_eq!(move_towards(0.0, 1.0, 0.04), 0.04);
        assert_eq!(move_towards(0.98, 1.0, 0.04), 1.0);
        assert_eq!(move_towards(0.0, -1.0, 0.5), -0.5);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(350.0), -10.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(45.0), 45.0);
    }

    #[test]
    fn test_initialize_outside_training_disables_step_limit() {
        assert_eq!(agent(false).max_steps(), 0);
        assert_eq!(agent(true).max_steps(), 5000);
    }

    #[test]
    fn test_action_length_checked() {
        let mut a = agent(true);
        assert_eq!(
            a.apply_action(&[0.0; 3], 0.02),
            Err(NectarError::InvalidAction {
                expected: 5,
                actual: 3
            })
        );
        assert_eq!(a.step_count(), 0);
    }

    #[test]
    fn test_action_applies_force_and_smoothed_turn() {
        let mut a = agent(true);
        a.apply_action(&[1.0, 0.0, -3.0, 0.0, 1.0], 0.02).unwrap();
        assert_eq!(a.body.pending_force, Vec3::new(2.0, 0.0, -2.0));

        // Smoothed yaw command is 0.04 after one step: 0.04 * 0.02 * 100 = 0.08 degrees.
        let (yaw, _, _) = a.body.rotation.to_euler(EulerRot::YXZ);
        assert!((yaw.to_degrees() - 0.08).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut a = agent(true);
        for _ in 0..2000 {
            a.apply_action(&[0.0, 0.0, 0.0, 1.0, 0.0], 0.02).unwrap();
        }
        let (_, pitch, roll) = a.body.rotation.to_euler(EulerRot::YXZ);
        assert!(pitch.to_degrees() <= 80.0 + 1e-3);
        assert!(pitch.to_degrees() > 79.0);
        assert!(roll.abs() < 1e-4);
    }

    #[test]
    fn test_freeze_rejected_in_training() {
        let mut a = agent(true);
        assert_eq!(a.freeze(), Err(NectarError::FreezeInTraining));
        assert!(!a.is_frozen());
        assert_eq!(a.unfreeze(), Err(NectarError::FreezeInTraining));
    }

    #[test]
    fn test_frozen_agent_ignores_actions() {
        let mut a = agent(false);
        a.body.velocity = Vec3::X;
        a.freeze().unwrap();
        assert!(a.body.asleep);
        assert_eq!(a.body.velocity, Vec3::ZERO);

        a.apply_action(&[1.0; 5], 0.02).unwrap();
        assert_eq!(a.body.pending_force, Vec3::ZERO);
        assert_eq!(a.step_count(), 0);

        a.unfreeze().unwrap();
        assert!(!a.body.asleep);
        assert!(!a.is_frozen());
    }

    #[test]
    fn test_boundary_penalty_only_in_training() {
        let mut a = agent(true);
        a.on_body_collision("boundary");
        a.on_body_collision("rock");
        assert_eq!(a.take_reward(), -1.0);
        assert_eq!(a.take_reward(), 0.0);
        assert_eq!(a.episode_reward(), -1.0);

        let mut b = agent(false);
        b.on_body_collision("boundary");
        assert_eq!(b.take_reward(), 0.0);
    }

    #[test]
    fn test_episode_done_at_step_limit() {
        let mut config = AppConfig::default();
        config.agent.max_steps = 3;
        let mut a = HummingbirdAgent::new(&config);
        a.initialize();
        for _ in 0..3 {
            assert!(!a.is_episode_done());
            a.apply_action(&[0.0; 5], 0.02).unwrap();
        }
        assert!(a.is_episode_done());
    }
}
