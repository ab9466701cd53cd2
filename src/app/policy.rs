//! Scripted policies that drive the agent without a learner attached.

use glam::{Quat, Vec3};
use nectar_core::agent::ACTION_SIZE;
use nectar_core::observation::OBSERVATION_SIZE;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait Policy: Send {
    fn act(&mut self, observation: &[f32; OBSERVATION_SIZE]) -> [f32; ACTION_SIZE];
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyKind {
    Seek,
    Random,
    Idle,
}

impl PolicyKind {
    pub fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            Self::Seek => Box::new(SeekNectar::default()),
            Self::Random => Box::new(RandomPolicy::new(seed)),
            Self::Idle => Box::new(Idle),
        }
    }
}

/// Flies the beak straight at the tracked nectar and turns to face it.
#[derive(Debug, Clone)]
pub struct SeekNectar {
    pub move_gain: f32,
    pub turn_gain: f32,
}

impl Default for SeekNectar {
    fn default() -> Self {
        Self {
            move_gain: 4.0,
            turn_gain: 3.0,
        }
    }
}

impl Policy for SeekNectar {
    fn act(&mut self, obs: &[f32; OBSERVATION_SIZE]) -> [f32; ACTION_SIZE] {
        let rotation = Quat::from_xyzw(obs[0], obs[1], obs[2], obs[3]);
        let to_flower = Vec3::new(obs[4], obs[5], obs[6]);
        if to_flower == Vec3::ZERO || !rotation.is_normalized() {
            return [0.0; ACTION_SIZE];
        }

        // Slow down on approach; obs[9] is distance over area diameter.
        let speed = (obs[9] * 20.0 * self.move_gain).clamp(0.15, 1.0);
        let thrust = to_flower * speed;

        // Positive pitch dips the nose, positive yaw turns right.
        let local = rotation.inverse() * to_flower;
        let pitch = (-local.y * self.turn_gain).clamp(-1.0, 1.0);
        let yaw = (local.x * self.turn_gain).clamp(-1.0, 1.0);

        [thrust.x, thrust.y, thrust.z, pitch, yaw]
    }
}

/// Uniform random actions from a seeded generator.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &[f32; OBSERVATION_SIZE]) -> [f32; ACTION_SIZE] {
        let mut action = [0.0; ACTION_SIZE];
        for v in &mut action {
            *v = self.rng.gen_range(-1.0..=1.0);
        }
        action
    }
}

/// Does nothing; useful for checking spawn and gravity-free drift.
#[derive(Debug, Clone, Copy)]
pub struct Idle;

impl Policy for Idle {
    fn act(&mut self, _observation: &[f32; OBSERVATION_SIZE]) -> [f32; ACTION_SIZE] {
        [0.0; ACTION_SIZE]
    }
}
