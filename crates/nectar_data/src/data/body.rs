use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Physical state of the agent's body.
///
/// The physics engine owns integration; the control loop only queues forces,
/// writes the pose on spawn and clears velocities on reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Force accumulated since the last integration step.
    pub pending_force: Vec3,
    pub mass: f32,
    pub asleep: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            pending_force: Vec3::ZERO,
            mass: 1.0,
            asleep: false,
        }
    }
}

impl Body {
    pub fn add_force(&mut self, force: Vec3) {
        self.pending_force += force;
        self.asleep = false;
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Stops all motion and drops queued forces.
    pub fn sleep(&mut self) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.pending_force = Vec3::ZERO;
        self.asleep = true;
    }

    pub fn wake_up(&mut self) {
        self.asleep = false;
    }
}
