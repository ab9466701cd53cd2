//! Rejection sampling of collision-free agent spawn poses.

use crate::area::FlowerArea;
use crate::collision::CollisionQuery;
use crate::config::SpawnConfig;
use crate::flower::FlowerLogic;
use glam::{EulerRot, Mat3, Quat, Vec3};
use nectar_data::Flower;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMode {
    /// Hover just in front of a random flower, facing it.
    NearFlower,
    /// Float at a random height and radius around the area origin.
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnOutcome {
    pub position: Vec3,
    pub rotation: Quat,
    pub attempts: u32,
    /// False when every attempt overlapped something and the last candidate was used.
    pub safe: bool,
    pub mode: SpawnMode,
}

/// Rotation whose forward (+Z) axis points along `direction` with +Y as close to `up` as possible.
///
/// Falls back to an arbitrary perpendicular up when `direction` is parallel to
/// `up`, and to identity for a zero direction.
pub fn look_rotation(direction: Vec3, up: Vec3) -> Quat {
    let forward = direction.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut right = up.cross(forward);
    if right.length_squared() < 1e-12 {
        right = forward.any_orthonormal_vector().cross(forward);
    }
    let right = right.normalize();
    let true_up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, true_up, forward)).normalize()
}

/// Rotation from Euler angles in degrees, applied yaw, then pitch, then roll.
pub fn euler_degrees(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        yaw.to_radians(),
        pitch.to_radians(),
        roll.to_radians(),
    )
}

fn near_flower_candidate<R: Rng + ?Sized>(
    flowers: &[&Flower],
    config: &SpawnConfig,
    rng: &mut R,
) -> (Vec3, Quat) {
    let flower = flowers[rng.gen_range(0..flowers.len())];
    let distance = rng.gen_range(config.flower_distance_min..=config.flower_distance_max);
    let position = flower.pose.position + flower.pose.up * distance;
    let rotation = look_rotation(flower.pose.center - position, Vec3::Y);
    (position, rotation)
}

fn free_candidate<R: Rng + ?Sized>(origin: Vec3, config: &SpawnConfig, rng: &mut R) -> (Vec3, Quat) {
    let height = rng.gen_range(config.height_min..=config.height_max);
    let radius = rng.gen_range(config.radius_min..=config.radius_max);
    let azimuth = euler_degrees(0.0, rng.gen_range(-180.0..=180.0), 0.0);
    let position = origin + Vec3::Y * height + azimuth * Vec3::Z * radius;

    let pitch = rng.gen_range(-config.max_pitch..=config.max_pitch);
    let yaw = rng.gen_range(-180.0..=180.0);
    (position, euler_degrees(pitch, yaw, 0.0))
}

/// Samples up to `max_attempts` candidate poses and keeps the first whose
/// probe sphere overlaps nothing.
///
/// Near-flower spawns prefer flowers that still hold nectar and degrade to
/// free spawns when the area has no flowers at all.
pub fn find_spawn_pose<C, R>(
    area: &FlowerArea,
    collision: &C,
    config: &SpawnConfig,
    near_flower: bool,
    rng: &mut R,
) -> SpawnOutcome
where
    C: CollisionQuery + ?Sized,
    R: Rng + ?Sized,
{
    let with_nectar: Vec<&Flower> = area.index.flowers().iter().filter(|f| f.has_nectar()).collect();
    let pool: Vec<&Flower> = if with_nectar.is_empty() {
        area.index.flowers().iter().collect()
    } else {
        with_nectar
    };
    let mode = if near_flower && !pool.is_empty() {
        SpawnMode::NearFlower
    } else {
        SpawnMode::Free
    };
    let origin = area.origin();

    let mut outcome = SpawnOutcome {
        position: origin,
        rotation: Quat::IDENTITY,
        attempts: 0,
        safe: false,
        mode,
    };
    while outcome.attempts < config.max_attempts {
        outcome.attempts += 1;
        let (position, rotation) = match mode {
            SpawnMode::NearFlower => near_flower_candidate(&pool, config, rng),
            SpawnMode::Free => free_candidate(origin, config, rng),
        };
        outcome.position = position;
        outcome.rotation = rotation;

        if collision.overlap_count(area, position, config.safety_radius) == 0 {
            outcome.safe = true;
            break;
        }
    }

    if !outcome.safe {
        tracing::warn!(
            attempts = outcome.attempts,
            ?mode,
            "Could not find a safe spawn position"
        );
    }
    outcome
}
