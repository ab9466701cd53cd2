use glam::{Quat, Vec3};
use nectar_data::FlowerPose;

/// Length of the agent's observation vector.
pub const OBSERVATION_SIZE: usize = 10;

/// Builds the observation vector.
///
/// Layout:
/// - `[0..4]` agent rotation quaternion `(x, y, z, w)`, normalized
/// - `[4..7]` unit vector from the beak tip to the nectar centre
/// - `[7]` how directly the beak tip sits in front of the flower
/// - `[8]` how directly the beak points into the flower
/// - `[9]` beak-to-nectar distance relative to the area diameter
///
/// Without a target flower every entry is zero.
pub fn assemble(
    rotation: Quat,
    beak_tip: Vec3,
    beak_forward: Vec3,
    target: Option<&FlowerPose>,
    diameter: f32,
) -> [f32; OBSERVATION_SIZE] {
    let mut obs = [0.0; OBSERVATION_SIZE];
    let Some(pose) = target else {
        return obs;
    };

    let q = rotation.normalize();
    obs[..4].copy_from_slice(&[q.x, q.y, q.z, q.w]);

    let to_flower = pose.center - beak_tip;
    let dir = to_flower.normalize_or_zero();
    let down = -pose.up.normalize_or_zero();
    obs[4..7].copy_from_slice(&dir.to_array());
    obs[7] = dir.dot(down);
    obs[8] = beak_forward.normalize_or_zero().dot(down);
    obs[9] = if diameter > 0.0 {
        to_flower.length() / diameter
    } else {
        0.0
    };
    obs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_target_is_all_zeros() {
        let obs = assemble(Quat::from_rotation_y(1.0), Vec3::ONE, Vec3::Z, None, 20.0);
        assert_eq!(obs, [0.0; OBSERVATION_SIZE]);
    }

    #[test]
    fn test_facing_flower_head_on() {
        // Flower opens towards -Z; the beak hovers in front of it pointing +Z.
        let pose = FlowerPose {
            position: Vec3::new(0.0, 1.0, 2.0),
            center: Vec3::new(0.0, 1.0, 2.0),
            up: Vec3::NEG_Z,
        };
        let obs = assemble(Quat::IDENTITY, Vec3::new(0.0, 1.0, 0.0), Vec3::Z, Some(&pose), 20.0);

        assert_eq!(&obs[..4], &[0.0, 0.0, 0.0, 1.0]);
        assert!((obs[6] - 1.0).abs() < 1e-6);
        assert!((obs[7] - 1.0).abs() < 1e-6);
        assert!((obs[8] - 1.0).abs() < 1e-6);
        assert!((obs[9] - 0.1).abs() < 1e-6);
    }
}
