//! Minimal rigid-body stepping for the headless harness.
//!
//! Semi-implicit Euler with linear drag and push-out against solid regions.
//! There is no angular dynamics: the control loop writes rotation directly.

use glam::Vec3;
use nectar_core::collision::closest_point_on_shape;
use nectar_core::FlowerArea;
use nectar_data::{Body, RegionId};

/// Integrates queued forces into velocity and position, then clears them.
pub fn integrate(body: &mut Body, dt: f32, linear_drag: f32) {
    if body.asleep {
        body.pending_force = Vec3::ZERO;
        return;
    }
    let mass = body.mass.max(f32::EPSILON);
    body.velocity += body.pending_force / mass * dt;
    body.velocity *= 1.0 / (1.0 + linear_drag * dt);
    body.position += body.velocity * dt;
    body.pending_force = Vec3::ZERO;
}

/// Pushes a sphere body out of `region` and removes velocity pointing into it.
///
/// Returns true when the body was penetrating.
pub fn resolve_penetration(body: &mut Body, radius: f32, area: &FlowerArea, region: RegionId) -> bool {
    let Some(shape) = area.scene.region(region).map(|r| r.shape) else {
        return false;
    };
    let Some(transform) = area.scene.region_transform(region) else {
        return false;
    };

    let closest = closest_point_on_shape(&shape, &transform, body.position);
    let offset = body.position - closest;
    let distance = offset.length();
    if distance >= radius {
        return false;
    }

    // Centre already inside the shape: leave through the nearest face along the centre line.
    let normal = if distance > 1e-6 {
        offset / distance
    } else {
        (body.position - transform.position)
            .try_normalize()
            .unwrap_or(Vec3::Y)
    };
    let surface = if distance > 1e-6 {
        closest
    } else {
        let far = body.position + normal * 1e3;
        closest_point_on_shape(&shape, &transform, far)
    };

    body.position = surface + normal * radius;
    let into = body.velocity.dot(normal);
    if into < 0.0 {
        body.velocity -= normal * into;
    }
    true
}
