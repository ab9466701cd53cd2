//! Collision queries the control loop depends on.
//!
//! The physics backend is pluggable through [`CollisionQuery`].
//! [`SceneCollision`] answers the queries directly from the scene's sphere and
//! box regions, skipping regions of emptied flowers.

use crate::area::FlowerArea;
use glam::Vec3;
use nectar_data::{Region, RegionId, RegionShape, Transform};

pub trait CollisionQuery {
    /// Number of active regions intersecting the sphere at `point`.
    fn overlap_count(&self, area: &FlowerArea, point: Vec3, radius: f32) -> usize;

    /// Point on `region` closest to `point`; `point` itself when it lies inside.
    fn closest_point(&self, area: &FlowerArea, region: RegionId, point: Vec3) -> Option<Vec3>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SceneCollision;

/// Closest point on a shape placed at `transform`.
pub fn closest_point_on_shape(shape: &RegionShape, transform: &Transform, point: Vec3) -> Vec3 {
    match *shape {
        RegionShape::Sphere { radius } => {
            let offset = point - transform.position;
            transform.position + offset.clamp_length_max(radius)
        }
        RegionShape::Box { half_extents } => {
            let local = transform.inverse_transform_point(point);
            let clamped = local.clamp(-half_extents, half_extents);
            transform.position + transform.rotation * clamped
        }
    }
}

impl SceneCollision {
    fn region_closest(area: &FlowerArea, region: &Region, point: Vec3) -> Vec3 {
        let transform = area.scene.world_transform(region.node);
        closest_point_on_shape(&region.shape, &transform, point)
    }

    /// Active regions intersecting the sphere at `point`, in region order.
    pub fn contacts(&self, area: &FlowerArea, point: Vec3, radius: f32) -> Vec<RegionId> {
        area.scene
            .regions()
            .iter()
            .filter(|r| area.index.is_region_active(r.id))
            .filter(|r| Self::region_closest(area, r, point).distance(point) <= radius)
            .map(|r| r.id)
            .collect()
    }
}

impl CollisionQuery for SceneCollision {
    fn overlap_count(&self, area: &FlowerArea, point: Vec3, radius: f32) -> usize {
        self.contacts(area, point, radius).len()
    }

    fn closest_point(&self, area: &FlowerArea, region: RegionId, point: Vec3) -> Option<Vec3> {
        let region = area.scene.region(region)?;
        Some(Self::region_closest(area, region, point))
    }
}
