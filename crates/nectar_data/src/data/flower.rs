use super::scene::{NodeId, RegionId};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Generational reference to a flower held by a `FlowerIndex`.
///
/// The generation changes on every rebuild, so a handle kept across a rebuild
/// no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowerHandle {
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisualState {
    #[default]
    Full,
    Empty,
}

/// World-space pose of a flower, cached from the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowerPose {
    /// Position of the flower node itself.
    pub position: Vec3,
    /// Centre of the nectar region, or the flower position when unbound.
    pub center: Vec3,
    /// Unit vector pointing straight out of the flower.
    pub up: Vec3,
}

impl Default for FlowerPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            center: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

/// A single flower with a depletable amount of nectar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flower {
    pub node: NodeId,
    pub name: String,
    /// Fraction of nectar remaining, always within `[0, 1]`.
    pub nectar: f32,
    /// Trigger region granting access to the nectar.
    pub nectar_region: Option<RegionId>,
    /// Solid region representing the petals.
    pub petal_region: Option<RegionId>,
    /// Whether both regions currently take part in collision queries.
    pub regions_active: bool,
    pub visual: VisualState,
    pub pose: FlowerPose,
}

impl Flower {
    pub fn new(node: NodeId, name: impl Into<String>) -> Self {
        Self {
            node,
            name: name.into(),
            nectar: 1.0,
            nectar_region: None,
            petal_region: None,
            regions_active: true,
            visual: VisualState::Full,
            pose: FlowerPose::default(),
        }
    }
}
