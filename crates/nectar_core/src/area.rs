//! A flower area: one scene graph plus the index built from it.

use crate::config::AreaConfig;
use crate::index::{FlowerIndex, RebuildReport};
use glam::Vec3;
use nectar_data::{Flower, FlowerHandle, RegionId, SceneGraph};
use rand::Rng;

/// Bounded region owning its scene and the flowers discovered in it.
///
/// Lifecycle is two-phase: [`construct`](Self::construct) takes ownership of
/// the scene without touching it, [`bind_references`](Self::bind_references)
/// builds the index. Queries before binding see an empty index.
#[derive(Debug, Clone)]
pub struct FlowerArea {
    pub scene: SceneGraph,
    pub index: FlowerIndex,
    pub diameter: f32,
    plant_tilt: f32,
    plant_yaw: f32,
}

impl FlowerArea {
    pub fn construct(scene: SceneGraph, config: &AreaConfig) -> Self {
        Self {
            scene,
            index: FlowerIndex::new(),
            diameter: config.diameter,
            plant_tilt: config.plant_tilt,
            plant_yaw: config.plant_yaw,
        }
    }

    /// Builds (or rebuilds) the flower index from the owned scene.
    pub fn bind_references(&mut self) -> RebuildReport {
        self.index.rebuild(&mut self.scene)
    }

    /// Retilts all plants and refills all flowers.
    pub fn reset_flowers<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.index
            .reset_all(&mut self.scene, self.plant_tilt, self.plant_yaw, rng);
    }

    pub fn flower_from_nectar(&self, region: RegionId) -> Option<&Flower> {
        self.index.lookup(region)
    }

    pub fn flower(&self, handle: FlowerHandle) -> Option<&Flower> {
        self.index.get(handle)
    }

    pub fn flower_mut(&mut self, handle: FlowerHandle) -> Option<&mut Flower> {
        self.index.get_mut(handle)
    }

    /// World position of the area root; free spawns orbit this point.
    pub fn origin(&self) -> Vec3 {
        self.scene.world_transform(self.scene.root()).position
    }
}
