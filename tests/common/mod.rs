pub mod macros;

use glam::{Quat, Vec3};
use nectar_lib::model::config::AppConfig;
use nectar_lib::model::env::ForagingEnv;
use nectar_lib::model::state::{
    FlowerComponent, NodeId, NodeKind, RegionId, RegionShape, SceneGraph, Transform,
    BOUNDARY_TAG, FLOWER_PLANT_TAG, NECTAR_TAG,
};

pub const NECTAR_RADIUS: f32 = 0.02;
pub const PETAL_RADIUS: f32 = 0.03;

/// Builds flower areas for tests.
///
/// Flowers are added under the most recent plant, or under the root before
/// the first `plant` call.
#[allow(dead_code)]
pub struct SceneBuilder {
    scene: SceneGraph,
    config: AppConfig,
    parent: NodeId,
    flowers: Vec<NodeId>,
}

#[allow(dead_code)]
impl SceneBuilder {
    pub fn new() -> Self {
        let scene = SceneGraph::new("FlowerArea", Transform::IDENTITY);
        let parent = scene.root();
        let mut config = AppConfig::default();
        config.sim.seed = Some(0);
        Self {
            scene,
            config,
            parent,
            flowers: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.sim.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn training(self, training: bool) -> Self {
        self.with_config(|c| c.agent.training_mode = training)
    }

    /// Starts a new plant group at `position`.
    pub fn plant(mut self, position: Vec3) -> Self {
        let plant = self.scene.add_node(
            self.scene.root(),
            "Plant",
            Transform::from_position(position),
        );
        self.scene.node_mut(plant).unwrap().tag = Some(FLOWER_PLANT_TAG.into());
        self.parent = plant;
        self
    }

    /// Adds a flower opening along `up`, with petals and a tagged nectar region.
    pub fn flower(mut self, position: Vec3, up: Vec3) -> Self {
        let node = self.bare_flower(position, up);
        self.scene
            .add_region(node, "FlowerCollider", None, false, RegionShape::Sphere { radius: PETAL_RADIUS });
        let nectar = self.scene.add_node(node, "FlowerNectar", Transform::IDENTITY);
        self.scene.add_region(
            nectar,
            "FlowerNectarCollider",
            Some(NECTAR_TAG),
            true,
            RegionShape::Sphere {
                radius: NECTAR_RADIUS,
            },
        );
        self
    }

    /// Adds a flower whose regions are attached by `regions`.
    pub fn flower_with<F>(mut self, position: Vec3, regions: F) -> Self
    where
        F: FnOnce(&mut SceneGraph, NodeId),
    {
        let node = self.bare_flower(position, Vec3::Y);
        regions(&mut self.scene, node);
        self
    }

    fn bare_flower(&mut self, position: Vec3, up: Vec3) -> NodeId {
        let rotation = Quat::from_rotation_arc(Vec3::Y, up.normalize());
        let node = self
            .scene
            .add_node(self.parent, "Flower", Transform::new(position, rotation));
        self.scene.node_mut(node).unwrap().kind = NodeKind::Flower(FlowerComponent::default());
        self.flowers.push(node);
        node
    }

    /// Adds a solid obstacle.
    pub fn rock(mut self, position: Vec3, radius: f32) -> Self {
        let rock = self
            .scene
            .add_node(self.scene.root(), "Rock", Transform::from_position(position));
        self.scene
            .add_region(rock, "RockCollider", None, false, RegionShape::Sphere { radius });
        self
    }

    pub fn wall(mut self, position: Vec3, half_extents: Vec3) -> Self {
        let wall = self
            .scene
            .add_node(self.scene.root(), "Wall", Transform::from_position(position));
        self.scene.add_region(
            wall,
            "WallCollider",
            Some(BOUNDARY_TAG),
            false,
            RegionShape::Box { half_extents },
        );
        self
    }

    pub fn flower_nodes(&self) -> &[NodeId] {
        &self.flowers
    }

    pub fn build_scene(self) -> SceneGraph {
        self.scene
    }

    pub fn build(self) -> ForagingEnv {
        ForagingEnv::new(self.scene, self.config).expect("test config is valid")
    }
}

/// Nectar region of the `i`-th indexed flower.
#[allow(dead_code)]
pub fn nectar_region(env: &ForagingEnv, i: usize) -> RegionId {
    env.area.index.flowers()[i]
        .nectar_region
        .expect("flower has no nectar region")
}

/// Moves the agent so its beak tip sits at `tip`, keeping the current rotation.
#[allow(dead_code)]
pub fn place_beak_at(env: &mut ForagingEnv, tip: Vec3) {
    let offset = env.agent.beak_tip() - env.agent.body.position;
    env.agent.body.position = tip - offset;
}
