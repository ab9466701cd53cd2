//! Procedural demo scene: a walled meadow with a few flowering plants.

use glam::{Quat, Vec3};
use nectar_core::spawn::euler_degrees;
use nectar_data::{
    FlowerComponent, NodeId, NodeKind, RegionShape, SceneGraph, Transform, BOUNDARY_TAG,
    FLOWER_PLANT_TAG, NECTAR_TAG,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MeadowConfig {
    pub diameter: f32,
    pub plants: usize,
    pub flowers_per_plant: usize,
    pub wall_height: f32,
}

impl Default for MeadowConfig {
    fn default() -> Self {
        Self {
            diameter: 20.0,
            plants: 6,
            flowers_per_plant: 3,
            wall_height: 6.0,
        }
    }
}

const PETAL_RADIUS: f32 = 0.03;
const NECTAR_RADIUS: f32 = 0.02;

fn add_flower(scene: &mut SceneGraph, parent: NodeId, local: Transform) -> NodeId {
    let flower = scene.add_node(parent, "Flower", local);
    if let Some(node) = scene.node_mut(flower) {
        node.kind = NodeKind::Flower(FlowerComponent::default());
    }
    scene.add_region(
        flower,
        "FlowerCollider",
        None,
        false,
        RegionShape::Sphere {
            radius: PETAL_RADIUS,
        },
    );
    let nectar = scene.add_node(
        flower,
        "FlowerNectar",
        Transform::from_position(Vec3::new(0.0, 0.02, 0.0)),
    );
    scene.add_region(
        nectar,
        "FlowerNectarCollider",
        Some(NECTAR_TAG),
        true,
        RegionShape::Sphere {
            radius: NECTAR_RADIUS,
        },
    );
    flower
}

fn add_walls(scene: &mut SceneGraph, config: &MeadowConfig) {
    let half = config.diameter / 2.0;
    let h = config.wall_height / 2.0;
    let walls = scene.add_node(scene.root(), "Walls", Transform::IDENTITY);
    let sides = [
        (Vec3::new(half, h, 0.0), Vec3::new(0.25, h, half)),
        (Vec3::new(-half, h, 0.0), Vec3::new(0.25, h, half)),
        (Vec3::new(0.0, h, half), Vec3::new(half, h, 0.25)),
        (Vec3::new(0.0, h, -half), Vec3::new(half, h, 0.25)),
        (Vec3::new(0.0, config.wall_height, 0.0), Vec3::new(half, 0.25, half)),
    ];
    for (i, (position, half_extents)) in sides.into_iter().enumerate() {
        let wall = scene.add_node(walls, format!("Wall{i}"), Transform::from_position(position));
        scene.add_region(
            wall,
            "WallCollider",
            Some(BOUNDARY_TAG),
            false,
            RegionShape::Box { half_extents },
        );
    }

    let ground = scene.add_node(
        scene.root(),
        "Ground",
        Transform::from_position(Vec3::new(0.0, -0.25, 0.0)),
    );
    scene.add_region(
        ground,
        "GroundCollider",
        None,
        false,
        RegionShape::Box {
            half_extents: Vec3::new(half, 0.25, half),
        },
    );
}

/// Builds a meadow scene. Plant placement is drawn from `rng`.
pub fn build_meadow<R: Rng + ?Sized>(config: &MeadowConfig, rng: &mut R) -> SceneGraph {
    let mut scene = SceneGraph::new("FlowerArea", Transform::IDENTITY);
    add_walls(&mut scene, config);

    let plants = scene.add_node(scene.root(), "Plants", Transform::IDENTITY);
    let reach = (config.diameter / 2.0 - 2.0).max(0.5);
    for p in 0..config.plants {
        let position = Vec3::new(
            rng.gen_range(-reach..=reach),
            0.0,
            rng.gen_range(-reach..=reach),
        );
        let plant = scene.add_node(plants, format!("Plant{p}"), Transform::from_position(position));
        if let Some(node) = scene.node_mut(plant) {
            node.tag = Some(FLOWER_PLANT_TAG.to_string());
        }

        for f in 0..config.flowers_per_plant {
            let height = rng.gen_range(0.8..=1.6);
            let around = f as f32 / config.flowers_per_plant.max(1) as f32 * 360.0;
            let tilt = rng.gen_range(30.0..=70.0);
            let rotation: Quat = euler_degrees(0.0, around, 0.0) * euler_degrees(tilt, 0.0, 0.0);
            let offset = rotation * Vec3::Y * 0.3;
            add_flower(
                &mut scene,
                plant,
                Transform::new(Vec3::new(offset.x, height, offset.z), rotation),
            );
        }
    }
    scene
}
