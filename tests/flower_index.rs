mod common;

use common::SceneBuilder;
use glam::Vec3;
use nectar_lib::model::index::FlowerIndex;
use nectar_lib::model::region::{autowire, resolve_nectar_region, BindingSource};
use nectar_lib::model::state::{RegionShape, SceneGraph};
use nectar_lib::model::error::NectarError;

const SPHERE: RegionShape = RegionShape::Sphere { radius: 0.02 };

fn meadow() -> SceneGraph {
    SceneBuilder::new()
        .plant(Vec3::new(1.0, 0.0, 1.0))
        .flower(Vec3::new(0.0, 1.0, 0.0), Vec3::Y)
        .flower(Vec3::new(0.2, 1.2, 0.0), Vec3::X)
        .plant(Vec3::new(-2.0, 0.0, 3.0))
        .flower(Vec3::new(0.0, 1.5, 0.0), Vec3::Z)
        .rock(Vec3::new(4.0, 0.5, 4.0), 0.5)
        .build_scene()
}

#[test]
fn test_rebuild_is_idempotent() {
    let mut scene = meadow();
    let mut index = FlowerIndex::new();

    let first = index.rebuild(&mut scene);
    let flowers = index.flowers().to_vec();
    let bindings = index.bindings();
    let plants = index.plants().to_vec();

    let second = index.rebuild(&mut scene);
    assert_eq!(first, second);
    assert_eq!(index.flowers(), flowers.as_slice());
    assert_eq!(index.bindings(), bindings);
    assert_eq!(index.plants(), plants.as_slice());
    assert_eq!(second.flowers, 3);
    assert_eq!(second.plants, 2);
}

#[test]
fn test_fresh_index_matches_rebuilt_index() {
    let mut scene = meadow();
    let mut a = FlowerIndex::new();
    a.rebuild(&mut scene);
    a.rebuild(&mut scene);

    let mut b = FlowerIndex::new();
    b.rebuild(&mut scene);
    assert_eq!(a.bindings(), b.bindings());
}

#[test]
fn test_many_colliding_bindings_keep_first() {
    // Five flowers pre-bound to the same shared region.
    let mut builder = SceneBuilder::new();
    for i in 0..5 {
        builder = builder.flower_with(Vec3::new(i as f32, 1.0, 0.0), |_, _| {});
    }
    let nodes = builder.flower_nodes().to_vec();
    let mut scene = builder.build_scene();
    let shared = scene.add_region(nodes[0], "Nectar", Some("nectar"), true, SPHERE);
    for &node in &nodes {
        scene.node_mut(node).unwrap().flower_mut().unwrap().nectar_region = Some(shared);
    }

    let mut index = FlowerIndex::new();
    let report = index.rebuild(&mut scene);

    assert_eq!(report.flowers, 5);
    assert_eq!(report.bound, 1);
    assert_eq!(report.duplicate_count(), 4);
    assert_eq!(index.lookup(shared).unwrap().node, nodes[0]);
    assert_eq!(index.bindings(), vec![(shared, nodes[0])]);
}

#[test]
fn test_region_priority_chain() {
    let mut named = None;
    let mut scene = SceneBuilder::new()
        .flower_with(Vec3::Y, |scene, node| {
            scene.add_region(node, "Stem", None, false, SPHERE);
            named = Some(scene.add_region(node, "TheNectarZone", None, false, SPHERE));
        })
        .build_scene();
    let flower = scene.flower_nodes()[0];
    let named = named.unwrap();

    assert_eq!(
        resolve_nectar_region(&scene, flower),
        Some((named, BindingSource::NectarName))
    );

    let tagged = scene.add_region(flower, "Blob", Some("Nectar"), false, SPHERE);
    assert_eq!(
        resolve_nectar_region(&scene, flower),
        Some((tagged, BindingSource::NectarTag))
    );

    let mut index = FlowerIndex::new();
    index.rebuild(&mut scene);
    assert_eq!(index.lookup(tagged).unwrap().node, flower);
    assert!(index.lookup(named).is_none());
}

#[test]
fn test_unbindable_flower_is_tracked_but_not_looked_up() {
    let mut scene = SceneBuilder::new()
        .flower_with(Vec3::Y, |_, _| {})
        .flower(Vec3::new(1.0, 1.0, 0.0), Vec3::Y)
        .build_scene();

    let mut index = FlowerIndex::new();
    let report = index.rebuild(&mut scene);

    assert_eq!(report.flowers, 2);
    assert_eq!(report.bound, 1);
    assert!(matches!(
        report.issues.as_slice(),
        [NectarError::MissingNectarRegion { .. }]
    ));
}

#[test]
fn test_autowire_agrees_with_rebuild() {
    let mut wired = meadow();
    let fixed = autowire(&mut wired);
    assert_eq!(fixed.fixed, 3);
    assert!(fixed.missing.is_empty());

    let mut plain = meadow();
    let mut a = FlowerIndex::new();
    let mut b = FlowerIndex::new();
    a.rebuild(&mut wired);
    b.rebuild(&mut plain);
    assert_eq!(a.bindings(), b.bindings());

    // Already-bound flowers are left alone.
    assert_eq!(autowire(&mut wired).fixed, 0);
}

#[test]
fn test_poses_follow_plant_tilt() {
    let mut env = SceneBuilder::new()
        .plant(Vec3::ZERO)
        .flower(Vec3::new(0.0, 1.0, 0.0), Vec3::Y)
        .build();
    let before = env.area.index.flowers()[0].pose;
    assert!((before.up - Vec3::Y).length() < 1e-5);

    env.begin_episode();
    let after = env.area.index.flowers()[0].pose;
    // Tilt is at most 5 degrees around each axis, so the flower still points mostly up.
    assert!(after.up.y > 0.98);
    assert!((after.position.length() - 1.0).abs() < 1e-4);
}
