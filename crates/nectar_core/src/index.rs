//! Flower discovery and nectar-region lookup.
//!
//! The index walks a flower area's scene graph, collects plant groups and
//! flowers, and binds each flower to the region that grants access to its
//! nectar. Lookups from a region handle to its flower are O(1).
//!
//! Binding is forgiving: a flower without any usable region is still indexed
//! (so it counts for nearest-flower tracking) but is left out of the region
//! lookup, and a region claimed by two flowers stays with the first.

use crate::error::NectarError;
use crate::flower::FlowerLogic;
use crate::region::{resolve_nectar_region, resolve_petal_region};
use glam::{EulerRot, Quat};
use nectar_data::{
    Flower, FlowerHandle, FlowerPose, NodeId, RegionId, SceneGraph, FLOWER_PLANT_TAG,
};
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Summary of a single [`FlowerIndex::rebuild`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebuildReport {
    pub plants: usize,
    pub flowers: usize,
    /// Number of flowers reachable through the region lookup.
    pub bound: usize,
    /// Binding failures and duplicates, in traversal order.
    pub issues: Vec<NectarError>,
}

impl RebuildReport {
    pub fn missing_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|e| matches!(e, NectarError::MissingNectarRegion { .. }))
            .count()
    }

    pub fn duplicate_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|e| matches!(e, NectarError::DuplicateNectarRegion { .. }))
            .count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlowerIndex {
    generation: u32,
    flowers: Vec<Flower>,
    plants: Vec<NodeId>,
    plant_set: HashSet<NodeId>,
    flower_slots: HashMap<NodeId, u32>,
    nectar_lookup: HashMap<RegionId, u32>,
    petal_owners: HashMap<RegionId, u32>,
}

impl FlowerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the index and rediscovers every plant and flower under the scene root.
    ///
    /// Nectar left in flowers that are still present is kept. Resolved nectar
    /// regions are written back onto the scene's flower components.
    pub fn rebuild(&mut self, scene: &mut SceneGraph) -> RebuildReport {
        let mut previous: HashMap<NodeId, Flower> =
            self.flowers.drain(..).map(|f| (f.node, f)).collect();
        self.plants.clear();
        self.plant_set.clear();
        self.flower_slots.clear();
        self.nectar_lookup.clear();
        self.petal_owners.clear();
        self.generation = self.generation.wrapping_add(1);

        let mut report = RebuildReport::default();
        let root = scene.root();
        self.visit_children(scene, root, &mut previous, &mut report);
        self.refresh_poses(scene);

        report.plants = self.plants.len();
        report.flowers = self.flowers.len();
        report.bound = self.nectar_lookup.len();
        tracing::info!(
            flowers = report.flowers,
            nectar_regions = report.bound,
            plants = report.plants,
            "Flower index rebuilt"
        );
        report
    }

    fn visit_children(
        &mut self,
        scene: &mut SceneGraph,
        parent: NodeId,
        previous: &mut HashMap<NodeId, Flower>,
        report: &mut RebuildReport,
    ) {
        let children = scene.children(parent).to_vec();
        for child in children {
            let Some(node) = scene.node(child) else {
                continue;
            };

            if node.has_tag(FLOWER_PLANT_TAG) {
                if self.plant_set.insert(child) {
                    self.plants.push(child);
                }
                self.visit_children(scene, child, previous, report);
            } else if node.flower().is_some() {
                self.index_flower(scene, child, previous, report);
            } else {
                self.visit_children(scene, child, previous, report);
            }
        }
    }

    fn index_flower(
        &mut self,
        scene: &mut SceneGraph,
        node: NodeId,
        previous: &mut HashMap<NodeId, Flower>,
        report: &mut RebuildReport,
    ) {
        let slot = match self.flower_slots.get(&node) {
            Some(&slot) => slot,
            None => {
                let name = scene.node(node).map(|n| n.name.clone()).unwrap_or_default();
                let mut flower = Flower::new(node, name);
                if let Some(old) = previous.remove(&node) {
                    flower.nectar = old.nectar;
                    flower.regions_active = old.regions_active;
                    flower.visual = old.visual;
                }
                let slot = self.flowers.len() as u32;
                self.flowers.push(flower);
                self.flower_slots.insert(node, slot);
                slot
            }
        };

        if let Some(petals) = resolve_petal_region(scene, node) {
            self.flowers[slot as usize].petal_region = Some(petals);
            self.petal_owners.entry(petals).or_insert(slot);
        }

        let Some((region, source)) = resolve_nectar_region(scene, node) else {
            let err = NectarError::MissingNectarRegion {
                flower: self.flowers[slot as usize].name.clone(),
                node,
            };
            tracing::error!("{}", err);
            report.issues.push(err);
            return;
        };

        tracing::debug!(?node, ?region, ?source, "Nectar region resolved");
        if let Some(component) = scene.node_mut(node).and_then(|n| n.flower_mut()) {
            component.nectar_region = Some(region);
        }
        self.flowers[slot as usize].nectar_region = Some(region);

        match self.nectar_lookup.get(&region) {
            Some(&owner) if owner != slot => {
                let err = NectarError::DuplicateNectarRegion {
                    region,
                    flower: self.flowers[slot as usize].name.clone(),
                    existing: self.flowers[owner as usize].name.clone(),
                };
                tracing::warn!("{}. Skipping.", err);
                report.issues.push(err);
            }
            Some(_) => {}
            None => {
                self.nectar_lookup.insert(region, slot);
            }
        }
    }

    /// Recomputes every flower's cached world pose from the scene.
    pub fn refresh_poses(&mut self, scene: &SceneGraph) {
        for flower in &mut self.flowers {
            let own = scene.world_transform(flower.node);
            let nectar = flower
                .nectar_region
                .and_then(|r| scene.region_transform(r))
                .unwrap_or(own);
            flower.pose = FlowerPose {
                position: own.position,
                center: nectar.position,
                up: nectar.up().normalize_or_zero(),
            };
        }
    }

    /// Randomly tilts every plant and refills every flower.
    ///
    /// Plants get a pitch and roll within `±max_tilt` and a yaw within
    /// `±max_yaw` degrees.
    pub fn reset_all<R: Rng + ?Sized>(
        &mut self,
        scene: &mut SceneGraph,
        max_tilt: f32,
        max_yaw: f32,
        rng: &mut R,
    ) {
        for &plant in &self.plants {
            let pitch = rng.gen_range(-max_tilt..=max_tilt);
            let yaw = rng.gen_range(-max_yaw..=max_yaw);
            let roll = rng.gen_range(-max_tilt..=max_tilt);
            if let Some(node) = scene.node_mut(plant) {
                node.local.rotation = Quat::from_euler(
                    EulerRot::YXZ,
                    yaw.to_radians(),
                    pitch.to_radians(),
                    roll.to_radians(),
                );
            }
        }

        for flower in &mut self.flowers {
            flower.reset();
        }
        self.refresh_poses(scene);
    }

    /// Flower owning the nectar region `region`, if it is indexed.
    pub fn lookup(&self, region: RegionId) -> Option<&Flower> {
        self.nectar_lookup
            .get(&region)
            .map(|&index| &self.flowers[index as usize])
    }

    /// Like [`lookup`](Self::lookup), returning a handle valid until the next rebuild.
    pub fn handle_for(&self, region: RegionId) -> Option<FlowerHandle> {
        self.nectar_lookup
            .get(&region)
            .map(|&index| self.handle(index))
    }

    pub fn get(&self, handle: FlowerHandle) -> Option<&Flower> {
        if handle.generation != self.generation {
            return None;
        }
        self.flowers.get(handle.index as usize)
    }

    pub fn get_mut(&mut self, handle: FlowerHandle) -> Option<&mut Flower> {
        if handle.generation != self.generation {
            return None;
        }
        self.flowers.get_mut(handle.index as usize)
    }

    fn handle(&self, index: u32) -> FlowerHandle {
        FlowerHandle {
            index,
            generation: self.generation,
        }
    }

    /// Handles of all indexed flowers in discovery order.
    pub fn handles(&self) -> impl Iterator<Item = FlowerHandle> + '_ {
        (0..self.flowers.len() as u32).map(|i| self.handle(i))
    }

    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    pub fn plants(&self) -> &[NodeId] {
        &self.plants
    }

    /// Region keys of the nectar lookup with their flower nodes, sorted by region.
    pub fn bindings(&self) -> Vec<(RegionId, NodeId)> {
        let mut out: Vec<_> = self
            .nectar_lookup
            .iter()
            .map(|(&region, &slot)| (region, self.flowers[slot as usize].node))
            .collect();
        out.sort();
        out
    }

    pub fn len(&self) -> usize {
        self.flowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flowers.is_empty()
    }

    /// Whether `region` currently takes part in collision queries.
    ///
    /// Regions of an emptied flower are inactive; unknown regions are always active.
    pub fn is_region_active(&self, region: RegionId) -> bool {
        let owner = self
            .nectar_lookup
            .get(&region)
            .or_else(|| self.petal_owners.get(&region))
            .copied();
        owner.map_or(true, |slot| self.flowers[slot as usize].regions_active)
    }
}
