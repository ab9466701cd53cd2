use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Tag marking a node that groups several flowers on one plant.
pub const FLOWER_PLANT_TAG: &str = "flower_plant";
/// Tag marking a region that holds nectar.
pub const NECTAR_TAG: &str = "nectar";
/// Tag marking the solid walls around a flower area.
pub const BOUNDARY_TAG: &str = "boundary";

/// Index of a node inside its [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Index of a collision region inside its [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u32);

/// Rigid transform without scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Composes `self` (parent) with a child-local transform.
    pub fn mul_transform(&self, local: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * local.position,
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Maps a world-space point into this transform's local frame.
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.position)
    }
}

/// Geometry of a collision region, centred on its owning node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RegionShape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

/// A collision volume attached to a scene node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub node: NodeId,
    pub name: String,
    pub tag: Option<String>,
    /// Pass-through region that reports contacts instead of blocking motion.
    pub is_trigger: bool,
    pub shape: RegionShape,
}

impl Region {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Flower data persisted on a scene node.
///
/// `nectar_region` is the only field written back by the index: once a region
/// has been resolved for this flower it is remembered across rebuilds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowerComponent {
    pub nectar_region: Option<RegionId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    #[default]
    Empty,
    Flower(FlowerComponent),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub tag: Option<String>,
    pub kind: NodeKind,
    pub local: Transform,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub regions: Vec<RegionId>,
}

impl SceneNode {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }

    pub fn flower(&self) -> Option<&FlowerComponent> {
        match &self.kind {
            NodeKind::Flower(f) => Some(f),
            NodeKind::Empty => None,
        }
    }

    pub fn flower_mut(&mut self) -> Option<&mut FlowerComponent> {
        match &mut self.kind {
            NodeKind::Flower(f) => Some(f),
            NodeKind::Empty => None,
        }
    }
}

/// Hierarchical scene owning all nodes and regions of one flower area.
///
/// Nodes live in an arena; node `0` is the root and is never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    regions: Vec<Region>,
}

impl SceneGraph {
    pub fn new(root_name: impl Into<String>, root: Transform) -> Self {
        Self {
            nodes: vec![SceneNode {
                id: NodeId(0),
                name: root_name.into(),
                tag: None,
                kind: NodeKind::Empty,
                local: root,
                parent: None,
                children: Vec::new(),
                regions: Vec::new(),
            }],
            regions: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a child node under `parent`. Panics if `parent` is not in this graph.
    pub fn add_node(&mut self, parent: NodeId, name: impl Into<String>, local: Transform) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes[parent.0 as usize].children.push(id);
        self.nodes.push(SceneNode {
            id,
            name: name.into(),
            tag: None,
            kind: NodeKind::Empty,
            local,
            parent: Some(parent),
            children: Vec::new(),
            regions: Vec::new(),
        });
        id
    }

    /// Attaches a region to `node`. Panics if `node` is not in this graph.
    pub fn add_region(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        tag: Option<&str>,
        is_trigger: bool,
        shape: RegionShape,
    ) -> RegionId {
        let id = RegionId(self.regions.len() as u32);
        self.regions.push(Region {
            id,
            node,
            name: name.into(),
            tag: tag.map(str::to_string),
            is_trigger,
            shape,
        });
        self.nodes[node.0 as usize].regions.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0 as usize)
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn world_transform(&self, id: NodeId) -> Transform {
        let Some(node) = self.node(id) else {
            return Transform::IDENTITY;
        };
        match node.parent {
            Some(parent) => self.world_transform(parent).mul_transform(&node.local),
            None => node.local,
        }
    }

    pub fn region_transform(&self, id: RegionId) -> Option<Transform> {
        self.region(id).map(|r| self.world_transform(r.node))
    }

    /// Regions on `id` and all of its descendants, in depth-first pre-order.
    pub fn descendant_regions(&self, id: NodeId) -> Vec<RegionId> {
        let mut out = Vec::new();
        self.collect_regions(id, &mut out);
        out
    }

    fn collect_regions(&self, id: NodeId, out: &mut Vec<RegionId>) {
        let Some(node) = self.node(id) else {
            return;
        };
        out.extend_from_slice(&node.regions);
        for &child in &node.children {
            self.collect_regions(child, out);
        }
    }

    /// Every node carrying a flower component, in arena order.
    pub fn flower_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Flower(_)))
            .map(|n| n.id)
            .collect()
    }
}
