//! Nectar and petal region resolution.
//!
//! Both the runtime index and the offline auto-wire pass go through
//! [`resolve_nectar_region`], so authoring-time and runtime bindings can never
//! disagree.

use crate::error::{NectarError, Result};
use nectar_data::{NodeId, RegionId, SceneGraph, NECTAR_TAG};

/// Child region name used for the solid petals of a flower.
pub const PETAL_REGION_NAME: &str = "FlowerCollider";

/// Which rule of the fallback chain produced a nectar binding, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BindingSource {
    /// Region already bound on the flower component.
    Existing,
    /// Descendant region tagged `nectar`.
    NectarTag,
    /// Descendant region whose name contains `nectar`.
    NectarName,
    /// Any descendant trigger region.
    Trigger,
    /// Any descendant region at all.
    AnyRegion,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Resolves the nectar region of the flower on `node`.
///
/// Returns `None` when `node` carries no flower or none of the rules match.
pub fn resolve_nectar_region(scene: &SceneGraph, node: NodeId) -> Option<(RegionId, BindingSource)> {
    let component = scene.node(node)?.flower()?;
    if let Some(bound) = component.nectar_region {
        if scene.region(bound).is_some() {
            return Some((bound, BindingSource::Existing));
        }
    }
    resolve_from_descendants(scene, node)
}

/// The descendant-search part of the chain, ignoring any existing binding.
pub fn resolve_from_descendants(scene: &SceneGraph, node: NodeId) -> Option<(RegionId, BindingSource)> {
    let candidates: Vec<_> = scene
        .descendant_regions(node)
        .into_iter()
        .filter_map(|id| scene.region(id))
        .collect();

    candidates
        .iter()
        .find(|r| r.has_tag(NECTAR_TAG))
        .map(|r| (r.id, BindingSource::NectarTag))
        .or_else(|| {
            candidates
                .iter()
                .find(|r| contains_ignore_case(&r.name, NECTAR_TAG))
                .map(|r| (r.id, BindingSource::NectarName))
        })
        .or_else(|| {
            candidates
                .iter()
                .find(|r| r.is_trigger)
                .map(|r| (r.id, BindingSource::Trigger))
        })
        .or_else(|| candidates.first().map(|r| (r.id, BindingSource::AnyRegion)))
}

/// Resolves the solid petal region: a region named `FlowerCollider`, else the
/// first non-trigger descendant region.
pub fn resolve_petal_region(scene: &SceneGraph, node: NodeId) -> Option<RegionId> {
    let candidates: Vec<_> = scene
        .descendant_regions(node)
        .into_iter()
        .filter_map(|id| scene.region(id))
        .collect();

    candidates
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(PETAL_REGION_NAME))
        .or_else(|| candidates.iter().find(|r| !r.is_trigger))
        .map(|r| r.id)
}

/// Resolves and persists the nectar region of a single flower node.
pub fn bind_nectar_region(scene: &mut SceneGraph, node: NodeId) -> Result<(RegionId, BindingSource)> {
    let name = scene
        .node(node)
        .ok_or(NectarError::UnknownNode(node))?
        .name
        .clone();
    let (region, source) =
        resolve_nectar_region(scene, node).ok_or(NectarError::MissingNectarRegion {
            flower: name,
            node,
        })?;
    if let Some(component) = scene.node_mut(node).and_then(|n| n.flower_mut()) {
        component.nectar_region = Some(region);
    }
    Ok((region, source))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutowireReport {
    pub fixed: usize,
    pub missing: Vec<NodeId>,
}

/// Binds a nectar region onto every flower component that lacks one.
///
/// Flowers that are already bound to an existing region are left alone.
pub fn autowire(scene: &mut SceneGraph) -> AutowireReport {
    let mut report = AutowireReport::default();

    for node in scene.flower_nodes() {
        let already_bound = scene
            .node(node)
            .and_then(|n| n.flower())
            .and_then(|f| f.nectar_region)
            .is_some_and(|r| scene.region(r).is_some());
        if already_bound {
            continue;
        }

        match bind_nectar_region(scene, node) {
            Ok(_) => report.fixed += 1,
            Err(e) => {
                tracing::error!("{}", e);
                report.missing.push(node);
            }
        }
    }

    tracing::info!(
        fixed = report.fixed,
        missing = report.missing.len(),
        "Auto-wire complete"
    );
    report
}
