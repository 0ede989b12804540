//! The layout pass
//!
//! [`layout`] runs every phase over the tree under a root, in order:
//!
//! 1. Reset per-render node and context state, then register names, keys
//!    and data colours.
//! 2. Resolve every Ref to its target.
//! 3. Resolve underlying spaces, children (and Ref targets) first.
//! 4. Infer size domains in the same order.
//! 5. Build position scales for the root's continuous axes and lay out from
//!    the root with the configured pixel budget.
//! 6. Place the root and give every still-unplaced axis a zero translation.
//! 7. Derive ordinal scales for the root's categorical axes.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use super::context::{LayoutWarning, RenderContext};
use super::dims::Interval;
use super::domain::PosScale;
use super::error::LayoutError;
use super::monotonic::Monotonic;
use super::node::{Fill, NodeId, Phase, SceneGraph};
use super::operator::{DomainCx, LayoutCx, LayoutOperator, LayoutRequest, Operator, SpaceCx};
use super::operators::RefTarget;
use super::space::UnderlyingSpace;
use super::types::{Axis, BoundingBox, Size};

/// Key-to-pixel lookup for a categorical axis, in registration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrdinalScale {
    entries: Vec<(String, f64)>,
}

impl OrdinalScale {
    /// Pixel center of the node registered under `key`
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What a layout pass reports about the root
#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub root: NodeId,
    /// Root extent in the output frame
    pub bounds: BoundingBox,
    pub spaces: Size<UnderlyingSpace>,
    pub pos_scales: Size<Option<PosScale>>,
    pub ordinal_scales: Size<Option<OrdinalScale>>,
    pub warnings: Vec<LayoutWarning>,
}

/// Run the full layout pass over the tree under `root`
pub fn layout(graph: &mut SceneGraph, context: &mut RenderContext, root: NodeId) -> Result<LayoutResult, LayoutError> {
    let nodes = graph.descendants(root)?;
    debug!(root = %root, nodes = nodes.len(), "layout pass");
    context.begin_pass();

    let mut keyed = Vec::new();
    for &id in &nodes {
        let node = graph.node_mut(id)?;
        node.reset();
        let (name, key, fill) = (node.name.clone(), node.key.clone(), node.fill.clone());
        if let Some(name) = name {
            context.register_name(&name, id);
        }
        if let Some(key) = key {
            context.register_key(&key, id);
            keyed.push((key, id));
        }
        if let Some(Fill::Data(value)) = fill {
            context.register_color(&value);
        }
    }

    resolve_refs(graph, context, &nodes)?;

    let mut visiting = BTreeSet::new();
    resolve_space(graph, context, root, &mut visiting)?;
    debug!("underlying spaces resolved");

    visiting.clear();
    resolve_domains(graph, context, root, &mut visiting)?;
    debug!("size domains inferred");

    let spaces = graph
        .node(root)?
        .space
        .clone()
        .ok_or_else(|| LayoutError::not_laid_out(root, Phase::Constructed))?;
    let budget = [context.config.width, context.config.height];
    let pos_scales: Size<Option<PosScale>> =
        Axis::ALL.map(|axis| spaces[axis.index()].domain().map(|d| PosScale::new(d, budget[axis.index()], false)));

    let request = LayoutRequest::new(budget).with_pos_scales(pos_scales);
    layout_node(graph, context, root, request)?;
    let origin = context.config.origin;
    graph.place(root, Axis::X, origin.x)?;
    graph.place(root, Axis::Y, origin.y)?;

    for &id in &nodes {
        let node = graph.node_mut(id)?;
        for slot in node.transform.translate.iter_mut() {
            slot.get_or_insert(0.0);
        }
        node.phase = Phase::Placed;
    }
    debug!("placed");

    let mut ordinal_scales: Size<Option<OrdinalScale>> = [None, None];
    for axis in Axis::ALL {
        let i = axis.index();
        if !spaces[i].is_ordinal() {
            continue;
        }
        let mut entries = Vec::with_capacity(keyed.len());
        for (key, id) in &keyed {
            let offset = graph.accumulated_translate(*id, None)?;
            let intrinsic = graph.intrinsic_dims(*id)?[i];
            let center = (intrinsic.min.unwrap_or(0.0) + intrinsic.max.unwrap_or(0.0)) / 2.0;
            entries.push((key.clone(), offset[i] + center));
        }
        ordinal_scales[i] = Some(OrdinalScale { entries });
    }

    let dims = graph.resolved_dims(root)?;
    let span = |i: usize| (dims[i].min.unwrap_or(0.0), dims[i].max.unwrap_or(0.0));
    let ((x0, x1), (y0, y1)) = (span(0), span(1));

    Ok(LayoutResult {
        root,
        bounds: BoundingBox::new(x0, y0, x1 - x0, y1 - y0),
        spaces,
        pos_scales,
        ordinal_scales,
        warnings: context.warnings().to_vec(),
    })
}

fn resolve_refs(graph: &SceneGraph, context: &mut RenderContext, nodes: &[NodeId]) -> Result<(), LayoutError> {
    for &id in nodes {
        let Operator::Ref(reference) = graph.node(id)?.operator() else {
            continue;
        };
        let target = match &reference.target {
            RefTarget::Name(name) => context.lookup(name)?,
            RefTarget::Node(target) => {
                graph.node(*target)?;
                *target
            }
        };
        trace!(node = %id, target = %target, "ref resolved");
        context.set_ref_target(id, target);
    }
    Ok(())
}

/// Error for a Ref whose target is still being resolved
fn cyclic(graph: &SceneGraph, id: NodeId) -> LayoutError {
    let name = match graph.node(id).map(|n| n.operator()) {
        Ok(Operator::Ref(reference)) => reference.target.to_string(),
        _ => id.to_string(),
    };
    LayoutError::CyclicReference { name }
}

fn resolve_space(
    graph: &mut SceneGraph,
    context: &RenderContext,
    id: NodeId,
    visiting: &mut BTreeSet<NodeId>,
) -> Result<(), LayoutError> {
    if graph.node(id)?.space.is_some() {
        return Ok(());
    }
    visiting.insert(id);

    let children = graph.children(id)?.to_vec();
    for &child in &children {
        resolve_space(graph, context, child, visiting)?;
    }
    let target = context.ref_target(id);
    if let Some(target) = target {
        if visiting.contains(&target) {
            return Err(cyclic(graph, id));
        }
        resolve_space(graph, context, target, visiting)?;
    }

    let space = {
        let mut child_spaces = Vec::with_capacity(children.len());
        let mut keys = Vec::new();
        for &child in &children {
            let node = graph.node(child)?;
            child_spaces.push(resolved(node.space.as_ref(), child, node.phase)?);
            if let Some(key) = &node.key {
                keys.push(key.clone());
            }
        }
        let target_space = match target {
            Some(t) => graph.node(t)?.space.as_ref(),
            None => None,
        };
        let cx = SpaceCx {
            children: child_spaces,
            keys,
            target: target_space,
        };
        graph.node(id)?.operator().resolve_underlying_space(&cx)
    };
    trace!(node = %id, x = space[0].kind(), y = space[1].kind(), "space");

    let node = graph.node_mut(id)?;
    node.space = Some(space);
    node.phase = Phase::SpaceResolved;
    visiting.remove(&id);
    Ok(())
}

fn resolve_domains(
    graph: &mut SceneGraph,
    context: &RenderContext,
    id: NodeId,
    visiting: &mut BTreeSet<NodeId>,
) -> Result<(), LayoutError> {
    if graph.node(id)?.size_domains.is_some() {
        return Ok(());
    }
    visiting.insert(id);

    let children = graph.children(id)?.to_vec();
    for &child in &children {
        resolve_domains(graph, context, child, visiting)?;
    }
    let target = context.ref_target(id);
    if let Some(target) = target {
        if visiting.contains(&target) {
            return Err(cyclic(graph, id));
        }
        resolve_domains(graph, context, target, visiting)?;
    }

    let domains: Size<Monotonic> = {
        let mut child_domains = Vec::with_capacity(children.len());
        for &child in &children {
            let node = graph.node(child)?;
            child_domains.push(resolved(node.size_domains.as_ref(), child, node.phase)?);
        }
        let target_domains = match target {
            Some(t) => graph.node(t)?.size_domains.as_ref(),
            None => None,
        };
        let cx = DomainCx {
            children: child_domains,
            target: target_domains,
        };
        graph.node(id)?.operator().infer_size_domains(&cx)
    };

    let node = graph.node_mut(id)?;
    node.size_domains = Some(domains);
    node.phase = Phase::SizeDomainResolved;
    visiting.remove(&id);
    Ok(())
}

fn resolved<T>(value: Option<&T>, id: NodeId, phase: Phase) -> Result<&T, LayoutError> {
    value.ok_or_else(|| LayoutError::not_laid_out(id, phase))
}

/// Lay out one node and record what it reports
pub(crate) fn layout_node(
    graph: &mut SceneGraph,
    context: &mut RenderContext,
    id: NodeId,
    request: LayoutRequest,
) -> Result<(), LayoutError> {
    let operator = graph.node(id)?.operator().clone();
    trace!(
        node = %id,
        operator = operator.kind(),
        size = ?request.size,
        scale_factors = ?request.scale_factors,
        "layout"
    );

    let output = {
        let mut cx = LayoutCx {
            graph: &mut *graph,
            context: &mut *context,
            node: id,
            shared: operator.shared(),
        };
        operator.layout(&mut cx, request)?
    };

    let node = graph.node_mut(id)?;
    node.intrinsic = output.intrinsic.map(|d| d.elaborate());
    node.transform.translate = output.translate;
    node.transform.scale = output.scale;
    node.render_data = output.render_data;
    node.phase = Phase::LaidOut;
    Ok(())
}

/// Continuous domain of a root axis, if it has one
pub fn root_domain(result: &LayoutResult, axis: Axis) -> Option<Interval> {
    result.spaces[axis.index()].domain()
}
