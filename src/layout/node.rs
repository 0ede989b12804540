//! Scene graph arena
//!
//! Nodes live in a [`SceneGraph`] and refer to each other by [`NodeId`]. A
//! node's parent is set when it is attached and never reassigned, so parent
//! walks (used for least-common-ancestor lookups) are plain index chases.

use std::fmt;

use super::dims::{AxisDims, Dimensions, Transform};
use super::error::LayoutError;
use super::monotonic::Monotonic;
use super::operator::{Operator, RenderData};
use super::space::UnderlyingSpace;
use super::types::{Axis, Size};

/// Handle to a node in a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How far a node has progressed through the current render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Constructed,
    SpaceResolved,
    SizeDomainResolved,
    LaidOut,
    Placed,
    Rendered,
}

/// Fill colour of a node
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    /// Literal CSS colour
    Color(String),
    /// Categorical data value, mapped through the colour scale
    Data(String),
}

/// A node: an operator, its children and its per-render state
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) operator: Operator,
    pub(crate) name: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) fill: Option<Fill>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) phase: Phase,
    pub(crate) space: Option<Size<UnderlyingSpace>>,
    pub(crate) size_domains: Option<Size<Monotonic>>,
    pub(crate) intrinsic: Dimensions,
    pub(crate) transform: Transform,
    pub(crate) render_data: RenderData,
}

impl Node {
    pub fn new(operator: impl Into<Operator>) -> Self {
        Self {
            operator: operator.into(),
            name: None,
            key: None,
            fill: None,
            parent: None,
            children: Vec::new(),
            phase: Phase::Constructed,
            space: None,
            size_domains: None,
            intrinsic: Dimensions::default(),
            transform: Transform::identity(),
            render_data: RenderData::None,
        }
    }

    /// Register under `name` so Refs can find this node
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Label for ordinal axes
    pub fn keyed(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn filled(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn fill(&self) -> Option<&Fill> {
        self.fill.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn underlying_space(&self) -> Option<&Size<UnderlyingSpace>> {
        self.space.as_ref()
    }

    pub fn size_domains(&self) -> Option<&Size<Monotonic>> {
        self.size_domains.as_ref()
    }

    pub fn render_data(&self) -> &RenderData {
        &self.render_data
    }

    pub(crate) fn reset(&mut self) {
        self.phase = Phase::Constructed;
        self.space = None;
        self.size_domains = None;
        self.intrinsic = Dimensions::default();
        self.transform = Transform::identity();
        self.render_data = RenderData::None;
    }
}

/// Arena owning every node
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `node` with the given children, checking the operator's arity.
    ///
    /// Children must already be in the graph and must not have a parent.
    pub fn add(
        &mut self,
        mut node: Node,
        children: impl IntoIterator<Item = NodeId>,
    ) -> Result<NodeId, LayoutError> {
        let children: Vec<NodeId> = children.into_iter().collect();
        node.operator.check_arity(children.len())?;
        for &child in &children {
            if self.node(child)?.parent.is_some() {
                return Err(LayoutError::AlreadyParented { child });
            }
        }
        for (i, child) in children.iter().enumerate() {
            if children[..i].contains(child) {
                return Err(LayoutError::AlreadyParented { child: *child });
            }
        }

        let id = NodeId(self.nodes.len());
        for &child in &children {
            self.nodes[child.0].parent = Some(id);
        }
        node.children = children;
        node.parent = None;
        self.nodes.push(node);
        Ok(id)
    }

    /// Add a node without children
    pub fn leaf(&mut self, node: Node) -> Result<NodeId, LayoutError> {
        self.add(node, [])
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, LayoutError> {
        self.nodes.get(id.0).ok_or(LayoutError::UnknownNode { node: id })
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, LayoutError> {
        self.nodes
            .get_mut(id.0)
            .ok_or(LayoutError::UnknownNode { node: id })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], LayoutError> {
        Ok(&self.node(id)?.children)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, LayoutError> {
        Ok(self.node(id)?.parent)
    }

    /// `id`, its parent, and so on up to the root
    pub fn path_to_root(&self, id: NodeId) -> Result<Vec<NodeId>, LayoutError> {
        let mut path = vec![id];
        let mut current = self.node(id)?.parent;
        while let Some(parent) = current {
            path.push(parent);
            current = self.node(parent)?.parent;
        }
        Ok(path)
    }

    /// Deepest node that is an ancestor of (or equal to) both, `None` when
    /// they live in different trees
    pub fn least_common_ancestor(&self, a: NodeId, b: NodeId) -> Result<Option<NodeId>, LayoutError> {
        let path_a = self.path_to_root(a)?;
        let path_b = self.path_to_root(b)?;
        let mut lca = None;
        for (x, y) in path_a.iter().rev().zip(path_b.iter().rev()) {
            if x != y {
                break;
            }
            lca = Some(*x);
        }
        Ok(lca)
    }

    /// Root of the tree containing `id`
    pub fn root_of(&self, id: NodeId) -> Result<NodeId, LayoutError> {
        Ok(self.path_to_root(id)?.last().copied().unwrap_or(id))
    }

    /// Every node under `root` in depth-first pre-order, `root` first
    pub fn descendants(&self, root: NodeId) -> Result<Vec<NodeId>, LayoutError> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id)?.children.iter().rev());
        }
        Ok(order)
    }

    fn laid_out(&self, id: NodeId) -> Result<&Node, LayoutError> {
        let node = self.node(id)?;
        if node.phase < Phase::LaidOut {
            return Err(LayoutError::not_laid_out(id, node.phase));
        }
        Ok(node)
    }

    /// Extent in the node's own coordinate frame, before translation
    pub fn intrinsic_dims(&self, id: NodeId) -> Result<Dimensions, LayoutError> {
        Ok(self.laid_out(id)?.intrinsic)
    }

    pub fn transform(&self, id: NodeId) -> Result<Transform, LayoutError> {
        Ok(self.laid_out(id)?.transform)
    }

    /// Extent in the parent's frame. Positions are unknown on an axis the
    /// node has not been placed on yet; the size is always known.
    pub fn dims(&self, id: NodeId) -> Result<Dimensions, LayoutError> {
        let node = self.laid_out(id)?;
        Ok(Axis::ALL.map(|axis| {
            let intrinsic = node.intrinsic[axis.index()];
            match node.transform.translate(axis) {
                Some(offset) => intrinsic.translated(offset),
                None => AxisDims {
                    size: intrinsic.size,
                    embedded: intrinsic.embedded,
                    ..AxisDims::default()
                },
            }
        }))
    }

    /// Extent in the parent's frame with unplaced axes taken at the origin
    pub fn resolved_dims(&self, id: NodeId) -> Result<Dimensions, LayoutError> {
        let node = self.laid_out(id)?;
        Ok(Axis::ALL.map(|axis| {
            node.intrinsic[axis.index()].translated(node.transform.translate_or_zero(axis))
        }))
    }

    /// Whether the node already has a position on `axis`
    pub fn is_fixed(&self, id: NodeId, axis: Axis) -> Result<bool, LayoutError> {
        Ok(self.laid_out(id)?.transform.translate(axis).is_some())
    }

    /// Move the node's local origin to `value` on `axis`.
    ///
    /// Placement is write-once: an axis that already has a translation
    /// keeps it, so repeated placement never accumulates.
    pub fn place(&mut self, id: NodeId, axis: Axis, value: f64) -> Result<(), LayoutError> {
        self.laid_out(id)?;
        let node = self.node_mut(id)?;
        let slot = &mut node.transform.translate[axis.index()];
        if slot.is_none() {
            *slot = Some(value);
        }
        Ok(())
    }

    /// Mark the node's extent on `axis` as bound to continuous data
    pub fn embed(&mut self, id: NodeId, axis: Axis) -> Result<(), LayoutError> {
        self.node_mut(id)?.intrinsic[axis.index()].embedded = true;
        Ok(())
    }

    /// Sum of translations from `id` up to, but excluding, `stop`
    pub fn accumulated_translate(&self, id: NodeId, stop: Option<NodeId>) -> Result<Size<f64>, LayoutError> {
        let mut total = [0.0, 0.0];
        let mut current = Some(id);
        while let Some(node_id) = current {
            if Some(node_id) == stop {
                break;
            }
            let node = self.node(node_id)?;
            for axis in Axis::ALL {
                total[axis.index()] += node.transform.translate_or_zero(axis);
            }
            current = node.parent;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::dims::data;
    use crate::layout::operators::{Layer, Rect, Spread};

    fn rect() -> Node {
        Node::new(Rect::new().width(10.0).height(data(2.0)))
    }

    #[test]
    fn test_add_sets_parent() {
        let mut graph = SceneGraph::new();
        let a = graph.leaf(rect()).unwrap();
        let b = graph.leaf(rect()).unwrap();
        let parent = graph.add(Node::new(Spread::stack(Axis::X)), [a, b]).unwrap();
        assert_eq!(graph.parent(a).unwrap(), Some(parent));
        assert_eq!(graph.children(parent).unwrap(), &[a, b]);
    }

    #[test]
    fn test_child_cannot_be_reparented() {
        let mut graph = SceneGraph::new();
        let a = graph.leaf(rect()).unwrap();
        graph.add(Node::new(Layer::new()), [a]).unwrap();
        let err = graph.add(Node::new(Layer::new()), [a]).unwrap_err();
        assert!(matches!(err, LayoutError::AlreadyParented { child } if child == a));
    }

    #[test]
    fn test_duplicate_child_rejected() {
        let mut graph = SceneGraph::new();
        let a = graph.leaf(rect()).unwrap();
        let err = graph.add(Node::new(Layer::new()), [a, a]).unwrap_err();
        assert!(matches!(err, LayoutError::AlreadyParented { .. }));
    }

    #[test]
    fn test_leaf_arity() {
        let mut graph = SceneGraph::new();
        let a = graph.leaf(rect()).unwrap();
        let err = graph.add(rect(), [a]).unwrap_err();
        assert!(matches!(err, LayoutError::Arity { found: 1, .. }));
    }

    #[test]
    fn test_unknown_node() {
        let graph = SceneGraph::new();
        assert!(matches!(
            graph.node(NodeId(3)),
            Err(LayoutError::UnknownNode { .. })
        ));
    }

    #[test]
    fn test_least_common_ancestor() {
        let mut graph = SceneGraph::new();
        let a = graph.leaf(rect()).unwrap();
        let b = graph.leaf(rect()).unwrap();
        let c = graph.leaf(rect()).unwrap();
        let left = graph.add(Node::new(Layer::new()), [a, b]).unwrap();
        let root = graph.add(Node::new(Layer::new()), [left, c]).unwrap();
        let other = graph.leaf(rect()).unwrap();

        assert_eq!(graph.least_common_ancestor(a, b).unwrap(), Some(left));
        assert_eq!(graph.least_common_ancestor(a, c).unwrap(), Some(root));
        assert_eq!(graph.least_common_ancestor(a, a).unwrap(), Some(a));
        assert_eq!(graph.least_common_ancestor(a, other).unwrap(), None);
        assert_eq!(graph.root_of(b).unwrap(), root);
    }

    #[test]
    fn test_descendants_preorder() {
        let mut graph = SceneGraph::new();
        let a = graph.leaf(rect()).unwrap();
        let b = graph.leaf(rect()).unwrap();
        let inner = graph.add(Node::new(Layer::new()), [a, b]).unwrap();
        let c = graph.leaf(rect()).unwrap();
        let root = graph.add(Node::new(Layer::new()), [inner, c]).unwrap();
        assert_eq!(graph.descendants(root).unwrap(), vec![root, inner, a, b, c]);
    }

    #[test]
    fn test_dims_before_layout_is_an_error() {
        let mut graph = SceneGraph::new();
        let a = graph.leaf(rect()).unwrap();
        let err = graph.dims(a).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::NotLaidOut {
                phase: Phase::Constructed,
                ..
            }
        ));
        assert!(graph.place(a, Axis::X, 1.0).is_err());
    }

    #[test]
    fn test_place_is_write_once() {
        let mut graph = SceneGraph::new();
        let a = graph.leaf(rect()).unwrap();
        {
            let node = graph.node_mut(a).unwrap();
            node.intrinsic = [AxisDims::from_size(10.0), AxisDims::from_size(4.0)];
            node.phase = Phase::LaidOut;
        }
        assert!(!graph.is_fixed(a, Axis::X).unwrap());
        assert_eq!(graph.dims(a).unwrap()[0].min, None);

        graph.place(a, Axis::X, 5.0).unwrap();
        let first = graph.dims(a).unwrap();
        graph.place(a, Axis::X, 5.0).unwrap();
        graph.place(a, Axis::X, 8.0).unwrap();
        assert_eq!(graph.dims(a).unwrap(), first);
        assert_eq!(first[0].min, Some(5.0));
        assert_eq!(first[0].max, Some(15.0));
        assert!(graph.is_fixed(a, Axis::X).unwrap());
    }
}
