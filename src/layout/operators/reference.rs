//! Ref: stand-in for a node laid out elsewhere in the tree

use std::fmt;

use crate::layout::error::LayoutError;
use crate::layout::monotonic::Monotonic;
use crate::layout::operator::{DomainCx, LayoutCx, LayoutOperator, LayoutOutput, LayoutRequest, SpaceCx};
use crate::layout::node::NodeId;
use crate::layout::space::UnderlyingSpace;
use crate::layout::types::{Axis, Size};
use crate::renderer::{Backend, RenderNode};

/// How a Ref finds its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    /// A node registered with [`Node::named`](crate::layout::node::Node::named)
    Name(String),
    Node(NodeId),
}

impl fmt::Display for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefTarget::Name(name) => write!(f, "{name}"),
            RefTarget::Node(id) => write!(f, "{id}"),
        }
    }
}

/// Reports the geometry of its target, expressed in its own parent's
/// frame. The target must be laid out before the Ref is.
#[derive(Debug, Clone, PartialEq)]
pub struct Ref {
    pub target: RefTarget,
}

impl Ref {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            target: RefTarget::Name(name.into()),
        }
    }

    pub fn node(id: NodeId) -> Self {
        Self {
            target: RefTarget::Node(id),
        }
    }
}

impl LayoutOperator for Ref {
    fn resolve_underlying_space(&self, cx: &SpaceCx<'_>) -> Size<UnderlyingSpace> {
        match cx.target {
            Some(space) => space.clone(),
            None => [UnderlyingSpace::ordinal(), UnderlyingSpace::ordinal()],
        }
    }

    fn infer_size_domains(&self, cx: &DomainCx<'_>) -> Size<Monotonic> {
        match cx.target {
            Some(domains) => domains.clone(),
            None => [Monotonic::constant(0.0), Monotonic::constant(0.0)],
        }
    }

    fn layout(&self, cx: &mut LayoutCx<'_>, _request: LayoutRequest) -> Result<LayoutOutput, LayoutError> {
        let Some(target) = cx.ref_target() else {
            return Err(LayoutError::unresolved(self.target.to_string(), Vec::new()));
        };
        cx.require_laid_out(target)?;

        let node = cx.node();
        let graph = cx.graph();
        let lca = graph.least_common_ancestor(node, target)?;
        let target_offset = graph.accumulated_translate(target, lca)?;
        let parent_offset = match graph.parent(node)? {
            Some(parent) => graph.accumulated_translate(parent, lca)?,
            None => [0.0, 0.0],
        };
        let intrinsic = graph.intrinsic_dims(target)?;
        let translate = Axis::ALL.map(|axis| {
            let i = axis.index();
            Some(target_offset[i] - parent_offset[i])
        });

        Ok(LayoutOutput::new(intrinsic, translate))
    }

    fn render<B: Backend>(&self, _node: &RenderNode<'_>, backend: &mut B, _children: Vec<B::Output>) -> B::Output {
        backend.empty()
    }
}
