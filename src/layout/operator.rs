//! The operator contract
//!
//! Every node carries an [`Operator`]. The pipeline drives each operator
//! through four hooks, always children first:
//!
//! 1. [`LayoutOperator::resolve_underlying_space`] classifies each axis.
//! 2. [`LayoutOperator::infer_size_domains`] predicts size as a function of scale factor.
//! 3. [`LayoutOperator::layout`] lays out and places the children and reports
//!    the node's own extent and translation.
//! 4. [`LayoutOperator::render`] composes the children's rendered output.

use crate::path::Path;
use crate::renderer::{Backend, RenderNode};

use super::config::LayoutConfig;
use super::context::{LayoutWarning, RenderContext, UnitScale};
use super::dims::Dimensions;
use super::domain::PosScale;
use super::error::LayoutError;
use super::monotonic::Monotonic;
use super::node::{NodeId, Phase, SceneGraph};
use super::operators::{Arrow, Connect, Coord, Layer, Position, Rect, Ref, Spread};
use super::pipeline;
use super::space::UnderlyingSpace;
use super::types::{Axis, BoundingBox, Size};

/// Geometry computed during layout and consumed at render time
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RenderData {
    #[default]
    None,
    /// Paths in the node's own frame
    Paths(Vec<Path>),
    /// Extent of the children in the coordinate space of a coord node
    CoordBox(BoundingBox),
}

/// Inputs to space resolution
#[derive(Debug)]
pub struct SpaceCx<'a> {
    pub children: Vec<&'a Size<UnderlyingSpace>>,
    /// Keys of the keyed children, in child order
    pub keys: Vec<String>,
    /// Space of the node a Ref points at
    pub target: Option<&'a Size<UnderlyingSpace>>,
}

impl SpaceCx<'_> {
    /// Children's spaces along one axis
    pub fn axis(&self, axis: Axis) -> Vec<&UnderlyingSpace> {
        self.children.iter().map(|s| &s[axis.index()]).collect()
    }
}

/// Inputs to size-domain inference
#[derive(Debug)]
pub struct DomainCx<'a> {
    pub children: Vec<&'a Size<Monotonic>>,
    pub target: Option<&'a Size<Monotonic>>,
}

impl DomainCx<'_> {
    pub fn axis(&self, axis: Axis) -> Vec<Monotonic> {
        self.children.iter().map(|d| d[axis.index()].clone()).collect()
    }
}

/// What a parent hands a child to lay out with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRequest {
    /// Pixel budget
    pub size: Size<f64>,
    /// Data-to-pixel factors for data-bound sizes, when solved
    pub scale_factors: Size<Option<f64>>,
    /// Data-to-pixel maps for data-bound positions, when the axis is continuous
    pub pos_scales: Size<Option<PosScale>>,
}

impl LayoutRequest {
    pub fn new(size: Size<f64>) -> Self {
        Self {
            size,
            scale_factors: [None, None],
            pos_scales: [None, None],
        }
    }

    pub fn with_scale_factors(mut self, scale_factors: Size<Option<f64>>) -> Self {
        self.scale_factors = scale_factors;
        self
    }

    pub fn with_pos_scales(mut self, pos_scales: Size<Option<PosScale>>) -> Self {
        self.pos_scales = pos_scales;
        self
    }
}

/// What layout reports about the node itself
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutput {
    pub intrinsic: Dimensions,
    /// `None` on an axis leaves positioning to the parent
    pub translate: Size<Option<f64>>,
    pub scale: Size<f64>,
    pub render_data: RenderData,
}

impl LayoutOutput {
    pub fn new(intrinsic: Dimensions, translate: Size<Option<f64>>) -> Self {
        Self {
            intrinsic,
            translate,
            scale: [1.0, 1.0],
            render_data: RenderData::None,
        }
    }

    pub fn with_scale(mut self, scale: Size<f64>) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_render_data(mut self, render_data: RenderData) -> Self {
        self.render_data = render_data;
        self
    }
}

/// Mutable view of the graph handed to an operator's layout
pub struct LayoutCx<'a> {
    pub(crate) graph: &'a mut SceneGraph,
    pub(crate) context: &'a mut RenderContext,
    pub(crate) node: NodeId,
    pub(crate) shared: Size<bool>,
}

impl LayoutCx<'_> {
    /// The node being laid out
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Axes on which this node solves one scale factor for its children
    pub fn shared(&self) -> Size<bool> {
        self.shared
    }

    pub fn graph(&self) -> &SceneGraph {
        self.graph
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.context.config
    }

    pub fn children(&self) -> Result<Vec<NodeId>, LayoutError> {
        Ok(self.graph.children(self.node)?.to_vec())
    }

    /// Children's resolved spaces along one axis
    pub fn child_spaces(&self, axis: Axis) -> Result<Vec<UnderlyingSpace>, LayoutError> {
        let mut spaces = Vec::new();
        for &child in self.graph.children(self.node)? {
            let node = self.graph.node(child)?;
            let space = node
                .underlying_space()
                .ok_or_else(|| LayoutError::not_laid_out(child, node.phase()))?;
            spaces.push(space[axis.index()].clone());
        }
        Ok(spaces)
    }

    /// This node's size domains
    pub fn size_domains(&self) -> Result<Size<Monotonic>, LayoutError> {
        let node = self.graph.node(self.node)?;
        node.size_domains()
            .cloned()
            .ok_or_else(|| LayoutError::not_laid_out(self.node, node.phase()))
    }

    pub fn layout_child(&mut self, child: NodeId, request: LayoutRequest) -> Result<(), LayoutError> {
        pipeline::layout_node(self.graph, self.context, child, request)
    }

    pub fn dims(&self, id: NodeId) -> Result<Dimensions, LayoutError> {
        self.graph.dims(id)
    }

    /// Extent in the parent frame with unplaced axes taken at the origin
    pub fn resolved_dims(&self, id: NodeId) -> Result<Dimensions, LayoutError> {
        self.graph.resolved_dims(id)
    }

    pub fn is_fixed(&self, id: NodeId, axis: Axis) -> Result<bool, LayoutError> {
        self.graph.is_fixed(id, axis)
    }

    pub fn place(&mut self, id: NodeId, axis: Axis, value: f64) -> Result<(), LayoutError> {
        self.graph.place(id, axis, value)
    }

    /// Mark a child as data-embedded on `axis`; a Ref passes the mark on to its target
    pub fn embed(&mut self, id: NodeId, axis: Axis) -> Result<(), LayoutError> {
        self.graph.embed(id, axis)?;
        if let Some(target) = self.context.ref_target(id) {
            self.graph.embed(target, axis)?;
        }
        Ok(())
    }

    /// Target of this node when it is a Ref
    pub fn ref_target(&self) -> Option<NodeId> {
        self.context.ref_target(self.node)
    }

    pub fn set_unit_scale(&mut self, axis: Axis, scale: UnitScale) {
        self.context.set_unit_scale(axis, scale);
    }

    pub fn warn(&mut self, warning: LayoutWarning) {
        self.context.warn(warning);
    }

    /// Fail unless `id` has finished layout
    pub fn require_laid_out(&self, id: NodeId) -> Result<(), LayoutError> {
        let phase = self.graph.node(id)?.phase();
        if phase < Phase::LaidOut {
            return Err(LayoutError::not_laid_out(id, phase));
        }
        Ok(())
    }
}

/// Behaviour shared by every operator
pub trait LayoutOperator {
    /// Axes on which children share one scale factor
    fn shared(&self) -> Size<bool> {
        [false, false]
    }

    fn resolve_underlying_space(&self, cx: &SpaceCx<'_>) -> Size<UnderlyingSpace>;

    fn infer_size_domains(&self, cx: &DomainCx<'_>) -> Size<Monotonic>;

    fn layout(&self, cx: &mut LayoutCx<'_>, request: LayoutRequest) -> Result<LayoutOutput, LayoutError>;

    /// Compose the rendered children; containers wrap them in a group
    fn render<B: Backend>(&self, node: &RenderNode<'_>, backend: &mut B, children: Vec<B::Output>) -> B::Output {
        backend.group(node.group_translate(), node.scale, children)
    }
}

/// The closed set of node operators
#[derive(Debug, Clone)]
pub enum Operator {
    Spread(Spread),
    Position(Position),
    Layer(Layer),
    Connect(Connect),
    Arrow(Arrow),
    Coord(Coord),
    Rect(Rect),
    Ref(Ref),
}

macro_rules! dispatch {
    ($self:expr, $op:ident => $body:expr) => {
        match $self {
            Operator::Spread($op) => $body,
            Operator::Position($op) => $body,
            Operator::Layer($op) => $body,
            Operator::Connect($op) => $body,
            Operator::Arrow($op) => $body,
            Operator::Coord($op) => $body,
            Operator::Rect($op) => $body,
            Operator::Ref($op) => $body,
        }
    };
}

impl Operator {
    /// Short name used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Operator::Spread(_) => "spread",
            Operator::Position(_) => "position",
            Operator::Layer(_) => "layer",
            Operator::Connect(_) => "connect",
            Operator::Arrow(_) => "arrow",
            Operator::Coord(_) => "coord",
            Operator::Rect(_) => "rect",
            Operator::Ref(_) => "ref",
        }
    }

    /// Reject child counts the operator cannot work with
    pub fn check_arity(&self, found: usize) -> Result<(), LayoutError> {
        let (ok, expected) = match self {
            Operator::Position(_) => (found == 1, "exactly 1"),
            Operator::Connect(_) => (found >= 2, "at least 2"),
            Operator::Arrow(_) => (found == 2, "exactly 2"),
            Operator::Rect(_) | Operator::Ref(_) => (found == 0, "no"),
            Operator::Spread(_) | Operator::Layer(_) | Operator::Coord(_) => (true, "any number of"),
        };
        if ok {
            Ok(())
        } else {
            Err(LayoutError::arity(self.kind(), expected, found))
        }
    }
}

impl LayoutOperator for Operator {
    fn shared(&self) -> Size<bool> {
        dispatch!(self, op => op.shared())
    }

    fn resolve_underlying_space(&self, cx: &SpaceCx<'_>) -> Size<UnderlyingSpace> {
        dispatch!(self, op => op.resolve_underlying_space(cx))
    }

    fn infer_size_domains(&self, cx: &DomainCx<'_>) -> Size<Monotonic> {
        dispatch!(self, op => op.infer_size_domains(cx))
    }

    fn layout(&self, cx: &mut LayoutCx<'_>, request: LayoutRequest) -> Result<LayoutOutput, LayoutError> {
        dispatch!(self, op => op.layout(cx, request))
    }

    fn render<B: Backend>(&self, node: &RenderNode<'_>, backend: &mut B, children: Vec<B::Output>) -> B::Output {
        dispatch!(self, op => op.render(node, backend, children))
    }
}

macro_rules! impl_from {
    ($($variant:ident),*) => {
        $(impl From<$variant> for Operator {
            fn from(op: $variant) -> Self {
                Operator::$variant(op)
            }
        })*
    };
}

impl_from!(Spread, Position, Layer, Connect, Arrow, Coord, Rect, Ref);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::CoordinateTransform;

    #[test]
    fn test_arity() {
        let position: Operator = Position::new().into();
        assert!(position.check_arity(1).is_ok());
        assert!(matches!(
            position.check_arity(2),
            Err(LayoutError::Arity {
                operator: "position",
                found: 2,
                ..
            })
        ));

        let connect: Operator = Connect::new(Axis::X).into();
        assert!(connect.check_arity(1).is_err());
        assert!(connect.check_arity(3).is_ok());

        let arrow: Operator = Arrow::new().into();
        assert!(arrow.check_arity(2).is_ok());
        assert!(arrow.check_arity(3).is_err());

        let rect: Operator = Rect::new().into();
        assert!(rect.check_arity(0).is_ok());

        let coord: Operator = Coord::new(CoordinateTransform::polar()).into();
        assert!(coord.check_arity(0).is_ok());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Operator::from(Layer::new()).kind(), "layer");
        assert_eq!(Operator::from(Ref::name("a")).kind(), "ref");
        assert_eq!(Operator::from(Spread::new(Axis::Y)).kind(), "spread");
    }

    #[test]
    fn test_shared_flags() {
        assert_eq!(Operator::from(Spread::new(Axis::X).shared_scale(true)).shared(), [true, true]);
        assert_eq!(Operator::from(Spread::new(Axis::X)).shared(), [false, false]);
        assert_eq!(Operator::from(Rect::new()).shared(), [false, false]);
    }

    #[test]
    fn test_space_cx_axis() {
        let a = [UnderlyingSpace::Size(2.0), UnderlyingSpace::Undefined];
        let b = [UnderlyingSpace::Size(3.0), UnderlyingSpace::ordinal()];
        let cx = SpaceCx {
            children: vec![&a, &b],
            keys: vec![],
            target: None,
        };
        let xs = cx.axis(Axis::X);
        assert_eq!(xs, vec![&UnderlyingSpace::Size(2.0), &UnderlyingSpace::Size(3.0)]);
    }
}
