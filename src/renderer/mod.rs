//! Rendering of placed scene graphs
//!
//! A [`Backend`] turns placed nodes into output fragments. The traversal in
//! [`render`] visits every node once, children before parents, and hands each
//! operator its children's output to compose.
//!
//! Inside a coordinate transform the hierarchy is flattened: containers stop
//! emitting translated groups and instead pass their accumulated translation
//! down, so that leaves can map their absolute coordinate-space geometry
//! through the transform in one step.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::SvgBackend;

use tracing::debug;

use crate::coord::CoordinateTransform;
use crate::layout::context::RenderContext;
use crate::layout::dims::{AxisDims, Dimensions};
use crate::layout::error::LayoutError;
use crate::layout::node::{Fill, NodeId, Phase, SceneGraph};
use crate::layout::operator::{LayoutOperator, Operator, RenderData};
use crate::layout::types::{Axis, BoundingBox, Point, Size};
use crate::path::{Path, ResampleOptions};

/// Colour used for strokes when nothing else applies
pub const DEFAULT_STROKE: &str = "black";

/// Presentation attributes of one emitted shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
    /// Draw an arrow head at the end of the path
    pub marker_end: bool,
    /// Operator class, e.g. `rect` or `connect`
    pub class: Option<&'static str>,
}

/// Output target of the render traversal
pub trait Backend {
    type Output;

    /// Wrap already-rendered children in a translated, scaled group
    fn group(&mut self, translate: Point, scale: Size<f64>, children: Vec<Self::Output>) -> Self::Output;

    /// An axis-aligned rectangle; width and height are non-negative
    fn rect(&mut self, bounds: BoundingBox, style: &Style) -> Self::Output;

    fn path(&mut self, path: &Path, style: &Style) -> Self::Output;

    /// Nothing; used by nodes that draw no geometry of their own
    fn empty(&mut self) -> Self::Output;
}

/// What an operator sees of its node while rendering
#[derive(Debug)]
pub struct RenderNode<'a> {
    pub id: NodeId,
    pub intrinsic: Dimensions,
    /// Own translation, plus the offset accumulated inside a coordinate transform
    pub translate: Point,
    pub scale: Size<f64>,
    pub render_data: &'a RenderData,
    /// Resolved fill colour
    pub fill: Option<String>,
    /// The enclosing coordinate transform, if any
    pub coord: Option<&'a CoordinateTransform>,
    pub resample: &'a ResampleOptions,
}

impl RenderNode<'_> {
    /// Translation a container applies to its group. Inside a coordinate
    /// transform the translation travels with the children instead.
    pub fn group_translate(&self) -> Point {
        if self.coord.is_some() {
            Point::default()
        } else {
            self.translate
        }
    }

    /// Extent in the frame the node draws into
    pub fn display_dims(&self) -> Dimensions {
        Axis::ALL.map(|axis| self.intrinsic[axis.index()].translated(self.translate.get(axis)))
    }

    /// Whether geometry can be drawn without a non-linear mapping
    pub fn is_linear(&self) -> bool {
        self.coord.map_or(true, CoordinateTransform::is_linear)
    }

    /// The transform geometry is drawn through, identity outside any coord
    pub fn space(&self) -> CoordinateTransform {
        self.coord.cloned().unwrap_or_else(CoordinateTransform::linear)
    }
}

/// `(min, max)` of an axis, treating unknown edges as 0
pub(crate) fn edges(dims: &AxisDims) -> (f64, f64) {
    (dims.min.unwrap_or(0.0), dims.max.unwrap_or(0.0))
}

#[derive(Debug, Clone, Default)]
struct Frame {
    coord: Option<CoordinateTransform>,
    offset: Point,
}

/// Render the placed tree under `root`
pub fn render<B: Backend>(
    graph: &mut SceneGraph,
    context: &RenderContext,
    root: NodeId,
    resample: &ResampleOptions,
    backend: &mut B,
) -> Result<B::Output, LayoutError> {
    debug!(root = %root, "render");
    render_node(graph, context, root, &Frame::default(), resample, backend)
}

fn render_node<B: Backend>(
    graph: &mut SceneGraph,
    context: &RenderContext,
    id: NodeId,
    frame: &Frame,
    resample: &ResampleOptions,
    backend: &mut B,
) -> Result<B::Output, LayoutError> {
    let node = graph.node(id)?;
    if node.phase() < Phase::Placed {
        return Err(LayoutError::not_laid_out(id, node.phase()));
    }
    let operator = node.operator().clone();
    let transform = node.transform;
    let own = Point::new(
        transform.translate_or_zero(Axis::X),
        transform.translate_or_zero(Axis::Y),
    );
    let children = node.children().to_vec();

    let child_frame = match &operator {
        Operator::Coord(coord) => Frame {
            coord: Some(coord.transform.clone()),
            offset: Point::default(),
        },
        _ if frame.coord.is_some() => Frame {
            coord: frame.coord.clone(),
            offset: frame.offset + own,
        },
        _ => Frame::default(),
    };

    let mut outputs = Vec::with_capacity(children.len());
    for child in children {
        outputs.push(render_node(graph, context, child, &child_frame, resample, backend)?);
    }

    let fill = resolve_fill(graph, context, id)?;
    let node = graph.node(id)?;
    let view = RenderNode {
        id,
        intrinsic: node.intrinsic,
        translate: frame.offset + own,
        scale: transform.scale,
        render_data: &node.render_data,
        fill,
        coord: frame.coord.as_ref(),
        resample,
    };
    let output = operator.render(&view, backend, outputs);

    graph.node_mut(id)?.phase = Phase::Rendered;
    Ok(output)
}

/// Fill colour of a node: literal colours as-is, data values through the
/// colour scale. Refs take their target's colour, Connect falls back to its
/// first child's and rects to the first palette colour.
pub fn resolve_fill(graph: &SceneGraph, context: &RenderContext, id: NodeId) -> Result<Option<String>, LayoutError> {
    let node = graph.node(id)?;
    if let Some(fill) = node.fill() {
        return Ok(Some(match fill {
            Fill::Color(color) => color.clone(),
            Fill::Data(key) => context
                .scales
                .color
                .get(key)
                .map_or_else(|| key.clone(), str::to_string),
        }));
    }
    match node.operator() {
        Operator::Ref(_) => match context.ref_target(id) {
            Some(target) => resolve_fill(graph, context, target),
            None => Ok(None),
        },
        Operator::Connect(_) => match node.children().first() {
            Some(&first) => resolve_fill(graph, context, first),
            None => Ok(None),
        },
        Operator::Rect(_) => Ok(Some(context.palette.color(0).to_string())),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::dims::data;
    use crate::layout::node::Node;
    use crate::layout::operators::{Layer, Rect, Ref};

    #[test]
    fn test_display_dims_add_translation() {
        let data = RenderData::None;
        let resample = ResampleOptions::default();
        let view = RenderNode {
            id: NodeId(0),
            intrinsic: [AxisDims::from_size(10.0), AxisDims::from_size(-4.0)],
            translate: Point::new(5.0, 2.0),
            scale: [1.0, 1.0],
            render_data: &data,
            fill: None,
            coord: None,
            resample: &resample,
        };
        let dims = view.display_dims();
        assert_eq!(edges(&dims[0]), (5.0, 15.0));
        assert_eq!(edges(&dims[1]), (-2.0, 2.0));
        assert_eq!(view.group_translate(), Point::new(5.0, 2.0));
        assert!(view.is_linear());
    }

    #[test]
    fn test_resolve_fill_data_and_inheritance() {
        let mut graph = SceneGraph::new();
        let mut context = RenderContext::default();
        let bar = graph
            .leaf(
                Node::new(Rect::new().height(data(3.0)))
                    .named("bar")
                    .filled(Fill::Data("apples".into())),
            )
            .unwrap();
        let plain = graph.leaf(Node::new(Rect::new())).unwrap();
        let reference = graph.leaf(Node::new(Ref::name("bar"))).unwrap();
        graph.add(Node::new(Layer::new()), [bar, plain, reference]).unwrap();

        context.register_color("pears");
        context.register_color("apples");
        context.set_ref_target(reference, bar);

        let palette = context.palette.clone();
        assert_eq!(
            resolve_fill(&graph, &context, bar).unwrap().as_deref(),
            Some(palette.color(1))
        );
        assert_eq!(
            resolve_fill(&graph, &context, reference).unwrap().as_deref(),
            Some(palette.color(1))
        );
        assert_eq!(
            resolve_fill(&graph, &context, plain).unwrap().as_deref(),
            Some(palette.color(0))
        );
    }
}
