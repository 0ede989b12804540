//! Arrow between two children

use crate::layout::dims::AxisDims;
use crate::layout::error::LayoutError;
use crate::layout::monotonic::Monotonic;
use crate::layout::operator::{DomainCx, LayoutCx, LayoutOperator, LayoutOutput, LayoutRequest, RenderData, SpaceCx};
use crate::layout::space::UnderlyingSpace;
use crate::layout::types::{Axis, Point, Size};
use crate::path::{resample_path, translate_path, Path};
use crate::renderer::{edges, Backend, RenderNode, Style, DEFAULT_STROKE};

/// A straight arrow from the first child's center to the second's
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub stroke: Option<String>,
    pub stroke_width: f64,
}

impl Default for Arrow {
    fn default() -> Self {
        Self {
            stroke: None,
            stroke_width: 1.5,
        }
    }
}

impl Arrow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    pub fn stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }
}

impl LayoutOperator for Arrow {
    fn resolve_underlying_space(&self, _cx: &SpaceCx<'_>) -> Size<UnderlyingSpace> {
        [UnderlyingSpace::Undefined, UnderlyingSpace::Undefined]
    }

    fn infer_size_domains(&self, _cx: &DomainCx<'_>) -> Size<Monotonic> {
        [Monotonic::constant(0.0), Monotonic::constant(0.0)]
    }

    fn layout(&self, cx: &mut LayoutCx<'_>, request: LayoutRequest) -> Result<LayoutOutput, LayoutError> {
        let children = cx.children()?;
        let [from, to] = children[..] else {
            return Err(LayoutError::arity("arrow", "exactly 2", children.len()));
        };
        let child_request = LayoutRequest {
            pos_scales: [None, None],
            ..request
        };
        cx.layout_child(from, child_request)?;
        cx.layout_child(to, child_request)?;
        let from = cx.resolved_dims(from)?;
        let to = cx.resolved_dims(to)?;

        let mut intrinsic = [AxisDims::default(); 2];
        let mut ends = [[0.0; 2]; 2];
        for axis in Axis::ALL {
            let i = axis.index();
            let (a0, a1) = edges(&from[i]);
            let (b0, b1) = edges(&to[i]);
            intrinsic[i] = AxisDims::from_extent(a0.min(b0), a1.max(b1));
            ends[0][i] = (a0 + a1) / 2.0;
            ends[1][i] = (b0 + b1) / 2.0;
        }
        let shaft = Path::line(Point::new(ends[0][0], ends[0][1]), Point::new(ends[1][0], ends[1][1]));

        Ok(LayoutOutput::new(intrinsic, [Some(0.0), Some(0.0)]).with_render_data(RenderData::Paths(vec![shaft])))
    }

    fn render<B: Backend>(&self, node: &RenderNode<'_>, backend: &mut B, children: Vec<B::Output>) -> B::Output {
        let RenderData::Paths(paths) = node.render_data else {
            return backend.group(node.group_translate(), node.scale, children);
        };
        let style = Style {
            fill: Some("none".to_string()),
            stroke: self
                .stroke
                .clone()
                .or_else(|| node.fill.clone())
                .or_else(|| Some(DEFAULT_STROKE.to_string())),
            stroke_width: Some(self.stroke_width),
            marker_end: true,
            class: Some("arrow"),
            ..Style::default()
        };
        let mut drawn = children;
        for path in paths {
            let output = match node.coord {
                Some(coord) if !coord.is_linear() => {
                    let placed = translate_path(path, node.translate);
                    backend.path(&resample_path(&placed, coord, node.resample), &style)
                }
                _ => backend.path(path, &style),
            };
            drawn.push(output);
        }
        backend.group(node.group_translate(), node.scale, drawn)
    }
}
