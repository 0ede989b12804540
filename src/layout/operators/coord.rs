//! Coord: embed children in a coordinate transform

use std::f64::consts::TAU;

use crate::coord::{transformed_bounding_box, CoordinateTransform};
use crate::layout::dims::AxisDims;
use crate::layout::error::LayoutError;
use crate::layout::monotonic::Monotonic;
use crate::layout::operator::{DomainCx, LayoutCx, LayoutOperator, LayoutOutput, LayoutRequest, RenderData, SpaceCx};
use crate::layout::space::{unify_layered, UnderlyingSpace};
use crate::layout::types::{Axis, BoundingBox, Point, Size};
use crate::path::{subdivide_path, transform_path, Path};
use crate::renderer::{Backend, RenderNode, Style, DEFAULT_STROKE};

/// Grid lines per axis
const GRID_DIVISIONS: usize = 10;
/// Pieces each grid line is cut into before transforming
const GRID_SUBDIVISION: usize = 100;

/// Lays children out in the transform's source space and reports the
/// screen-space extent of the transformed result
#[derive(Debug, Clone)]
pub struct Coord {
    pub transform: CoordinateTransform,
    /// Source-space point placed at the parent's origin
    pub origin: Size<Option<f64>>,
    pub grid: bool,
}

impl Coord {
    pub fn new(transform: CoordinateTransform) -> Self {
        Self {
            transform,
            origin: [None, None],
            grid: false,
        }
    }

    pub fn origin(mut self, x: f64, y: f64) -> Self {
        self.origin = [Some(x), Some(y)];
        self
    }

    pub fn grid(mut self, grid: bool) -> Self {
        self.grid = grid;
        self
    }

    /// Source-space budget: the full turn and the usable radius for radial
    /// transforms, the screen budget otherwise
    fn source_size(&self, size: Size<f64>, inset: f64) -> Size<f64> {
        if self.transform.kind().is_radial() {
            [TAU, size[0].min(size[1]) / 2.0 - inset]
        } else {
            size
        }
    }

    /// Transformed lines at regular intervals across the transform's domain
    pub fn grid_lines(&self) -> Vec<Path> {
        let [dx, dy] = self.transform.domain();
        let mut lines = Vec::with_capacity(2 * (GRID_DIVISIONS + 1));
        for i in 0..=GRID_DIVISIONS {
            let t = i as f64 / GRID_DIVISIONS as f64;
            let x = dx.min + t * dx.width();
            let y = dy.min + t * dy.width();
            lines.push(Path::line(Point::new(x, dy.min), Point::new(x, dy.max)));
            lines.push(Path::line(Point::new(dx.min, y), Point::new(dx.max, y)));
        }
        lines
            .iter()
            .map(|line| transform_path(&subdivide_path(line, GRID_SUBDIVISION), &self.transform))
            .collect()
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.transform.kind() == other.transform.kind()
            && self.transform.domain() == other.transform.domain()
            && self.origin == other.origin
            && self.grid == other.grid
    }
}

impl LayoutOperator for Coord {
    fn resolve_underlying_space(&self, cx: &SpaceCx<'_>) -> Size<UnderlyingSpace> {
        Axis::ALL.map(|axis| unify_layered(&cx.axis(axis)))
    }

    fn infer_size_domains(&self, cx: &DomainCx<'_>) -> Size<Monotonic> {
        Axis::ALL.map(|axis| Monotonic::max(&cx.axis(axis)))
    }

    fn layout(&self, cx: &mut LayoutCx<'_>, request: LayoutRequest) -> Result<LayoutOutput, LayoutError> {
        let size = self.source_size(request.size, cx.config().coord_inset);
        let child_request = LayoutRequest::new(size).with_scale_factors([Some(1.0), Some(1.0)]);

        let children = cx.children()?;
        let mut source: Option<BoundingBox> = None;
        let mut screen: Option<BoundingBox> = None;
        for &child in &children {
            cx.layout_child(child, child_request)?;
            for axis in Axis::ALL {
                cx.place(child, axis, 0.0)?;
            }
            let dims = cx.resolved_dims(child)?;
            let (x0, x1) = (dims[0].min.unwrap_or(0.0), dims[0].max.unwrap_or(0.0));
            let (y0, y1) = (dims[1].min.unwrap_or(0.0), dims[1].max.unwrap_or(0.0));

            let child_source = BoundingBox::new(x0, y0, x1 - x0, y1 - y0);
            let child_screen = transformed_bounding_box(x0, x1, y0, y1, &self.transform);
            source = Some(source.map_or(child_source, |b| b.union(&child_source)));
            screen = Some(screen.map_or(child_screen, |b| b.union(&child_screen)));
        }
        let source = source.unwrap_or_default();
        let screen = screen.unwrap_or_default();

        // Own frame is screen space; the translation below moves its min corner
        let intrinsic = [
            AxisDims::from_extent(screen.x, screen.right()),
            AxisDims::from_extent(screen.y, screen.bottom()),
        ];
        let translate = match self.origin {
            [Some(x), Some(y)] => {
                let mapped = self.transform.transform(Point::new(x, y));
                [Some(mapped.x - screen.x), Some(mapped.y - screen.y)]
            }
            _ => [Some(-screen.x), Some(-screen.y)],
        };

        Ok(LayoutOutput::new(intrinsic, translate).with_render_data(RenderData::CoordBox(source)))
    }

    fn render<B: Backend>(&self, node: &RenderNode<'_>, backend: &mut B, children: Vec<B::Output>) -> B::Output {
        let mut drawn = children;
        if self.grid {
            let style = Style {
                fill: Some("none".to_string()),
                stroke: Some(DEFAULT_STROKE.to_string()),
                stroke_width: Some(0.5),
                class: Some("grid"),
                ..Style::default()
            };
            for line in self.grid_lines() {
                drawn.push(backend.path(&line, &style));
            }
        }
        backend.group(node.group_translate(), node.scale, drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radial_source_size() {
        let coord = Coord::new(CoordinateTransform::polar());
        let size = coord.source_size([400.0, 300.0], 30.0);
        assert_eq!(size, [TAU, 120.0]);

        let linear = Coord::new(CoordinateTransform::linear());
        assert_eq!(linear.source_size([400.0, 300.0], 30.0), [400.0, 300.0]);
    }

    #[test]
    fn test_grid_line_count() {
        let coord = Coord::new(CoordinateTransform::polar()).grid(true);
        let lines = coord.grid_lines();
        assert_eq!(lines.len(), 22);
        assert!(lines.iter().all(|l| l.len() == GRID_SUBDIVISION));
    }

    #[test]
    fn test_linear_grid_spans_domain() {
        let coord = Coord::new(CoordinateTransform::linear());
        let lines = coord.grid_lines();
        let first = lines[0].points();
        assert_eq!(first.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(first.last(), Some(&Point::new(0.0, 100.0)));
    }
}
