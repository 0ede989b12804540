//! Connect: ribbons or center lines between consecutive children

use serde::Deserialize;

use crate::layout::dims::{AxisDims, Dimensions};
use crate::layout::error::LayoutError;
use crate::layout::monotonic::Monotonic;
use crate::layout::operator::{DomainCx, LayoutCx, LayoutOperator, LayoutOutput, LayoutRequest, RenderData, SpaceCx};
use crate::layout::space::UnderlyingSpace;
use crate::layout::types::{Axis, Point, Size};
use crate::path::{resample_path, translate_path, Path, PathSegment};
use crate::renderer::{edges, Backend, RenderNode, Style, DEFAULT_STROKE};

use super::SpreadMode;

/// Curve used for the long sides of a ribbon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    #[default]
    Linear,
    Bezier,
}

/// Joins each child to the next along `direction`.
///
/// Edge-to-edge mode draws a closed ribbon from the far edge of one child
/// to the near edge of the next; center-to-center draws a line between
/// their centers. Children are usually Refs to nodes laid out elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Connect {
    pub direction: Axis,
    pub interpolation: Interpolation,
    pub mode: SpreadMode,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
}

impl Connect {
    pub fn new(direction: Axis) -> Self {
        Self {
            direction,
            interpolation: Interpolation::Linear,
            mode: SpreadMode::EdgeToEdge,
            stroke: None,
            stroke_width: None,
            opacity: None,
        }
    }

    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn mode(mut self, mode: SpreadMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    pub fn stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Path joining two consecutive children
    pub fn link(&self, from: &Dimensions, to: &Dimensions) -> Path {
        if self.mode == SpreadMode::CenterToCenter {
            return Path::line(center(from), center(to));
        }

        // Work in (along, across) coordinates, then map back to (x, y)
        let along = self.direction.index();
        let across = self.direction.other().index();
        let point = |a: f64, c: f64| {
            let mut xy = [0.0; 2];
            xy[along] = a;
            xy[across] = c;
            Point::new(xy[0], xy[1])
        };
        let (_, a0) = edges(&from[along]);
        let (a1, _) = edges(&to[along]);
        let (c0_lo, c0_hi) = edges(&from[across]);
        let (c1_lo, c1_hi) = edges(&to[across]);
        let mid = (a0 + a1) / 2.0;

        let side = |start: Point, end: Point, c_start: f64, c_end: f64| match self.interpolation {
            Interpolation::Linear => PathSegment::line(start, end),
            Interpolation::Bezier => PathSegment::bezier(start, point(mid, c_start), point(mid, c_end), end),
        };

        let segments = vec![
            side(point(a0, c0_lo), point(a1, c1_lo), c0_lo, c1_lo),
            PathSegment::line(point(a1, c1_lo), point(a1, c1_hi)),
            side(point(a1, c1_hi), point(a0, c0_hi), c1_hi, c0_hi),
            PathSegment::line(point(a0, c0_hi), point(a0, c0_lo)),
        ];
        Path::new(segments).closed()
    }
}

fn center(dims: &Dimensions) -> Point {
    let (x0, x1) = edges(&dims[0]);
    let (y0, y1) = edges(&dims[1]);
    Point::new((x0 + x1) / 2.0, (y0 + y1) / 2.0)
}

impl LayoutOperator for Connect {
    fn resolve_underlying_space(&self, _cx: &SpaceCx<'_>) -> Size<UnderlyingSpace> {
        [UnderlyingSpace::Undefined, UnderlyingSpace::Undefined]
    }

    fn infer_size_domains(&self, _cx: &DomainCx<'_>) -> Size<Monotonic> {
        [Monotonic::constant(0.0), Monotonic::constant(0.0)]
    }

    fn layout(&self, cx: &mut LayoutCx<'_>, request: LayoutRequest) -> Result<LayoutOutput, LayoutError> {
        let child_request = LayoutRequest {
            pos_scales: [None, None],
            ..request
        };
        let children = cx.children()?;
        let mut dims = Vec::with_capacity(children.len());
        for &child in &children {
            cx.layout_child(child, child_request)?;
            if self.mode == SpreadMode::EdgeToEdge {
                cx.embed(child, self.direction)?;
            }
            dims.push(cx.resolved_dims(child)?);
        }

        let paths: Vec<Path> = dims.windows(2).map(|pair| self.link(&pair[0], &pair[1])).collect();

        let mut intrinsic = [AxisDims::from_extent(0.0, 0.0); 2];
        for axis in Axis::ALL {
            let i = axis.index();
            let lo = dims.iter().map(|d| edges(&d[i]).0).fold(f64::INFINITY, f64::min);
            let hi = dims.iter().map(|d| edges(&d[i]).1).fold(f64::NEG_INFINITY, f64::max);
            if lo <= hi {
                intrinsic[i] = AxisDims::from_extent(lo, hi);
            }
        }

        Ok(LayoutOutput::new(intrinsic, [Some(0.0), Some(0.0)]).with_render_data(RenderData::Paths(paths)))
    }

    fn render<B: Backend>(&self, node: &RenderNode<'_>, backend: &mut B, children: Vec<B::Output>) -> B::Output {
        let RenderData::Paths(paths) = node.render_data else {
            return backend.group(node.group_translate(), node.scale, children);
        };
        let style = match self.mode {
            SpreadMode::EdgeToEdge => Style {
                fill: node.fill.clone(),
                stroke: self.stroke.clone().or_else(|| node.fill.clone()),
                stroke_width: Some(self.stroke_width.unwrap_or(0.0)),
                opacity: self.opacity,
                class: Some("connect"),
                ..Style::default()
            },
            SpreadMode::CenterToCenter => Style {
                fill: Some("none".to_string()),
                stroke: self
                    .stroke
                    .clone()
                    .or_else(|| node.fill.clone())
                    .or_else(|| Some(DEFAULT_STROKE.to_string())),
                stroke_width: Some(self.stroke_width.unwrap_or(1.0)),
                opacity: self.opacity,
                class: Some("connect"),
                ..Style::default()
            },
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

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x0: f64, x1: f64, y0: f64, y1: f64) -> Dimensions {
        [AxisDims::from_extent(x0, x1), AxisDims::from_extent(y0, y1)]
    }

    #[test]
    fn test_horizontal_ribbon() {
        let connect = Connect::new(Axis::X);
        let path = connect.link(&boxed(0.0, 10.0, 0.0, 4.0), &boxed(20.0, 30.0, 1.0, 9.0));
        assert!(path.closed);
        assert_eq!(
            path.points(),
            vec![
                Point::new(10.0, 0.0),
                Point::new(20.0, 1.0),
                Point::new(20.0, 9.0),
                Point::new(10.0, 4.0),
                Point::new(10.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_vertical_bezier_ribbon_controls() {
        let connect = Connect::new(Axis::Y).interpolation(Interpolation::Bezier);
        let path = connect.link(&boxed(0.0, 4.0, 0.0, 10.0), &boxed(2.0, 6.0, 30.0, 40.0));
        match path.segments[0] {
            PathSegment::Bezier {
                start,
                control1,
                control2,
                end,
            } => {
                assert_eq!(start, Point::new(0.0, 10.0));
                assert_eq!(control1, Point::new(0.0, 20.0));
                assert_eq!(control2, Point::new(2.0, 20.0));
                assert_eq!(end, Point::new(2.0, 30.0));
            }
            ref other => panic!("expected bezier, got {other:?}"),
        }
    }

    #[test]
    fn test_center_to_center_line() {
        let connect = Connect::new(Axis::X).mode(SpreadMode::CenterToCenter);
        let path = connect.link(&boxed(0.0, 10.0, 0.0, 4.0), &boxed(20.0, 30.0, 2.0, 6.0));
        assert_eq!(path.len(), 1);
        assert_eq!(path.points(), vec![Point::new(5.0, 2.0), Point::new(25.0, 4.0)]);
    }
}
