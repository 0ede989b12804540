//! Rect: the rectangle leaf
//!
//! Each axis of a rect is either an aesthetic extent chosen freely by its
//! parent or a data-embedded interval. How it is drawn depends on which axes
//! are embedded and whether it sits inside a non-linear coordinate transform:
//!
//! | embedded axes | linear space | non-linear space |
//! |---------------|--------------|------------------|
//! | none | `rect` centred on the mapped center | same |
//! | one | `rect` | thick stroked midline, resampled |
//! | both | `rect` | closed outline, resampled |

use crate::layout::dims::{compute_aesthetic, compute_size, data, AxisDims, AxisSpec, Encoded, Interval};
use crate::layout::error::LayoutError;
use crate::layout::monotonic::Monotonic;
use crate::layout::operator::{DomainCx, LayoutCx, LayoutOperator, LayoutOutput, LayoutRequest, SpaceCx};
use crate::layout::space::UnderlyingSpace;
use crate::layout::types::{Axis, BoundingBox, Point, Size};
use crate::path::{resample_path, Path};
use crate::renderer::{edges, Backend, RenderNode, Style, DEFAULT_STROKE};

/// A rectangle with optionally data-bound position and size per axis
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rect {
    pub dims: Size<AxisSpec>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
}

impl Rect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(mut self, x: impl Into<Encoded>) -> Self {
        self.dims[0].min = Some(x.into());
        self
    }

    pub fn y(mut self, y: impl Into<Encoded>) -> Self {
        self.dims[1].min = Some(y.into());
        self
    }

    pub fn width(mut self, w: impl Into<Encoded>) -> Self {
        self.dims[0].size = Some(w.into());
        self
    }

    pub fn height(mut self, h: impl Into<Encoded>) -> Self {
        self.dims[1].size = Some(h.into());
        self
    }

    pub fn stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    pub fn stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    fn axis_space(spec: &AxisSpec) -> UnderlyingSpace {
        match (spec.min, spec.size) {
            (min, size) if !min.is_some_and(|m| m.is_data()) && !size.is_some_and(|s| s.is_data()) => {
                UnderlyingSpace::ordinal()
            }
            (Some(Encoded::Aesthetic(_)), Some(Encoded::Data(size))) => UnderlyingSpace::Difference(size),
            (min, size) => {
                let min = match min {
                    Some(Encoded::Data(v)) => v,
                    _ => 0.0,
                };
                let size = match size {
                    Some(Encoded::Data(v)) => v,
                    _ => 0.0,
                };
                UnderlyingSpace::Position(Interval::new(min, min + size))
            }
        }
    }

    fn axis_extent(&self, axis: Axis, request: &LayoutRequest, pos: Option<f64>) -> f64 {
        let i = axis.index();
        let spec = self.dims[i];
        let scale = request.pos_scales[i].as_ref();
        match (spec.min, spec.size, scale) {
            (Some(Encoded::Data(min)), Some(Encoded::Data(size)), _) => {
                let max = compute_aesthetic(Some(data(min + size)), scale, None).unwrap_or(0.0);
                max - pos.unwrap_or(0.0)
            }
            (_, Some(Encoded::Data(size)), Some(scale)) => scale.apply(size) - scale.apply(0.0),
            _ => compute_size(spec.size, request.scale_factors[i], request.size[i]),
        }
    }

    fn style(&self, fill: Option<&str>) -> Style {
        Style {
            fill: fill.map(str::to_string),
            stroke: self.stroke.clone().or_else(|| fill.map(str::to_string)),
            stroke_width: Some(self.stroke_width),
            class: Some("rect"),
            ..Style::default()
        }
    }
}

/// Rectangle with the corner at `(x, y)` and a signed size, normalised so
/// width and height are non-negative
fn normalized(x: f64, y: f64, width: f64, height: f64) -> BoundingBox {
    BoundingBox::new(
        if width < 0.0 { x + width } else { x },
        if height < 0.0 { y + height } else { y },
        width.abs(),
        height.abs(),
    )
}

impl LayoutOperator for Rect {
    fn resolve_underlying_space(&self, _cx: &SpaceCx<'_>) -> Size<UnderlyingSpace> {
        [Self::axis_space(&self.dims[0]), Self::axis_space(&self.dims[1])]
    }

    fn infer_size_domains(&self, _cx: &DomainCx<'_>) -> Size<Monotonic> {
        Axis::ALL.map(|axis| match self.dims[axis.index()].size {
            Some(Encoded::Data(v)) => Monotonic::linear(v, 0.0),
            Some(Encoded::Aesthetic(v)) => Monotonic::constant(v),
            None => Monotonic::constant(0.0),
        })
    }

    fn layout(&self, _cx: &mut LayoutCx<'_>, request: LayoutRequest) -> Result<LayoutOutput, LayoutError> {
        let mut intrinsic = [AxisDims::default(); 2];
        let mut translate = [None, None];
        for axis in Axis::ALL {
            let i = axis.index();
            let spec = self.dims[i];
            let pos = compute_aesthetic(spec.min, request.pos_scales[i].as_ref(), None);
            let extent = self.axis_extent(axis, &request, pos);
            intrinsic[i] = AxisDims::from_size(extent).with_embedded(spec.size.is_some_and(|s| s.is_data()));
            translate[i] = pos;
        }
        Ok(LayoutOutput::new(intrinsic, translate))
    }

    fn render<B: Backend>(&self, node: &RenderNode<'_>, backend: &mut B, _children: Vec<B::Output>) -> B::Output {
        let dims = node.display_dims();
        let (x0, x1) = edges(&dims[0]);
        let (y0, y1) = edges(&dims[1]);
        let sizes = [dims[0].size_or_zero(), dims[1].size_or_zero()];
        let embedded = [dims[0].embedded, dims[1].embedded];
        let style = self.style(node.fill.as_deref());
        let space = node.space();

        match embedded {
            [false, false] => {
                let center = space.transform(Point::new(x0 + sizes[0] / 2.0, y0 + sizes[1] / 2.0));
                let bounds = normalized(
                    center.x - sizes[0] / 2.0,
                    center.y - sizes[1] / 2.0,
                    sizes[0],
                    sizes[1],
                );
                backend.rect(bounds, &style)
            }
            [true, true] if node.is_linear() => backend.rect(normalized(x0, y0, x1 - x0, y1 - y0), &style),
            [true, true] => {
                let outline = Path::polyline(
                    &[
                        Point::new(x0, y0),
                        Point::new(x1, y0),
                        Point::new(x1, y1),
                        Point::new(x0, y1),
                    ],
                    true,
                );
                let path = resample_path(&outline, &space, node.resample);
                backend.path(&path, &style)
            }
            [x_embedded, _] => {
                let (data_axis, aesthetic_axis) = if x_embedded { (0, 1) } else { (1, 0) };
                let thickness = sizes[aesthetic_axis];
                let (lo, _) = edges(&dims[aesthetic_axis]);
                let mid = lo + thickness / 2.0;
                let (start, end) = edges(&dims[data_axis]);

                if node.is_linear() {
                    let bounds = if x_embedded {
                        normalized(start, mid - thickness / 2.0, end - start, thickness)
                    } else {
                        normalized(mid - thickness / 2.0, start, thickness, end - start)
                    };
                    return backend.rect(bounds, &style);
                }

                let midline = if x_embedded {
                    Path::line(Point::new(start, mid), Point::new(end, mid))
                } else {
                    Path::line(Point::new(mid, start), Point::new(mid, end))
                };
                let path = resample_path(&midline, &space, node.resample);
                let stroke = Style {
                    fill: Some("none".to_string()),
                    stroke: node.fill.clone().or_else(|| Some(DEFAULT_STROKE.to_string())),
                    stroke_width: Some(thickness + 0.5),
                    class: Some("rect"),
                    ..Style::default()
                };
                backend.path(&path, &stroke)
            }
        }
    }
}
