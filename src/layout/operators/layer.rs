//! Layer: overlay children in one shared frame

use crate::layout::dims::{compute_aesthetic, compute_size, AxisDims, AxisSpec, Encoded};
use crate::layout::error::LayoutError;
use crate::layout::monotonic::Monotonic;
use crate::layout::operator::{DomainCx, LayoutCx, LayoutOperator, LayoutOutput, LayoutRequest, SpaceCx};
use crate::layout::space::{unify_layered, UnderlyingSpace};
use crate::layout::types::{Axis, Size};

/// Overlays its children, each placed at the layer's local origin
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub dims: Size<AxisSpec>,
    /// Scale applied to the whole layer at render time
    pub scale: Size<f64>,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            dims: [AxisSpec::default(), AxisSpec::default()],
            scale: [1.0, 1.0],
        }
    }
}

impl Layer {
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

    pub fn scale(mut self, sx: f64, sy: f64) -> Self {
        self.scale = [sx, sy];
        self
    }
}

impl LayoutOperator for Layer {
    fn resolve_underlying_space(&self, cx: &SpaceCx<'_>) -> Size<UnderlyingSpace> {
        Axis::ALL.map(|axis| unify_layered(&cx.axis(axis)))
    }

    fn infer_size_domains(&self, cx: &DomainCx<'_>) -> Size<Monotonic> {
        Axis::ALL.map(|axis| Monotonic::smul(self.scale[axis.index()], &Monotonic::max(&cx.axis(axis))))
    }

    fn layout(&self, cx: &mut LayoutCx<'_>, request: LayoutRequest) -> Result<LayoutOutput, LayoutError> {
        let size: Size<f64> = Axis::ALL.map(|axis| {
            let i = axis.index();
            compute_size(self.dims[i].size, request.scale_factors[i], request.size[i])
        });
        let child_request = LayoutRequest { size, ..request };

        let children = cx.children()?;
        for &child in &children {
            cx.layout_child(child, child_request)?;
            for axis in Axis::ALL {
                cx.place(child, axis, 0.0)?;
            }
        }

        let mut intrinsic = [AxisDims::from_extent(0.0, 0.0); 2];
        let mut translate = [None, None];
        for axis in Axis::ALL {
            let i = axis.index();
            let mut extent: Option<(f64, f64)> = None;
            for &child in &children {
                let dims = cx.resolved_dims(child)?[i];
                let (min, max) = (dims.min.unwrap_or(0.0), dims.max.unwrap_or(0.0));
                extent = Some(match extent {
                    Some((lo, hi)) => (lo.min(min), hi.max(max)),
                    None => (min, max),
                });
            }
            let (min, max) = extent.unwrap_or((0.0, 0.0));
            intrinsic[i] = AxisDims::from_extent(min, max);
            translate[i] = compute_aesthetic(self.dims[i].min, request.pos_scales[i].as_ref(), None).map(|p| p - min);
        }

        Ok(LayoutOutput::new(intrinsic, translate).with_scale(self.scale))
    }
}
