//! Spread and stack: distribute children along one axis, align them on the other

use std::fmt;

use serde::Deserialize;

use crate::layout::context::{LayoutWarning, UnitScale};
use crate::layout::dims::{compute_aesthetic, compute_size, AxisDims, AxisSpec, Encoded};
use crate::layout::error::LayoutError;
use crate::layout::monotonic::Monotonic;
use crate::layout::node::NodeId;
use crate::layout::operator::{DomainCx, LayoutCx, LayoutOperator, LayoutOutput, LayoutRequest, SpaceCx};
use crate::layout::space::{unify_align, unify_stack, UnderlyingSpace};
use crate::layout::types::{Alignment, Axis, Size};

/// How consecutive children are measured apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpreadMode {
    /// `spacing` separates one child's max edge from the next child's min edge
    #[default]
    EdgeToEdge,
    /// `spacing` separates consecutive child centers
    CenterToCenter,
}

impl fmt::Display for SpreadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpreadMode::EdgeToEdge => write!(f, "edge-to-edge"),
            SpreadMode::CenterToCenter => write!(f, "center-to-center"),
        }
    }
}

/// Distributes children along `axis` and aligns them on the other axis
#[derive(Debug, Clone, PartialEq)]
pub struct Spread {
    /// Distribution axis
    pub axis: Axis,
    pub spacing: f64,
    pub alignment: Alignment,
    pub mode: SpreadMode,
    /// Solve one scale factor per axis so the children fill the budget
    pub shared_scale: bool,
    pub reverse: bool,
    /// Own position and size, per axis
    pub dims: Size<AxisSpec>,
}

impl Spread {
    /// Spread with middle alignment and no spacing
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            spacing: 0.0,
            alignment: Alignment::Middle,
            mode: SpreadMode::EdgeToEdge,
            shared_scale: false,
            reverse: false,
            dims: [AxisSpec::default(), AxisSpec::default()],
        }
    }

    /// Children packed edge to edge from a common start baseline
    pub fn stack(axis: Axis) -> Self {
        Self::new(axis).align(Alignment::Start)
    }

    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn mode(mut self, mode: SpreadMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn shared_scale(mut self, shared: bool) -> Self {
        self.shared_scale = shared;
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
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

    fn data_size(&self, axis: Axis) -> Option<f64> {
        match self.dims[axis.index()].size {
            Some(Encoded::Data(v)) => Some(v),
            _ => None,
        }
    }

    fn total_spacing(&self, n: usize) -> f64 {
        self.spacing * n.saturating_sub(1) as f64
    }

    /// Distribute children on the stack axis, starting from the first fixed child
    fn distribute(&self, cx: &mut LayoutCx<'_>, ordered: &[NodeId]) -> Result<(), LayoutError> {
        let axis = self.axis;
        let tolerance = cx.config().baseline_tolerance;

        let mut first_fixed = None;
        for (k, &child) in ordered.iter().enumerate() {
            if cx.is_fixed(child, axis)? {
                first_fixed = Some(k);
                break;
            }
        }

        let mut pos = match first_fixed {
            None => 0.0,
            Some(k) => {
                let dims = cx.dims(ordered[k])?[axis.index()];
                let (min, max) = (dims.min.unwrap_or(0.0), dims.max.unwrap_or(0.0));
                match self.mode {
                    SpreadMode::EdgeToEdge => {
                        let mut before = 0.0;
                        for &child in &ordered[..k] {
                            before += cx.dims(child)?[axis.index()].size_or_zero();
                        }
                        min - k as f64 * self.spacing - before
                    }
                    SpreadMode::CenterToCenter => (min + max) / 2.0 - k as f64 * self.spacing,
                }
            }
        };

        for &child in ordered {
            let dims = cx.dims(child)?[axis.index()];
            if cx.is_fixed(child, axis)? {
                let (min, max) = (dims.min.unwrap_or(0.0), dims.max.unwrap_or(0.0));
                let actual = match self.mode {
                    SpreadMode::EdgeToEdge => min,
                    SpreadMode::CenterToCenter => (min + max) / 2.0,
                };
                if (actual - pos).abs() > tolerance {
                    cx.warn(LayoutWarning::OrderMismatch {
                        node: child,
                        mode: self.mode,
                        expected: pos,
                        actual,
                    });
                }
                pos = match self.mode {
                    SpreadMode::EdgeToEdge => max + self.spacing,
                    SpreadMode::CenterToCenter => actual + self.spacing,
                };
            } else {
                let size = dims.size_or_zero();
                match self.mode {
                    SpreadMode::EdgeToEdge => {
                        cx.place(child, axis, pos)?;
                        pos += size + self.spacing;
                    }
                    SpreadMode::CenterToCenter => {
                        cx.place(child, axis, pos - size / 2.0)?;
                        pos += self.spacing;
                    }
                }
            }
        }
        Ok(())
    }
}

impl LayoutOperator for Spread {
    fn shared(&self) -> Size<bool> {
        [self.shared_scale, self.shared_scale]
    }

    fn resolve_underlying_space(&self, cx: &SpaceCx<'_>) -> Size<UnderlyingSpace> {
        let stack = unify_stack(&cx.axis(self.axis), self.spacing, cx.keys.clone());
        let align = unify_align(&cx.axis(self.axis.other()), self.alignment).space;
        let mut spaces = [UnderlyingSpace::Undefined, UnderlyingSpace::Undefined];
        spaces[self.axis.index()] = stack;
        spaces[self.axis.other().index()] = align;
        spaces
    }

    fn infer_size_domains(&self, cx: &DomainCx<'_>) -> Size<Monotonic> {
        let stack = self.axis;
        let align = stack.other();
        let n = cx.children.len();

        let stack_fn = if let Some(size) = self.data_size(stack) {
            Monotonic::linear(size, 0.0)
        } else if n == 0 {
            Monotonic::constant(0.0)
        } else {
            let fns = cx.axis(stack);
            let spacing = self.total_spacing(n);
            match self.mode {
                SpreadMode::EdgeToEdge => Monotonic::add(&fns).adds(spacing),
                SpreadMode::CenterToCenter => {
                    let first = fns[0].clone();
                    let last = fns[n - 1].clone();
                    Monotonic::unknown(move |x| first.run(x) / 2.0 + spacing + last.run(x) / 2.0)
                }
            }
        };

        let align_fn = match self.data_size(align) {
            Some(size) => Monotonic::linear(size, 0.0),
            None => Monotonic::max(&cx.axis(align)),
        };

        let mut domains = [Monotonic::constant(0.0), Monotonic::constant(0.0)];
        domains[stack.index()] = stack_fn;
        domains[align.index()] = align_fn;
        domains
    }

    fn layout(&self, cx: &mut LayoutCx<'_>, request: LayoutRequest) -> Result<LayoutOutput, LayoutError> {
        let stack = self.axis;
        let align = stack.other();
        let (s, a) = (stack.index(), align.index());

        let ids = cx.children()?;
        let n = ids.len();
        let mut ordered = ids.clone();
        if self.reverse {
            ordered.reverse();
        }

        let stack_pos = compute_aesthetic(self.dims[s].min, request.pos_scales[s].as_ref(), None);
        let align_pos = compute_aesthetic(self.dims[a].min, request.pos_scales[a].as_ref(), None);

        let size: Size<f64> = Axis::ALL.map(|axis| {
            let i = axis.index();
            compute_size(self.dims[i].size, request.scale_factors[i], request.size[i])
        });

        let mut scale_factors = request.scale_factors;
        let shared = cx.shared();
        if shared.contains(&true) {
            let domains = cx.size_domains()?;
            for axis in Axis::ALL.into_iter().filter(|a| shared[a.index()]) {
                let i = axis.index();
                let options = cx.config().inverse.with_upper_bound_guess(size[i]);
                let factor = domains[i].inverse(size[i], &options).map_or(0.0, |inv| inv.value);
                scale_factors[i] = Some(factor);
            }
        }

        for axis in Axis::ALL {
            let i = axis.index();
            let factor = scale_factors[i].unwrap_or(1.0);
            let extent = if factor != 0.0 { size[i] / factor } else { 0.0 };
            cx.set_unit_scale(
                axis,
                UnitScale {
                    domain: [0.0, extent],
                    scale_factor: factor,
                },
            );
        }

        let mut child_size = size;
        child_size[s] = if n > 0 {
            (size[s] - self.total_spacing(n)) / n as f64
        } else {
            0.0
        };
        let child_request = LayoutRequest {
            size: child_size,
            scale_factors,
            pos_scales: request.pos_scales,
        };
        for &child in &ordered {
            cx.layout_child(child, child_request)?;
        }

        // Children already positioned on the align axis set the baseline
        let tolerance = cx.config().baseline_tolerance;
        let mut baselines = Vec::new();
        for &child in &ordered {
            if cx.is_fixed(child, align)? {
                if let Some(b) = cx.dims(child)?[a].baseline(self.alignment) {
                    baselines.push(b);
                }
            }
        }
        if let Some(&first) = baselines.first() {
            if baselines.iter().any(|b| (b - first).abs() > tolerance) {
                let node = cx.node();
                cx.warn(LayoutWarning::InconsistentBaseline {
                    node,
                    alignment: self.alignment,
                    baselines: baselines.clone(),
                });
            }
        }

        let align_space = cx.child_spaces(align)?;
        let from_size = unify_align(&align_space.iter().collect::<Vec<_>>(), self.alignment).from_size;
        let align_scale = request.pos_scales[a];
        if align_scale.is_none() || from_size || self.alignment == Alignment::Middle {
            let fixed = baselines.first().copied();
            let baseline = match self.alignment {
                Alignment::Start | Alignment::End => fixed
                    .or_else(|| align_scale.map(|scale| scale.apply(0.0)))
                    .unwrap_or(0.0),
                Alignment::Middle => fixed.unwrap_or(size[a] / 2.0),
            };
            for &child in &ordered {
                if cx.is_fixed(child, align)? {
                    continue;
                }
                let extent = cx.dims(child)?[a].size_or_zero();
                let value = match self.alignment {
                    Alignment::Start => baseline,
                    Alignment::Middle => baseline - extent / 2.0,
                    Alignment::End => baseline - extent,
                };
                cx.place(child, align, value)?;
            }
        }

        self.distribute(cx, &ordered)?;

        let mut mins = [f64::INFINITY; 2];
        let mut maxs = [f64::NEG_INFINITY; 2];
        for &child in &ids {
            let dims = cx.resolved_dims(child)?;
            for i in 0..2 {
                mins[i] = mins[i].min(dims[i].min.unwrap_or(0.0));
                maxs[i] = maxs[i].max(dims[i].max.unwrap_or(0.0));
            }
        }
        if n == 0 {
            mins = [0.0; 2];
            maxs = [0.0; 2];
        }

        let intrinsic = [
            AxisDims::from_extent(mins[0], maxs[0]),
            AxisDims::from_extent(mins[1], maxs[1]),
        ];
        let mut translate = [None, None];
        translate[s] = stack_pos.map(|p| p - mins[s]);
        translate[a] = align_pos.map(|p| p - mins[a]);
        Ok(LayoutOutput::new(intrinsic, translate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::dims::data;

    fn spaces(list: &[UnderlyingSpace]) -> Vec<[UnderlyingSpace; 2]> {
        list.iter()
            .map(|s| [s.clone(), UnderlyingSpace::Size(1.0)])
            .collect()
    }

    #[test]
    fn test_builders() {
        let spread = Spread::stack(Axis::Y).spacing(4.0).reverse(true).width(data(3.0));
        assert_eq!(spread.alignment, Alignment::Start);
        assert_eq!(spread.spacing, 4.0);
        assert!(spread.reverse);
        assert_eq!(spread.dims[0].size, Some(data(3.0)));
        assert_eq!(Spread::new(Axis::X).alignment, Alignment::Middle);
    }

    #[test]
    fn test_stack_space_with_spacing_is_ordinal() {
        let children = spaces(&[UnderlyingSpace::Size(4.0), UnderlyingSpace::Size(9.0)]);
        let cx = SpaceCx {
            children: children.iter().collect(),
            keys: vec!["a".into(), "b".into()],
            target: None,
        };
        let spread = Spread::stack(Axis::X).spacing(2.0);
        let [x, y] = spread.resolve_underlying_space(&cx);
        assert_eq!(x, UnderlyingSpace::Ordinal(vec!["a".into(), "b".into()]));
        assert!(y.is_position());
    }

    #[test]
    fn test_edge_domain_adds_spacing() {
        let children = [
            [Monotonic::linear(4.0, 0.0), Monotonic::linear(1.0, 0.0)],
            [Monotonic::linear(9.0, 0.0), Monotonic::linear(3.0, 0.0)],
            [Monotonic::linear(2.0, 0.0), Monotonic::linear(2.0, 0.0)],
        ];
        let cx = DomainCx {
            children: children.iter().collect(),
            target: None,
        };
        let [w, h] = Spread::new(Axis::X).spacing(2.0).infer_size_domains(&cx);
        assert_eq!(w.run(1.0), 19.0);
        assert!(w.is_linear());
        assert_eq!(h.run(2.0), 6.0);
    }

    #[test]
    fn test_center_domain_uses_outer_halves() {
        let children = [
            [Monotonic::linear(4.0, 0.0), Monotonic::constant(0.0)],
            [Monotonic::linear(100.0, 0.0), Monotonic::constant(0.0)],
            [Monotonic::linear(2.0, 0.0), Monotonic::constant(0.0)],
        ];
        let cx = DomainCx {
            children: children.iter().collect(),
            target: None,
        };
        let [w, _] = Spread::new(Axis::X)
            .spacing(10.0)
            .mode(SpreadMode::CenterToCenter)
            .infer_size_domains(&cx);
        assert_eq!(w.run(1.0), 2.0 + 20.0 + 1.0);
    }

    #[test]
    fn test_data_size_overrides_domain() {
        let cx = DomainCx {
            children: vec![],
            target: None,
        };
        let [w, h] = Spread::new(Axis::X).width(data(5.0)).infer_size_domains(&cx);
        assert_eq!(w.run(2.0), 10.0);
        assert_eq!(h.run(2.0), 0.0);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(SpreadMode::CenterToCenter.to_string(), "center-to-center");
    }
}
