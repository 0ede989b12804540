//! Position: centre a single child on a point

use crate::layout::dims::{compute_aesthetic, AxisDims, Encoded, Interval};
use crate::layout::error::LayoutError;
use crate::layout::monotonic::Monotonic;
use crate::layout::operator::{DomainCx, LayoutCx, LayoutOperator, LayoutOutput, LayoutRequest, SpaceCx};
use crate::layout::space::UnderlyingSpace;
use crate::layout::types::{Axis, Size};

/// Places its one child so that the child's center lands on `(x, y)`.
///
/// Coordinates are in the parent's frame; an axis without a value centres
/// the child on 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: Option<Encoded>,
    pub y: Option<Encoded>,
}

impl Position {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(mut self, x: impl Into<Encoded>) -> Self {
        self.x = Some(x.into());
        self
    }

    pub fn y(mut self, y: impl Into<Encoded>) -> Self {
        self.y = Some(y.into());
        self
    }

    fn value(&self, axis: Axis) -> Option<Encoded> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

impl LayoutOperator for Position {
    fn resolve_underlying_space(&self, _cx: &SpaceCx<'_>) -> Size<UnderlyingSpace> {
        Axis::ALL.map(|axis| match self.value(axis) {
            Some(Encoded::Data(v)) => UnderlyingSpace::Position(Interval::point(v)),
            _ => UnderlyingSpace::Undefined,
        })
    }

    fn infer_size_domains(&self, cx: &DomainCx<'_>) -> Size<Monotonic> {
        match cx.children.first() {
            Some(domains) => (*domains).clone(),
            None => [Monotonic::constant(0.0), Monotonic::constant(0.0)],
        }
    }

    fn layout(&self, cx: &mut LayoutCx<'_>, request: LayoutRequest) -> Result<LayoutOutput, LayoutError> {
        let children = cx.children()?;
        let Some(&child) = children.first() else {
            return Err(LayoutError::arity("position", "exactly 1", 0));
        };
        cx.layout_child(child, request)?;

        let mut intrinsic = [AxisDims::default(); 2];
        for axis in Axis::ALL {
            let i = axis.index();
            let center = compute_aesthetic(self.value(axis), request.pos_scales[i].as_ref(), None).unwrap_or(0.0);
            let child_intrinsic = cx.graph().intrinsic_dims(child)?[i];
            let offset = center - child_intrinsic.size_or_zero() / 2.0;
            cx.place(child, axis, offset)?;
            intrinsic[i] = cx.resolved_dims(child)?[i];
        }

        Ok(LayoutOutput::new(intrinsic, [Some(0.0), Some(0.0)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::dims::{data, Interval};

    #[test]
    fn test_data_value_is_a_point_domain() {
        let cx = SpaceCx {
            children: vec![],
            keys: vec![],
            target: None,
        };
        let [x, y] = Position::new().x(data(3.0)).y(12.0).resolve_underlying_space(&cx);
        assert_eq!(x, UnderlyingSpace::Position(Interval::point(3.0)));
        assert_eq!(y, UnderlyingSpace::Undefined);
    }

    #[test]
    fn test_domains_follow_child() {
        let child = [Monotonic::linear(2.0, 1.0), Monotonic::constant(5.0)];
        let cx = DomainCx {
            children: vec![&child],
            target: None,
        };
        let [w, h] = Position::new().infer_size_domains(&cx);
        assert_eq!(w.run(3.0), 7.0);
        assert_eq!(h.run(3.0), 5.0);
    }
}
