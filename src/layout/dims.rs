//! Intervals, partially-known dimensions and transforms
//!
//! A node's extent along an axis is described by [`AxisDims`], a box edge
//! description where any consistent subset of `min`, `center`, `max` and
//! `size` may be known. Operators fill these in during layout; the two axes
//! always travel together as [`Dimensions`].

use super::domain::PosScale;
use super::types::{Alignment, Axis, Size};

/// A closed scalar range `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Degenerate interval `[v, v]`
    pub fn point(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Smallest interval covering both
    pub fn union(&self, other: &Interval) -> Interval {
        Interval::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Union of every interval, `None` when there are none
    pub fn union_all<'a>(intervals: impl IntoIterator<Item = &'a Interval>) -> Option<Interval> {
        intervals
            .into_iter()
            .fold(None, |acc: Option<Interval>, next| match acc {
                Some(acc) => Some(acc.union(next)),
                None => Some(*next),
            })
    }
}

/// Partially-specified extent of a node along one axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisDims {
    pub min: Option<f64>,
    pub center: Option<f64>,
    pub max: Option<f64>,
    pub size: Option<f64>,
    /// Whether this extent is bound to continuous data rather than chosen freely
    pub embedded: bool,
}

impl AxisDims {
    /// Fully-known extent spanning `[min, max]`
    pub fn from_extent(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            center: Some((min + max) / 2.0),
            max: Some(max),
            size: Some(max - min),
            embedded: false,
        }
    }

    /// Extent of the given signed size anchored at the local origin.
    ///
    /// Positive sizes grow from 0 to `size`; negative sizes grow downward so
    /// that `max` stays at 0.
    pub fn from_size(size: f64) -> Self {
        Self {
            min: Some(if size >= 0.0 { 0.0 } else { size }),
            center: Some(size / 2.0),
            max: Some(if size >= 0.0 { size } else { 0.0 }),
            size: Some(size),
            embedded: false,
        }
    }

    /// Only the size is known
    pub fn sized(size: f64) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn with_embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }

    /// Derive missing fields from the known ones where possible
    pub fn elaborate(mut self) -> Self {
        for _ in 0..2 {
            match (self.min, self.center, self.max, self.size) {
                (Some(min), _, Some(max), None) => self.size = Some(max - min),
                (Some(min), _, None, Some(size)) => self.max = Some(min + size),
                (None, _, Some(max), Some(size)) => self.min = Some(max - size),
                (None, Some(center), None, Some(size)) => {
                    self.min = Some(center - size / 2.0);
                    self.max = Some(center + size / 2.0);
                }
                (Some(min), Some(center), None, None) => {
                    self.max = Some(2.0 * center - min);
                }
                (None, Some(center), Some(max), None) => {
                    self.min = Some(2.0 * center - max);
                }
                _ => {}
            }
        }
        if self.center.is_none() {
            if let (Some(min), Some(max)) = (self.min, self.max) {
                self.center = Some((min + max) / 2.0);
            }
        }
        self
    }

    /// The same extent shifted by `offset`
    pub fn translated(&self, offset: f64) -> Self {
        Self {
            min: self.min.map(|v| v + offset),
            center: self.center.map(|v| v + offset),
            max: self.max.map(|v| v + offset),
            size: self.size,
            embedded: self.embedded,
        }
    }

    /// Field used as the alignment baseline
    pub fn baseline(&self, alignment: Alignment) -> Option<f64> {
        match alignment {
            Alignment::Start => self.min,
            Alignment::Middle => self.center,
            Alignment::End => self.max,
        }
    }

    pub fn size_or_zero(&self) -> f64 {
        self.size.unwrap_or(0.0)
    }
}

/// Extents along both axes
pub type Dimensions = Size<AxisDims>;

/// A node's own translation, filled in by layout and placement.
///
/// A `None` translate on an axis means the node has not been positioned
/// on that axis yet; the first placement fills it in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: Size<Option<f64>>,
    pub scale: Size<f64>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translate: [None, None],
            scale: [1.0, 1.0],
        }
    }

    pub fn translate(&self, axis: Axis) -> Option<f64> {
        self.translate[axis.index()]
    }

    pub fn translate_or_zero(&self, axis: Axis) -> f64 {
        self.translate(axis).unwrap_or(0.0)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// A scalar operator argument that is either bound to data or a literal aesthetic choice
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Encoded {
    /// Data value, mapped through scales and scale factors
    Data(f64),
    /// Literal pixel value
    Aesthetic(f64),
}

impl Encoded {
    pub fn is_data(&self) -> bool {
        matches!(self, Encoded::Data(_))
    }

    pub fn raw(&self) -> f64 {
        match self {
            Encoded::Data(v) | Encoded::Aesthetic(v) => *v,
        }
    }
}

impl From<f64> for Encoded {
    fn from(value: f64) -> Self {
        Encoded::Aesthetic(value)
    }
}

/// Shorthand for a data-bound value
pub fn data(value: f64) -> Encoded {
    Encoded::Data(value)
}

/// Returns the raw value when `input` is data-bound
pub fn data_value(input: Option<Encoded>) -> Option<f64> {
    match input {
        Some(Encoded::Data(v)) => Some(v),
        _ => None,
    }
}

pub fn is_data(input: Option<Encoded>) -> bool {
    matches!(input, Some(Encoded::Data(_)))
}

/// Map a position argument to pixels: data through the position scale,
/// literals as-is, falling back to `provided`
pub fn compute_aesthetic(
    input: Option<Encoded>,
    scale: Option<&PosScale>,
    provided: Option<f64>,
) -> Option<f64> {
    match input {
        Some(Encoded::Data(v)) => Some(scale.map_or(v, |s| s.apply(v))),
        Some(Encoded::Aesthetic(v)) => Some(v),
        None => provided,
    }
}

/// Map a size argument to pixels: data times the scale factor, literals
/// as-is, falling back to the size provided by the parent
pub fn compute_size(input: Option<Encoded>, scale_factor: Option<f64>, provided: f64) -> f64 {
    match input {
        Some(Encoded::Data(v)) => v * scale_factor.unwrap_or(1.0),
        Some(Encoded::Aesthetic(v)) => v,
        None => provided,
    }
}

/// Per-axis position and size arguments of an operator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisSpec {
    pub min: Option<Encoded>,
    pub size: Option<Encoded>,
}
