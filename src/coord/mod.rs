//! Coordinate transforms
//!
//! A [`CoordinateTransform`] maps points from a coordinate space (for polar,
//! `(θ, r)`) to screen space, and carries the nominal domain of each axis.
//! Path resampling and bounding-box sampling depend on nothing else.

pub mod sampler;

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::rc::Rc;

use crate::layout::dims::Interval;
use crate::layout::types::{Point, Size};

pub use sampler::{sample_points, transformed_bounding_box};

/// The family a transform belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordKind {
    Linear,
    Polar,
    /// Polar with 0 at twelve o'clock, increasing clockwise
    Clock,
    Custom(String),
}

impl CoordKind {
    pub fn name(&self) -> &str {
        match self {
            CoordKind::Linear => "linear",
            CoordKind::Polar => "polar",
            CoordKind::Clock => "clock",
            CoordKind::Custom(name) => name,
        }
    }

    /// Whether straight source lines can bend on screen
    pub fn is_radial(&self) -> bool {
        matches!(self, CoordKind::Polar | CoordKind::Clock)
    }
}

type MapFn = Rc<dyn Fn(Point) -> Point>;

/// A pluggable axis mapping from coordinate space to screen space
#[derive(Clone)]
pub struct CoordinateTransform {
    kind: CoordKind,
    domain: Size<Interval>,
    map: Option<MapFn>,
}

impl fmt::Debug for CoordinateTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinateTransform")
            .field("kind", &self.kind)
            .field("domain", &self.domain)
            .finish()
    }
}

impl CoordinateTransform {
    /// Identity mapping over `[0, 100]²`
    pub fn linear() -> Self {
        Self {
            kind: CoordKind::Linear,
            domain: [Interval::new(0.0, 100.0), Interval::new(0.0, 100.0)],
            map: None,
        }
    }

    /// `(θ, r)` to cartesian, θ measured clockwise from the positive y axis
    pub fn polar() -> Self {
        Self {
            kind: CoordKind::Polar,
            domain: [Interval::new(0.0, 2.0 * PI), Interval::new(0.0, 100.0)],
            map: None,
        }
    }

    pub fn clock() -> Self {
        Self {
            kind: CoordKind::Clock,
            ..Self::polar()
        }
    }

    /// A user-supplied mapping
    pub fn custom(
        name: impl Into<String>,
        domain: Size<Interval>,
        map: impl Fn(Point) -> Point + 'static,
    ) -> Self {
        Self {
            kind: CoordKind::Custom(name.into()),
            domain,
            map: Some(Rc::new(map)),
        }
    }

    pub fn with_domain(mut self, domain: Size<Interval>) -> Self {
        self.domain = domain;
        self
    }

    pub fn kind(&self) -> &CoordKind {
        &self.kind
    }

    pub fn is_linear(&self) -> bool {
        self.kind == CoordKind::Linear
    }

    pub fn domain(&self) -> Size<Interval> {
        self.domain
    }

    /// Map a coordinate-space point to screen space
    pub fn transform(&self, point: Point) -> Point {
        match (&self.kind, &self.map) {
            (_, Some(map)) => map(point),
            (CoordKind::Polar | CoordKind::Clock, None) => {
                let (theta, r) = (point.x, point.y);
                let angle = -theta + FRAC_PI_2;
                Point::new(r * angle.cos(), r * angle.sin())
            }
            _ => point,
        }
    }
}
