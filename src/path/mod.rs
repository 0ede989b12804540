//! Path geometry
//!
//! A [`Path`] is an ordered list of line and cubic Bezier segments. Paths are
//! immutable values: transforming, subdividing or resampling one produces a
//! new path.

pub mod catmull_rom;
pub mod resample;

use std::fmt::Write;

use crate::coord::CoordinateTransform;
use crate::layout::types::Point;

pub use catmull_rom::catmull_rom_to_bezier;
pub use resample::{resample_path, ResampleOptions};

/// A segment of a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line {
        p0: Point,
        p1: Point,
    },
    Bezier {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
}

impl PathSegment {
    pub fn line(p0: Point, p1: Point) -> Self {
        PathSegment::Line { p0, p1 }
    }

    pub fn bezier(start: Point, control1: Point, control2: Point, end: Point) -> Self {
        PathSegment::Bezier {
            start,
            control1,
            control2,
            end,
        }
    }

    pub fn start(&self) -> Point {
        match self {
            PathSegment::Line { p0, .. } => *p0,
            PathSegment::Bezier { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            PathSegment::Line { p1, .. } => *p1,
            PathSegment::Bezier { end, .. } => *end,
        }
    }

    /// Point at parameter `t` in `[0, 1]`
    pub fn point_at(&self, t: f64) -> Point {
        match self {
            PathSegment::Line { p0, p1 } => p0.lerp(*p1, t),
            PathSegment::Bezier { .. } => self.split(t).0.end(),
        }
    }

    /// Split at parameter `t`; Beziers use de Casteljau
    pub fn split(&self, t: f64) -> (PathSegment, PathSegment) {
        match *self {
            PathSegment::Line { p0, p1 } => {
                let mid = p0.lerp(p1, t);
                (PathSegment::line(p0, mid), PathSegment::line(mid, p1))
            }
            PathSegment::Bezier {
                start,
                control1,
                control2,
                end,
            } => {
                let a = start.lerp(control1, t);
                let b = control1.lerp(control2, t);
                let c = control2.lerp(end, t);
                let ab = a.lerp(b, t);
                let bc = b.lerp(c, t);
                let mid = ab.lerp(bc, t);
                (
                    PathSegment::bezier(start, a, ab, mid),
                    PathSegment::bezier(mid, bc, c, end),
                )
            }
        }
    }

    /// Apply `f` to every point, control points included
    pub fn map(&self, f: impl Fn(Point) -> Point) -> PathSegment {
        match *self {
            PathSegment::Line { p0, p1 } => PathSegment::line(f(p0), f(p1)),
            PathSegment::Bezier {
                start,
                control1,
                control2,
                end,
            } => PathSegment::bezier(f(start), f(control1), f(control2), f(end)),
        }
    }
}

/// An ordered sequence of segments, optionally closed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub segments: Vec<PathSegment>,
    pub closed: bool,
}

impl Path {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self {
            segments,
            closed: false,
        }
    }

    /// Single straight segment
    pub fn line(p0: Point, p1: Point) -> Self {
        Self::new(vec![PathSegment::line(p0, p1)])
    }

    /// Polyline through `points`; a closed polygon also gets the closing edge
    pub fn polyline(points: &[Point], closed: bool) -> Self {
        let mut segments: Vec<PathSegment> = points
            .windows(2)
            .map(|w| PathSegment::line(w[0], w[1]))
            .collect();
        if closed {
            if let (Some(first), Some(last)) = (points.first(), points.last()) {
                if points.len() > 2 && first != last {
                    segments.push(PathSegment::line(*last, *first));
                }
            }
        }
        Self { segments, closed }
    }

    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Segment endpoints in order, without repeating shared endpoints
    pub fn points(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.segments.len() + 1);
        for seg in &self.segments {
            if points.last() != Some(&seg.start()) {
                points.push(seg.start());
            }
            points.push(seg.end());
        }
        points
    }

    /// Convert to an SVG path `d` attribute string
    pub fn to_svg_d(&self) -> String {
        let mut d = String::new();
        let mut cursor: Option<Point> = None;

        for seg in &self.segments {
            let start = seg.start();
            let continuous = cursor.is_some_and(|c| c.distance_squared(start) < 1e-18);
            if !continuous {
                let sep = if d.is_empty() { "" } else { " " };
                let _ = write!(d, "{}M{:.2} {:.2}", sep, start.x, start.y);
            }
            match seg {
                PathSegment::Line { p1, .. } => {
                    let _ = write!(d, " L{:.2} {:.2}", p1.x, p1.y);
                }
                PathSegment::Bezier {
                    control1,
                    control2,
                    end,
                    ..
                } => {
                    let _ = write!(
                        d,
                        " C{:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
                        control1.x, control1.y, control2.x, control2.y, end.x, end.y
                    );
                }
            }
            cursor = Some(seg.end());
        }

        if self.closed && !d.is_empty() {
            d.push_str(" Z");
        }
        d
    }
}

/// Split every segment into `n` equal-parameter line pieces
pub fn subdivide_path(path: &Path, n: usize) -> Path {
    let n = n.max(1);
    let mut segments = Vec::with_capacity(path.len() * n);
    for seg in &path.segments {
        let mut prev = seg.start();
        for i in 1..=n {
            let next = if i == n {
                seg.end()
            } else {
                seg.point_at(i as f64 / n as f64)
            };
            segments.push(PathSegment::line(prev, next));
            prev = next;
        }
    }
    Path {
        segments,
        closed: path.closed,
    }
}

/// Map every point of the path, control points included, through the transform
pub fn transform_path(path: &Path, coord: &CoordinateTransform) -> Path {
    Path {
        segments: path
            .segments
            .iter()
            .map(|seg| seg.map(|p| coord.transform(p)))
            .collect(),
        closed: path.closed,
    }
}

/// Shift every point of the path by `offset`
pub fn translate_path(path: &Path, offset: Point) -> Path {
    Path {
        segments: path.segments.iter().map(|seg| seg.map(|p| p + offset)).collect(),
        closed: path.closed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_bezier_split_midpoint() {
        let curve = PathSegment::bezier(
            Point::new(0.0, 0.0),
            Point::new(0.0, 4.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 0.0),
        );
        let (left, right) = curve.split(0.5);
        assert_eq!(left.end(), Point::new(2.0, 3.0));
        assert_eq!(right.start(), Point::new(2.0, 3.0));
        assert_eq!(curve.point_at(0.5), Point::new(2.0, 3.0));
        assert_eq!(right.end(), Point::new(4.0, 0.0));
    }

    #[test]
    fn test_polyline_closed() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let path = Path::polyline(&square, true);
        assert_eq!(path.len(), 4);
        assert_eq!(path.points().len(), 5);
    }

    #[test]
    fn test_svg_d() {
        let path = Path::polyline(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 5.5)], false);
        assert_snapshot!(path.to_svg_d(), @"M0.00 0.00 L10.00 0.00 L10.00 5.50");
    }

    #[test]
    fn test_svg_d_disjoint_and_closed() {
        let path = Path::new(vec![
            PathSegment::line(Point::new(0.0, 0.0), Point::new(1.0, 0.0)),
            PathSegment::bezier(
                Point::new(5.0, 5.0),
                Point::new(6.0, 5.0),
                Point::new(7.0, 5.0),
                Point::new(8.0, 5.0),
            ),
        ])
        .closed();
        assert_snapshot!(
            path.to_svg_d(),
            @"M0.00 0.00 L1.00 0.00 M5.00 5.00 C6.00 5.00 7.00 5.00 8.00 5.00 Z"
        );
    }

    #[test]
    fn test_svg_d_empty() {
        assert_eq!(Path::default().to_svg_d(), "");
    }

    #[test]
    fn test_subdivide_path() {
        let path = Path::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let pieces = subdivide_path(&path, 4);
        assert_eq!(pieces.len(), 4);
        assert_eq!(pieces.segments[1].start(), Point::new(2.5, 0.0));
        assert_eq!(pieces.segments[3].end(), Point::new(10.0, 0.0));
    }

    #[test]
    fn test_transform_path_maps_control_points() {
        let path = Path::new(vec![PathSegment::bezier(
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(3.0, 1.0),
        )]);
        let shear = CoordinateTransform::custom(
            "shear",
            CoordinateTransform::linear().domain(),
            |p| Point::new(p.x + p.y, p.y),
        );
        let mapped = transform_path(&path, &shear);
        match mapped.segments[0] {
            PathSegment::Bezier { control1, control2, .. } => {
                assert_eq!(control1, Point::new(2.0, 1.0));
                assert_eq!(control2, Point::new(3.0, 1.0));
            }
            PathSegment::Line { .. } => panic!("expected a bezier"),
        }
    }
}
