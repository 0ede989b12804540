//! Centripetal Catmull-Rom reconstruction
//!
//! Converts a list of screen-space points into a chain of cubic Bezier
//! segments passing through every point. The parameterization is
//! centripetal (α = 0.5): neighbouring chords are weighted by the square
//! root of their length, which avoids cusps and overshoot where points are
//! irregularly spaced. The first and last points are duplicated to stand in
//! for the missing outer neighbours.

use crate::layout::types::Point;

use super::PathSegment;

const EPSILON: f64 = 1e-12;

/// Bezier chain through `points`.
///
/// Degenerate inputs fall back to nothing (no points), a zero-length line
/// (one point) and a straight line (two points).
pub fn catmull_rom_to_bezier(points: &[Point]) -> Vec<PathSegment> {
    match points {
        [] => Vec::new(),
        [p] => vec![PathSegment::line(*p, *p)],
        [p0, p1] => vec![PathSegment::line(*p0, *p1)],
        _ => {
            let last = points.len() - 1;
            (0..last)
                .map(|i| {
                    let p0 = points[i.saturating_sub(1)];
                    let p1 = points[i];
                    let p2 = points[i + 1];
                    let p3 = points[(i + 2).min(last)];
                    segment(p0, p1, p2, p3)
                })
                .collect()
        }
    }
}

/// Bezier from `p1` to `p2` with `p0` and `p3` as outer neighbours
fn segment(p0: Point, p1: Point, p2: Point, p3: Point) -> PathSegment {
    // l_a = d^α and l_2a = d^2α with α = 0.5
    let l01_2a = p0.distance(p1);
    let l12_2a = p1.distance(p2);
    let l23_2a = p2.distance(p3);
    let l01_a = l01_2a.sqrt();
    let l12_a = l12_2a.sqrt();
    let l23_a = l23_2a.sqrt();

    let control1 = if l01_a > EPSILON {
        let a = 2.0 * l01_2a + 3.0 * l01_a * l12_a + l12_2a;
        let n = 3.0 * l01_a * (l01_a + l12_a);
        (p1 * a - p0 * l12_2a + p2 * l01_2a) * (1.0 / n)
    } else {
        p1
    };

    let control2 = if l23_a > EPSILON {
        let b = 2.0 * l23_2a + 3.0 * l23_a * l12_a + l12_2a;
        let m = 3.0 * l23_a * (l23_a + l12_a);
        (p2 * b + p1 * l23_2a - p3 * l12_2a) * (1.0 / m)
    } else {
        p2
    };

    PathSegment::bezier(p1, control1, control2, p2)
}
