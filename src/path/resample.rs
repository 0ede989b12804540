//! Adaptive resampling of paths under a coordinate transform
//!
//! Each segment is subdivided recursively, in source space, only where the
//! transformed chord fails to follow the transformed curve. The resulting
//! screen-space points are then joined by a smooth Catmull-Rom reconstruction.
//! Segments are processed independently; nothing is smoothed across segment
//! boundaries.

use serde::Deserialize;
use tracing::trace;

use crate::coord::CoordinateTransform;
use crate::layout::types::Point;

use super::catmull_rom::catmull_rom_to_bezier;
use super::{Path, PathSegment};

/// Tuning for adaptive resampling
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResampleOptions {
    /// Squared screen-space distance threshold
    pub delta2: f64,
    /// Recursion depth limit per segment
    pub max_depth: u32,
    /// Source-space chords longer than this are always split
    pub min_source_distance: f64,
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self {
            delta2: 0.25,
            max_depth: 16,
            min_source_distance: 10.0,
        }
    }
}

impl ResampleOptions {
    pub fn with_delta2(mut self, delta2: f64) -> Self {
        self.delta2 = delta2;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_source_distance(mut self, distance: f64) -> Self {
        self.min_source_distance = distance;
        self
    }
}

/// Transform `path` adaptively, returning smooth screen-space Bezier segments
pub fn resample_path(path: &Path, coord: &CoordinateTransform, options: &ResampleOptions) -> Path {
    let mut segments = Vec::new();
    for seg in &path.segments {
        let points = resample_segment_points(seg, coord, options);
        trace!(points = points.len(), "resampled segment");
        segments.extend(catmull_rom_to_bezier(&points));
    }
    Path {
        segments,
        closed: path.closed,
    }
}

/// Screen-space points for one segment, endpoints included
pub fn resample_segment_points(
    seg: &PathSegment,
    coord: &CoordinateTransform,
    options: &ResampleOptions,
) -> Vec<Point> {
    let mut points = vec![coord.transform(seg.start())];
    subdivide(seg, coord, options, options.max_depth, &mut points);
    points.push(coord.transform(seg.end()));
    points
}

fn subdivide(
    seg: &PathSegment,
    coord: &CoordinateTransform,
    options: &ResampleOptions,
    depth: u32,
    out: &mut Vec<Point>,
) {
    let p0 = coord.transform(seg.start());
    let p1 = coord.transform(seg.end());
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let d2 = dx * dx + dy * dy;

    if d2 <= 4.0 * options.delta2 || depth == 0 {
        return;
    }

    // For Beziers the split halves are reused for the recursion
    let (left, right) = seg.split(0.5);
    let source_mid = left.end();
    let mid = coord.transform(source_mid);
    let dx2 = mid.x - p0.x;
    let dy2 = mid.y - p0.y;
    let dz = dy * dx2 - dx * dy2;

    let bends = dz * dz / d2 > options.delta2;
    let off_center = ((dx * dx2 + dy * dy2) / d2 - 0.5).abs() > 0.3;
    let too_long = seg.start().distance(seg.end()) > options.min_source_distance;

    if bends || off_center || too_long {
        subdivide(&left, coord, options, depth - 1, out);
        out.push(mid);
        subdivide(&right, coord, options, depth - 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_transform_keeps_short_chord() {
        let seg = PathSegment::line(Point::new(0.0, 0.0), Point::new(5.0, 0.0));
        let points =
            resample_segment_points(&seg, &CoordinateTransform::linear(), &ResampleOptions::default());
        assert_eq!(points, vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
    }

    #[test]
    fn test_long_source_chord_is_split() {
        let seg = PathSegment::line(Point::new(0.0, 0.0), Point::new(40.0, 0.0));
        let points =
            resample_segment_points(&seg, &CoordinateTransform::linear(), &ResampleOptions::default());
        // 40 → 20 → 10: split twice, four pieces
        assert_eq!(points.len(), 5);
        assert_eq!(points[2], Point::new(20.0, 0.0));
    }

    #[test]
    fn test_zero_depth_keeps_endpoints_only() {
        let seg = PathSegment::line(Point::new(0.0, 10.0), Point::new(3.0, 10.0));
        let options = ResampleOptions::default().with_max_depth(0);
        let points = resample_segment_points(&seg, &CoordinateTransform::polar(), &options);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_polar_arc_is_refined() {
        let seg = PathSegment::line(Point::new(0.0, 50.0), Point::new(std::f64::consts::PI, 50.0));
        let points =
            resample_segment_points(&seg, &CoordinateTransform::polar(), &ResampleOptions::default());
        assert!(points.len() > 8);
        for p in &points {
            assert!((p.distance(Point::new(0.0, 0.0)) - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_segments_are_independent() {
        let path = Path::new(vec![
            PathSegment::line(Point::new(0.0, 0.0), Point::new(4.0, 0.0)),
            PathSegment::line(Point::new(4.0, 0.0), Point::new(4.0, 3.0)),
        ]);
        let out = resample_path(&path, &CoordinateTransform::linear(), &ResampleOptions::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out.segments[0].end(), Point::new(4.0, 0.0));
        assert_eq!(out.segments[1].start(), Point::new(4.0, 0.0));
    }
}
