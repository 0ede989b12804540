//! Screen-space extent estimation for non-linear transforms

use crate::layout::types::{BoundingBox, Point};

use super::CoordinateTransform;

/// Coordinate-space points that cover the box `[min_x, max_x] × [min_y, max_y]`.
///
/// Corners and evenly spaced edge points are always included. Radial
/// transforms also get the pole and an interior grid so the bulge of the
/// outer arc is not missed.
pub fn sample_points(
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    coord: &CoordinateTransform,
) -> Vec<Point> {
    let width = max_x - min_x;
    let height = max_y - min_y;
    let radial = coord.kind().is_radial();

    let mut samples = vec![
        Point::new(min_x, min_y),
        Point::new(max_x, min_y),
        Point::new(min_x, max_y),
        Point::new(max_x, max_y),
    ];

    let edge_samples = if radial { 50 } else { 20 };
    for i in 0..=edge_samples {
        let t = i as f64 / edge_samples as f64;
        samples.push(Point::new(min_x + width * t, min_y));
        samples.push(Point::new(min_x + width * t, max_y));
        samples.push(Point::new(min_x, min_y + height * t));
        samples.push(Point::new(max_x, min_y + height * t));
    }

    if radial {
        samples.push(Point::new((min_x + max_x) / 2.0, 0.0));
        for i in 0..=10 {
            let r = min_y + height * i as f64 / 10.0;
            for j in 0..=20 {
                let theta = min_x + width * j as f64 / 20.0;
                samples.push(Point::new(theta, r));
            }
        }
    }

    samples
}

/// Screen-space bounding box of a coordinate-space box
pub fn transformed_bounding_box(
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    coord: &CoordinateTransform,
) -> BoundingBox {
    let screen = sample_points(min_x, max_x, min_y, max_y, coord)
        .into_iter()
        .map(|p| coord.transform(p));
    BoundingBox::from_points(screen).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn test_linear_bbox_is_the_box() {
        let bbox = transformed_bounding_box(1.0, 4.0, 2.0, 8.0, &CoordinateTransform::linear());
        assert!((bbox.x - 1.0).abs() < TOLERANCE);
        assert!((bbox.y - 2.0).abs() < TOLERANCE);
        assert!((bbox.width - 3.0).abs() < TOLERANCE);
        assert!((bbox.height - 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_full_circle_bbox() {
        let bbox = transformed_bounding_box(0.0, 2.0 * PI, 0.0, 50.0, &CoordinateTransform::polar());
        assert!((bbox.x + 50.0).abs() < TOLERANCE);
        assert!((bbox.y + 50.0).abs() < TOLERANCE);
        assert!((bbox.width - 100.0).abs() < TOLERANCE);
        assert!((bbox.height - 100.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_quarter_annulus_bbox() {
        // first quadrant: θ from 12 o'clock to 3 o'clock
        let bbox = transformed_bounding_box(0.0, FRAC_PI_2, 10.0, 20.0, &CoordinateTransform::clock());
        assert!(bbox.x.abs() < TOLERANCE);
        assert!(bbox.y.abs() < TOLERANCE);
        assert!((bbox.right() - 20.0).abs() < TOLERANCE);
        assert!((bbox.bottom() - 20.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_radial_sampling_includes_interior() {
        let linear = sample_points(0.0, 1.0, 0.0, 1.0, &CoordinateTransform::linear());
        let polar = sample_points(0.0, 1.0, 0.0, 1.0, &CoordinateTransform::polar());
        assert_eq!(linear.len(), 4 + 4 * 21);
        assert_eq!(polar.len(), 4 + 4 * 51 + 1 + 11 * 21);
    }
}
