//! Configuration for the layout engine

use serde::Deserialize;

use super::monotonic::InverseOptions;
use super::types::Point;

/// Configuration options for a layout pass
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Pixel budget for the root node (width)
    pub width: f64,

    /// Pixel budget for the root node (height)
    pub height: f64,

    /// Where the root node is placed
    pub origin: Point,

    /// Search options used when solving shared scale factors
    pub inverse: InverseOptions,

    /// Fixed siblings whose baselines differ by more than this are reported
    pub baseline_tolerance: f64,

    /// Radial inset subtracted from the radius available to a coord node
    pub coord_inset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            origin: Point::new(0.0, 0.0),
            inverse: InverseOptions::default(),
            baseline_tolerance: 1e-6,
            coord_inset: 30.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root pixel budget
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set where the root node is placed
    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin = Point::new(x, y);
        self
    }

    /// Set the inverse search options
    pub fn with_inverse(mut self, inverse: InverseOptions) -> Self {
        self.inverse = inverse;
        self
    }

    /// Set the coord radial inset
    pub fn with_coord_inset(mut self, inset: f64) -> Self {
        self.coord_inset = inset;
        self
    }
}
