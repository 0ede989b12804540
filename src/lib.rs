//! gofish-layout - a declarative scene-graph layout engine
//!
//! Scenes are trees of composable operators (spread, stack, layer, position,
//! connect, coord, ...) over leaf marks. The engine infers what kind of
//! space each axis lives in, predicts how big every node gets as a function
//! of a scale factor, solves shared scales so charts fill their budget, and
//! places everything relative to its parent. Non-linear coordinate
//! transforms such as polar are supported by adaptive path resampling.
//!
//! # Example
//!
//! ```rust
//! use gofish_layout::layout::{data, Axis, Node, Rect, SceneGraph, Spread};
//! use gofish_layout::render_svg;
//!
//! let mut graph = SceneGraph::new();
//! let bars = [4.0, 9.0, 2.0]
//!     .into_iter()
//!     .map(|h| graph.leaf(Node::new(Rect::new().width(20.0).height(data(h)))))
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! let chart = Spread::stack(Axis::X).spacing(8.0).shared_scale(true);
//! let root = graph.add(Node::new(chart), bars).unwrap();
//!
//! let svg = render_svg(&mut graph, root).unwrap();
//! assert!(svg.contains("<svg"));
//! assert_eq!(svg.matches("<rect").count(), 3);
//! ```

pub mod coord;
pub mod error;
pub mod layout;
pub mod palette;
pub mod path;
pub mod renderer;

pub use coord::CoordinateTransform;
pub use error::ConfigError;
pub use layout::{layout, LayoutConfig, LayoutError, LayoutResult, NodeId, SceneGraph};
pub use palette::Palette;
pub use path::ResampleOptions;
pub use renderer::{render, SvgBackend, SvgConfig};

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use layout::RenderContext;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Error loading configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// Path resampling under non-linear transforms
    pub resample: ResampleOptions,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Categorical colours
    pub palette: Palette,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the resampling options
    pub fn with_resample(mut self, options: ResampleOptions) -> Self {
        self.resample = options;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the palette
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Parse a TOML document; every table is optional
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Lay out and render the tree under `root` to SVG with default configuration
pub fn render_svg(graph: &mut SceneGraph, root: NodeId) -> Result<String, RenderError> {
    render_svg_with_config(graph, root, &RenderConfig::default())
}

/// Lay out and render the tree under `root` to SVG
///
/// # Example
///
/// ```rust
/// use gofish_layout::layout::{Node, Rect, SceneGraph};
/// use gofish_layout::{render_svg_with_config, LayoutConfig, RenderConfig, SvgConfig};
///
/// let mut graph = SceneGraph::new();
/// let root = graph.leaf(Node::new(Rect::new().width(10.0).height(5.0))).unwrap();
/// let config = RenderConfig::new()
///     .with_layout(LayoutConfig::new().with_size(200.0, 100.0))
///     .with_svg(SvgConfig::new().with_xml_declaration(false).with_flip_y(false));
///
/// let svg = render_svg_with_config(&mut graph, root, &config).unwrap();
/// assert!(svg.starts_with("<svg"));
/// ```
pub fn render_svg_with_config(
    graph: &mut SceneGraph,
    root: NodeId,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    let mut context = RenderContext::new(config.layout.clone(), config.palette.clone());
    let result = layout::layout(graph, &mut context, root)?;
    debug!(bounds = ?result.bounds, warnings = result.warnings.len(), "layout finished");

    let mut backend = SvgBackend::new(config.svg.clone());
    let body = render(graph, &context, root, &config.resample, &mut backend)?;
    Ok(backend.finish(body, result.bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout::{Node, Rect};

    #[test]
    fn test_render_single_rect() {
        let mut graph = SceneGraph::new();
        let root = graph.leaf(Node::new(Rect::new().width(10.0).height(5.0))).unwrap();
        let svg = render_svg(&mut graph, root).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("gf-rect"));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn test_config_from_toml() {
        let config = RenderConfig::from_toml_str(
            r##"
            [layout]
            width = 640.0
            height = 480.0

            [layout.inverse]
            tolerance = 0.01

            [resample]
            delta2 = 1.0

            [svg]
            flip_y = false

            [palette]
            colors = ["#000000", "#ffffff"]
            "##,
        )
        .unwrap();
        assert_eq!(config.layout.width, 640.0);
        assert_eq!(config.layout.inverse.tolerance, 0.01);
        assert_eq!(config.resample.delta2, 1.0);
        assert!(!config.svg.flip_y);
        assert_eq!(config.palette.colors.len(), 2);
        assert_eq!(config.svg.class_prefix, "gf-");
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(RenderConfig::from_toml_str("").unwrap(), RenderConfig::default());
    }

    #[test]
    fn test_bad_config_is_parse_error() {
        let err = RenderConfig::from_toml_str("[layout]\nwidth = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
