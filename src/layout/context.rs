//! Per-render registries
//!
//! A [`RenderContext`] is created at the start of every render pass and
//! threaded through each traversal. It owns the name scope, the key registry,
//! the colour and unit scales, and the warnings collected along the way.

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::palette::Palette;

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::node::NodeId;
use super::operators::SpreadMode;
use super::types::{Alignment, Axis, Size};

/// A non-fatal layout inconsistency
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutWarning {
    /// Two or more already-positioned children disagree on the align baseline
    InconsistentBaseline {
        node: NodeId,
        alignment: Alignment,
        baselines: Vec<f64>,
    },
    /// An already-positioned child is not where the distribution order puts it
    OrderMismatch {
        node: NodeId,
        mode: SpreadMode,
        expected: f64,
        actual: f64,
    },
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutWarning::InconsistentBaseline {
                node,
                alignment,
                baselines,
            } => write!(
                f,
                "{node}: fixed children have inconsistent {alignment:?} baselines {baselines:?}"
            ),
            LayoutWarning::OrderMismatch {
                node,
                mode,
                expected,
                actual,
            } => write!(
                f,
                "{node}: fixed child at {actual} but {mode} order expects {expected}"
            ),
        }
    }
}

/// Data-unit scale along one axis, recorded by spreads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    /// Data range `[0, size / scale_factor]`
    pub domain: [f64; 2],
    pub scale_factor: f64,
}

/// Categorical colour assignment in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorScale {
    assigned: BTreeMap<String, String>,
    order: Vec<String>,
}

impl ColorScale {
    /// Assign the next palette colour to `key` unless it already has one
    pub fn register(&mut self, key: &str, palette: &Palette) -> &str {
        if !self.assigned.contains_key(key) {
            let color = palette.color(self.order.len()).to_string();
            self.order.push(key.to_string());
            self.assigned.insert(key.to_string(), color);
        }
        self.assigned.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.assigned.get(key).map(String::as_str)
    }

    /// Keys in registration order
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Colour and unit scales of one render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleContext {
    pub color: ColorScale,
    pub unit: Size<Option<UnitScale>>,
}

/// Registries shared by every traversal of one render pass
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub config: LayoutConfig,
    pub palette: Palette,
    pub scales: ScaleContext,
    scope: BTreeMap<String, NodeId>,
    keys: BTreeMap<String, NodeId>,
    ref_targets: BTreeMap<NodeId, NodeId>,
    warnings: Vec<LayoutWarning>,
}

impl RenderContext {
    pub fn new(config: LayoutConfig, palette: Palette) -> Self {
        Self {
            config,
            palette,
            scales: ScaleContext::default(),
            scope: BTreeMap::new(),
            keys: BTreeMap::new(),
            ref_targets: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Drop everything registered by a previous pass. Configuration and
    /// palette are kept; names, keys, ref targets, scales and warnings
    /// belong to one pass only.
    pub fn begin_pass(&mut self) {
        self.scales = ScaleContext::default();
        self.scope.clear();
        self.keys.clear();
        self.ref_targets.clear();
        self.warnings.clear();
    }

    /// Register a named node; later registrations shadow earlier ones
    pub fn register_name(&mut self, name: &str, node: NodeId) {
        self.scope.insert(name.to_string(), node);
    }

    pub fn register_key(&mut self, key: &str, node: NodeId) {
        self.keys.insert(key.to_string(), node);
    }

    /// Look up a name, failing with the registered names listed
    pub fn lookup(&self, name: &str) -> Result<NodeId, LayoutError> {
        self.scope
            .get(name)
            .copied()
            .ok_or_else(|| LayoutError::unresolved(name, self.scope.keys().cloned().collect()))
    }

    pub fn lookup_key(&self, key: &str) -> Option<NodeId> {
        self.keys.get(key).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.scope.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub(crate) fn set_ref_target(&mut self, reference: NodeId, target: NodeId) {
        self.ref_targets.insert(reference, target);
    }

    /// Target a Ref was resolved to
    pub fn ref_target(&self, reference: NodeId) -> Option<NodeId> {
        self.ref_targets.get(&reference).copied()
    }

    /// Give a categorical value its palette colour
    pub fn register_color(&mut self, key: &str) -> &str {
        self.scales.color.register(key, &self.palette)
    }

    pub fn set_unit_scale(&mut self, axis: Axis, scale: UnitScale) {
        self.scales.unit[axis.index()] = Some(scale);
    }

    /// Record and log a layout inconsistency
    pub fn warn(&mut self, warning: LayoutWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.warnings
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), Palette::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_missing_lists_names() {
        let mut cx = RenderContext::default();
        cx.register_name("bars", NodeId(0));
        cx.register_name("line", NodeId(1));
        assert_eq!(cx.lookup("line").unwrap(), NodeId(1));
        match cx.lookup("bar") {
            Err(LayoutError::UnresolvedReference { name, available }) => {
                assert_eq!(name, "bar");
                assert_eq!(available, vec!["bars".to_string(), "line".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_begin_pass_clears_registries() {
        let mut cx = RenderContext::default();
        cx.register_name("bars", NodeId(0));
        cx.register_key("mon", NodeId(1));
        cx.set_ref_target(NodeId(2), NodeId(0));
        cx.register_color("north");
        cx.set_unit_scale(Axis::Y, UnitScale { domain: [0.0, 10.0], scale_factor: 2.0 });
        cx.warn(LayoutWarning::InconsistentBaseline {
            node: NodeId(3),
            alignment: Alignment::Start,
            baselines: vec![0.0, 1.0],
        });

        cx.begin_pass();
        assert!(cx.lookup("bars").is_err());
        assert_eq!(cx.lookup_key("mon"), None);
        assert_eq!(cx.ref_target(NodeId(2)), None);
        assert!(cx.scales.color.is_empty());
        assert_eq!(cx.scales.unit, [None, None]);
        assert!(cx.warnings().is_empty());
        assert_eq!(cx.config, LayoutConfig::default());
    }

    #[test]
    fn test_color_scale_assigns_in_order() {
        let palette = Palette::default();
        let mut scale = ColorScale::default();
        scale.register("b", &palette);
        scale.register("a", &palette);
        scale.register("b", &palette);
        assert_eq!(scale.len(), 2);
        assert_eq!(scale.get("b"), Some(palette.color(0)));
        assert_eq!(scale.get("a"), Some(palette.color(1)));
        assert_eq!(scale.keys(), &["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_color_scale_wraps_palette() {
        let palette = Palette::default();
        let mut scale = ColorScale::default();
        for i in 0..7 {
            scale.register(&format!("k{i}"), &palette);
        }
        assert_eq!(scale.get("k6"), scale.get("k0"));
    }

    #[test]
    fn test_warnings_are_collected() {
        let mut cx = RenderContext::default();
        cx.warn(LayoutWarning::OrderMismatch {
            node: NodeId(2),
            mode: SpreadMode::EdgeToEdge,
            expected: 1.0,
            actual: 3.0,
        });
        assert_eq!(cx.warnings().len(), 1);
        assert!(cx.warnings()[0].to_string().contains("edge-to-edge"));
    }
}
