//! Underlying-space classification and unification
//!
//! Every node axis is classified into one [`UnderlyingSpace`] kind, inferred
//! bottom-up. The kind decides whether the root axis gets a continuous
//! position scale, categorical (ordinal) labels, or neither.
//!
//! Distributing operators unify their children differently per axis:
//!
//! | axis | children | result |
//! |------|----------|--------|
//! | stack | all Position, spacing 0 | Position `[0, Σ widths]` |
//! | stack | all Size, spacing 0 | Position `[0, Σ values]` |
//! | stack | anything else | Ordinal (child keys) |
//! | align | all Size, start/end | Position `∪ [0, v]` |
//! | align | all Size, middle | Difference `max |v|` |
//! | align | all Difference | Difference `max width` |
//! | align | all Position, start/end | Position `∪ domains` |
//! | align | all Position, middle | Difference `width(∪ domains)` |
//! | align | anything else | Undefined |
//!
//! Overlaying operators (layer, coord) use [`unify_layered`].

use super::dims::Interval;
use super::types::Alignment;

/// The inferred kind of one axis of one node
#[derive(Debug, Clone, PartialEq)]
pub enum UnderlyingSpace {
    /// Values map onto a continuous pixel scale
    Position(Interval),
    /// Only an extent is known, no absolute anchor
    Difference(f64),
    /// A literal, data-independent extent
    Size(f64),
    /// Categorical; position emerges from order, labelled by keys
    Ordinal(Vec<String>),
    /// Nothing is determinable
    Undefined,
}

impl UnderlyingSpace {
    pub fn ordinal() -> Self {
        UnderlyingSpace::Ordinal(Vec::new())
    }

    pub fn is_position(&self) -> bool {
        matches!(self, UnderlyingSpace::Position(_))
    }

    pub fn is_ordinal(&self) -> bool {
        matches!(self, UnderlyingSpace::Ordinal(_))
    }

    /// Continuous domain of a Position space
    pub fn domain(&self) -> Option<Interval> {
        match self {
            UnderlyingSpace::Position(domain) => Some(*domain),
            _ => None,
        }
    }

    /// Short name of the kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            UnderlyingSpace::Position(_) => "position",
            UnderlyingSpace::Difference(_) => "difference",
            UnderlyingSpace::Size(_) => "size",
            UnderlyingSpace::Ordinal(_) => "ordinal",
            UnderlyingSpace::Undefined => "undefined",
        }
    }
}

/// Result of unifying the align axis
#[derive(Debug, Clone, PartialEq)]
pub struct AlignUnification {
    pub space: UnderlyingSpace,
    /// The space came from Size children, so baseline alignment must run
    /// even when a position scale exists
    pub from_size: bool,
}

fn all_sizes(children: &[&UnderlyingSpace]) -> Option<Vec<f64>> {
    children
        .iter()
        .map(|s| match s {
            UnderlyingSpace::Size(v) => Some(*v),
            _ => None,
        })
        .collect()
}

fn all_differences(children: &[&UnderlyingSpace]) -> Option<Vec<f64>> {
    children
        .iter()
        .map(|s| match s {
            UnderlyingSpace::Difference(w) => Some(*w),
            _ => None,
        })
        .collect()
}

fn all_positions(children: &[&UnderlyingSpace]) -> Option<Vec<Interval>> {
    children.iter().map(|s| s.domain()).collect()
}

fn max_or_zero(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(0.0)
}

/// Unify children along the distribution axis of a stack/spread
pub fn unify_stack(children: &[&UnderlyingSpace], spacing: f64, keys: Vec<String>) -> UnderlyingSpace {
    if spacing == 0.0 {
        if let Some(domains) = all_positions(children) {
            let total: f64 = domains.iter().map(Interval::width).sum();
            return UnderlyingSpace::Position(Interval::new(0.0, total));
        }
        if let Some(sizes) = all_sizes(children) {
            let total: f64 = sizes.iter().sum();
            return UnderlyingSpace::Position(Interval::new(0.0, total));
        }
    }
    UnderlyingSpace::Ordinal(keys)
}

/// Unify children along the cross axis of a stack/spread
pub fn unify_align(children: &[&UnderlyingSpace], alignment: Alignment) -> AlignUnification {
    if let Some(sizes) = all_sizes(children) {
        let space = match alignment {
            Alignment::Start | Alignment::End => {
                let intervals: Vec<Interval> = sizes
                    .iter()
                    .map(|v| Interval::new(v.min(0.0), v.max(0.0)))
                    .collect();
                UnderlyingSpace::Position(
                    Interval::union_all(&intervals).unwrap_or(Interval::point(0.0)),
                )
            }
            Alignment::Middle => UnderlyingSpace::Difference(max_or_zero(sizes.iter().map(|v| v.abs()))),
        };
        return AlignUnification {
            space,
            from_size: true,
        };
    }

    let space = if let Some(widths) = all_differences(children) {
        UnderlyingSpace::Difference(max_or_zero(widths.into_iter()))
    } else if let Some(domains) = all_positions(children) {
        let domain = Interval::union_all(&domains).unwrap_or(Interval::point(0.0));
        match alignment {
            Alignment::Middle => UnderlyingSpace::Difference(domain.width()),
            Alignment::Start | Alignment::End => UnderlyingSpace::Position(domain),
        }
    } else {
        UnderlyingSpace::Undefined
    };
    AlignUnification {
        space,
        from_size: false,
    }
}

/// Unify overlaid children: Position children merge when no child is
/// Ordinal; any Ordinal child makes the result Ordinal with merged keys
pub fn unify_layered(children: &[&UnderlyingSpace]) -> UnderlyingSpace {
    let mut keys: Vec<String> = Vec::new();
    let mut any_ordinal = false;
    let mut domains = Vec::new();
    for child in children {
        match child {
            UnderlyingSpace::Ordinal(child_keys) => {
                any_ordinal = true;
                for key in child_keys {
                    if !keys.contains(key) {
                        keys.push(key.clone());
                    }
                }
            }
            UnderlyingSpace::Position(domain) => domains.push(*domain),
            _ => {}
        }
    }
    if any_ordinal {
        return UnderlyingSpace::Ordinal(keys);
    }
    match Interval::union_all(&domains) {
        Some(domain) => UnderlyingSpace::Position(domain),
        None => UnderlyingSpace::Undefined,
    }
}
