//! Error types for the layout engine

use thiserror::Error;

use super::node::{NodeId, Phase};

/// Errors that abort a render pass
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A Ref names a node that is not in the scope registry
    #[error("can't find '{name}' (available nodes: {})", format_names(.available))]
    UnresolvedReference {
        name: String,
        available: Vec<String>,
    },

    /// An operator was given the wrong number of children
    #[error("{operator} expects {expected} children, found {found}")]
    Arity {
        operator: &'static str,
        expected: &'static str,
        found: usize,
    },

    /// Layout outputs were read before the node was laid out
    #[error("node {node} has not been laid out (currently {phase:?})")]
    NotLaidOut { node: NodeId, phase: Phase },

    /// A node was attached to a second parent
    #[error("node {child} already has a parent")]
    AlreadyParented { child: NodeId },

    /// A handle that does not belong to this scene graph
    #[error("unknown node {node}")]
    UnknownNode { node: NodeId },

    /// A Ref that resolves through one of its own ancestors
    #[error("reference '{name}' is cyclic")]
    CyclicReference { name: String },
}

fn format_names(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

impl LayoutError {
    /// Create an unresolved reference error listing the registered names
    pub fn unresolved(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnresolvedReference {
            name: name.into(),
            available,
        }
    }

    /// Create a child arity error
    pub fn arity(operator: &'static str, expected: &'static str, found: usize) -> Self {
        Self::Arity {
            operator,
            expected,
            found,
        }
    }

    /// Create a not-laid-out error
    pub fn not_laid_out(node: NodeId, phase: Phase) -> Self {
        Self::NotLaidOut { node, phase }
    }

    /// Registered names similar to the missing one
    pub fn suggestions(&self) -> Option<Vec<&str>> {
        match self {
            Self::UnresolvedReference { name, available } => Some(find_similar(name, available, 2)),
            _ => None,
        }
    }
}

/// Names within `max_distance` edits of `target`
fn find_similar<'a>(target: &str, candidates: &'a [String], max_distance: usize) -> Vec<&'a str> {
    let mut similar: Vec<(&str, usize)> = candidates
        .iter()
        .map(|c| (c.as_str(), levenshtein_distance(target, c)))
        .filter(|(_, d)| *d > 0 && *d <= max_distance)
        .collect();
    similar.sort_by_key(|(_, d)| *d);
    similar.into_iter().map(|(name, _)| name).take(3).collect()
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_display_lists_names() {
        let err = LayoutError::unresolved("bars", vec!["bar".to_string(), "line".to_string()]);
        let msg = err.to_string();
        assert!(msg.contains("bars"));
        assert!(msg.contains("bar, line"));
    }

    #[test]
    fn test_unresolved_without_names() {
        let err = LayoutError::unresolved("x", vec![]);
        assert!(err.to_string().contains("none"));
    }

    #[test]
    fn test_suggestions() {
        let err = LayoutError::unresolved(
            "bars",
            vec!["bar".to_string(), "line".to_string(), "barz".to_string()],
        );
        assert_eq!(err.suggestions(), Some(vec!["bar", "barz"]));
    }

    #[test]
    fn test_arity_display() {
        let err = LayoutError::arity("connect", "at least 2", 1);
        assert_eq!(err.to_string(), "connect expects at least 2 children, found 1");
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }
}
