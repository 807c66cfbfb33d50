//! Exemption list lookup.
//!
//! # Responsibilities
//! - Hold the compiled exemption patterns in configured order
//! - Answer whether a request path skips the login check
//!
//! # Design Decisions
//! - Immutable after construction; reloads build a new list
//! - First match wins, which only matters for logging

use crate::routing::matcher::PathPattern;

/// Ordered list of paths that bypass the login check.
#[derive(Debug, Clone, Default)]
pub struct ExemptPaths {
    patterns: Vec<PathPattern>,
}

impl ExemptPaths {
    /// Compile the given patterns, keeping their order.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(PathPattern::new).collect(),
        }
    }

    /// The first pattern matching `path`, if any.
    pub fn first_match(&self, path: &str) -> Option<&PathPattern> {
        self.patterns.iter().find(|p| p.matches(path))
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
