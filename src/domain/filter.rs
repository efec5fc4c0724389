//! Filter engine: per-node match classification over a forest.
//!
//! Filtering never removes nodes; it produces a visibility mask so the
//! presentation layer can decide how to render non-matching ancestors.

use std::collections::HashMap;

use crate::domain::forest::{Forest, TreeNode};

/// A text + category query. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeQuery {
    pub text: String,
    pub category: String,
}

impl TreeQuery {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.category.is_empty()
    }
}

/// Whether a single node satisfies the query.
///
/// Text matches against `name` or `key`, case-insensitive substring;
/// category is a case-insensitive equality. Evaluated per node only;
/// ancestor visibility is presentation policy.
pub fn matches(node: &TreeNode, query: &TreeQuery) -> bool {
    let text_ok = query.text.is_empty() || {
        let needle = query.text.to_lowercase();
        node.record.name.to_lowercase().contains(&needle)
            || node.record.key.to_lowercase().contains(&needle)
    };
    let category_ok = query.category.is_empty()
        || node.record.category.eq_ignore_ascii_case(&query.category);
    text_ok && category_ok
}

/// Visibility mask for the whole forest, keyed by record id.
pub fn visibility(forest: &Forest, query: &TreeQuery) -> HashMap<String, bool> {
    forest
        .iter()
        .map(|node| (node.id().to_string(), matches(node, query)))
        .collect()
}

/// Apply a query to the forest's presentation state and return the mask.
///
/// Clearing the text filter collapses every container back to its default
/// state; without this the tree stays fully unfolded after a search and
/// becomes unusable at scale.
pub fn apply(forest: &mut Forest, query: &TreeQuery) -> HashMap<String, bool> {
    if query.text.is_empty() {
        forest.collapse_all();
    }
    visibility(forest, query)
}
