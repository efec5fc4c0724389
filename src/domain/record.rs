//! Classification records: the flat persistence shape the engine consumes.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A single classification as delivered by the persistence boundary.
///
/// Records are immutable from the engine's perspective; structural edits go
/// through the store and come back as fresh copies. `parent_id` of `None`
/// (or an empty string, which some backends emit) marks a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRecord {
    /// Unique identifier
    pub id: String,
    /// Display/sort key, unique within a domain+kind scope
    pub key: String,
    /// Reference to the parent record's id, absent for roots
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Category tag used for icon lookup and filtering
    pub category: String,
    /// Classification family; records of differing kinds never share a forest
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable name
    pub name: String,
    /// Tenant/partition scope
    pub domain: String,
}

impl ClassificationRecord {
    /// The effective parent reference: `None` for roots, including the
    /// empty-string form some backends persist.
    pub fn parent_ref(&self) -> Option<&str> {
        match self.parent_id.as_deref() {
            Some("") | None => None,
            some => some,
        }
    }
}

/// Sibling ordering: case-insensitive key comparison with a byte-order
/// tiebreak so equal-folding keys still sort deterministically.
pub fn key_cmp(a: &ClassificationRecord, b: &ClassificationRecord) -> Ordering {
    a.key
        .to_lowercase()
        .cmp(&b.key.to_lowercase())
        .then_with(|| a.key.cmp(&b.key))
}
