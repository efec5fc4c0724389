//! Persistence boundary for classification records
//!
//! The engine consumes exactly three operations; REST paths, headers, and
//! wire shapes belong to whatever implements this trait.

use async_trait::async_trait;

use crate::domain::ClassificationRecord;
use crate::infrastructure::error::StoreResult;

/// Scope for a wholesale fetch: one classification kind in one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreScope {
    /// Classification family (serialized as `type` on the wire)
    pub kind: String,
    /// Tenant/partition scope
    pub domain: String,
}

impl StoreScope {
    pub fn new(kind: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            domain: domain.into(),
        }
    }
}

/// Abstraction over classification persistence.
///
/// All operations are async to support remote backends; implementations
/// must be shareable across tasks.
#[async_trait]
pub trait ClassificationStore: Send + Sync {
    /// Fetch every record in scope. Used by tree load.
    async fn fetch_all(&self, scope: &StoreScope) -> StoreResult<Vec<ClassificationRecord>>;

    /// Fetch the current server copy of a single record.
    async fn fetch_by_id(&self, id: &str) -> StoreResult<ClassificationRecord>;

    /// Persist an updated record, returning the canonical stored copy.
    async fn update_by_id(
        &self,
        id: &str,
        record: &ClassificationRecord,
    ) -> StoreResult<ClassificationRecord>;
}
