//! JSON file-backed reference store
//!
//! Keeps the full record set as a JSON array on disk. Good enough for the
//! operator CLI and for exercising the engine without a live backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ClassificationRecord;
use crate::infrastructure::error::{StoreError, StoreResult};
use crate::infrastructure::traits::{ClassificationStore, StoreScope};

/// File-backed implementation of `ClassificationStore`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> StoreResult<Vec<ClassificationRecord>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::io(format!("read {}", self.path.display()), e))?;
        serde_json::from_str(&content).map_err(|e| StoreError::Format {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    async fn write_records(&self, records: &[ClassificationRecord]) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(records).map_err(|e| StoreError::Format {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| StoreError::io(format!("write {}", self.path.display()), e))
    }
}

#[async_trait]
impl ClassificationStore for JsonFileStore {
    async fn fetch_all(&self, scope: &StoreScope) -> StoreResult<Vec<ClassificationRecord>> {
        let records = self.read_records().await?;
        let scoped: Vec<ClassificationRecord> = records
            .into_iter()
            .filter(|r| r.kind == scope.kind && r.domain == scope.domain)
            .collect();
        debug!(
            kind = %scope.kind,
            domain = %scope.domain,
            count = scoped.len(),
            "fetched classifications"
        );
        Ok(scoped)
    }

    async fn fetch_by_id(&self, id: &str) -> StoreResult<ClassificationRecord> {
        let records = self.read_records().await?;
        // Duplicate ids keep the last occurrence, matching the builder
        records
            .into_iter()
            .rev()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update_by_id(
        &self,
        id: &str,
        record: &ClassificationRecord,
    ) -> StoreResult<ClassificationRecord> {
        let mut records = self.read_records().await?;
        let slot = records
            .iter()
            .rposition(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        records[slot] = record.clone();
        self.write_records(&records).await?;
        debug!(id = %id, "updated classification");
        Ok(records[slot].clone())
    }
}
