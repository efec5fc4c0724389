//! Reparent coordinator
//!
//! Orchestrates a single structural mutation: validate the new linkage
//! against the current forest, fetch the latest server copy, relink,
//! signal collapse for the vacated parent, persist. Nothing touches the
//! caller's forest until persistence succeeds.

use std::sync::Arc;

use tracing::debug;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::events::{TreeEvent, TreeObserver};
use crate::domain::{ClassificationRecord, DomainError, Forest};
use crate::infrastructure::ClassificationStore;

/// Coordinates drag-to-node and drop-to-root mutations.
pub struct ReparentCoordinator {
    store: Arc<dyn ClassificationStore>,
    observer: Arc<dyn TreeObserver>,
}

impl ReparentCoordinator {
    pub fn new(store: Arc<dyn ClassificationStore>, observer: Arc<dyn TreeObserver>) -> Self {
        Self { store, observer }
    }

    /// Move `node_id` under `new_parent_id`, or to the root when `None`.
    ///
    /// The record is re-fetched rather than read from the forest so the
    /// mutation applies to the latest server state; the fetch-then-update
    /// window is a known race and stays the backend's problem.
    ///
    /// On any failure the mutation is abandoned; the caller's forest is
    /// never touched, so a failed move leaves the tree exactly as it was.
    pub async fn reparent(
        &self,
        forest: &Forest,
        node_id: &str,
        new_parent_id: Option<&str>,
    ) -> ApplicationResult<ClassificationRecord> {
        if let Some(target) = new_parent_id {
            if target == node_id || forest.is_descendant(node_id, target) {
                return Err(DomainError::WouldCreateCycle {
                    node_id: node_id.to_string(),
                    new_parent_id: target.to_string(),
                }
                .into());
            }
            if !forest.contains(target) {
                return Err(DomainError::UnknownNode(target.to_string()).into());
            }
        }
        debug!(node = %node_id, new_parent = ?new_parent_id, "reparenting");

        let mut record = self
            .store
            .fetch_by_id(node_id)
            .await
            .map_err(|e| ApplicationError::store(format!("fetch classification {node_id}"), e))?;
        record.parent_id = new_parent_id.map(String::from);

        // Signal before persisting so the toggle never dangles while the
        // update is in flight
        if let Some(old_parent) = collapse_candidate(forest, node_id) {
            self.observer
                .on_event(&TreeEvent::BranchCollapsed(old_parent));
        }

        self.store
            .update_by_id(node_id, &record)
            .await
            .map_err(|e| ApplicationError::store(format!("update classification {node_id}"), e))
    }
}

/// The old parent's id when removing `node_id` would leave it with fewer
/// than 2 children, i.e. nothing worth keeping an expand toggle open for.
pub fn collapse_candidate(forest: &Forest, node_id: &str) -> Option<String> {
    forest
        .parent_of(node_id)
        .filter(|parent| parent.children.len().saturating_sub(1) < 2)
        .map(|parent| parent.id().to_string())
}
