//! Tree synchronization state
//!
//! Holds `{forest, selected, busy}` and mediates between the hierarchy
//! builder, the reparent coordinator, and the persistence boundary. All
//! mutation is serialized through the single atomic busy flag; there is no
//! queue. The forest is snapshotted and installed under a short-lived lock
//! so nothing is ever held across an await.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::events::{TreeEvent, TreeObserver};
use crate::application::services::reparent::ReparentCoordinator;
use crate::domain::{filter, ClassificationRecord, DomainError, Forest, HierarchyBuilder, TreeQuery};
use crate::infrastructure::{ClassificationStore, StoreScope};

#[derive(Default)]
struct ViewState {
    forest: Forest,
    selected: Option<String>,
}

/// Synchronization state for one classification tree view.
pub struct TreeState {
    store: Arc<dyn ClassificationStore>,
    coordinator: ReparentCoordinator,
    observer: Arc<dyn TreeObserver>,
    builder: HierarchyBuilder,
    scope: StoreScope,
    view: Mutex<ViewState>,
    busy: AtomicBool,
    // Monotonic load token; responses bearing a superseded token are dropped
    load_seq: AtomicU64,
}

impl TreeState {
    pub fn new(
        store: Arc<dyn ClassificationStore>,
        scope: StoreScope,
        observer: Arc<dyn TreeObserver>,
    ) -> Self {
        let coordinator = ReparentCoordinator::new(Arc::clone(&store), Arc::clone(&observer));
        Self {
            store,
            coordinator,
            observer,
            builder: HierarchyBuilder::new(),
            scope,
            view: Mutex::new(ViewState::default()),
            busy: AtomicBool::new(false),
            load_seq: AtomicU64::new(0),
        }
    }

    pub fn scope(&self) -> &StoreScope {
        &self.scope
    }

    /// True while a structural mutation is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Snapshot of the current forest.
    pub fn forest(&self) -> Forest {
        self.view().forest.clone()
    }

    pub fn selected(&self) -> Option<String> {
        self.view().selected.clone()
    }

    /// Fetch the full record set and rebuild the forest.
    ///
    /// Rejected while a mutation is in flight. Overlapping loads are legal;
    /// whichever was issued last wins and earlier responses are discarded.
    pub async fn load(&self) -> ApplicationResult<()> {
        if self.is_busy() {
            return Err(ApplicationError::Busy);
        }
        let token = self.next_token();
        let records = self
            .store
            .fetch_all(&self.scope)
            .await
            .map_err(|e| ApplicationError::store("fetch classifications", e))?;
        self.install(token, &records);
        Ok(())
    }

    /// Select a node. The id must exist in the current forest.
    pub fn select(&self, id: &str) -> ApplicationResult<()> {
        let mut view = self.view();
        if !view.forest.contains(id) {
            return Err(DomainError::UnknownNode(id.to_string()).into());
        }
        if view.selected.as_deref() == Some(id) {
            return Ok(());
        }
        view.selected = Some(id.to_string());
        drop(view);
        self.observer
            .on_event(&TreeEvent::SelectionChanged(Some(id.to_string())));
        Ok(())
    }

    pub fn deselect(&self) {
        let mut view = self.view();
        if view.selected.take().is_some() {
            drop(view);
            self.observer.on_event(&TreeEvent::SelectionChanged(None));
        }
    }

    /// Delegate a structural mutation to the coordinator, guarded by the
    /// busy flag, then rebuild from a fresh fetch and emit the canonical
    /// record.
    ///
    /// A second mutation issued while one is in flight fails with `Busy`
    /// and leaves all state untouched.
    pub async fn apply_reparent(
        &self,
        node_id: &str,
        new_parent_id: Option<&str>,
    ) -> ApplicationResult<ClassificationRecord> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ApplicationError::Busy)?;
        let _guard = BusyGuard(&self.busy);

        let snapshot = self.forest();
        let record = self
            .coordinator
            .reparent(&snapshot, node_id, new_parent_id)
            .await?;

        // Canonical rebuild: the server copy may carry computed fields
        let token = self.next_token();
        let records = self
            .store
            .fetch_all(&self.scope)
            .await
            .map_err(|e| ApplicationError::store("refresh classifications", e))?;
        self.install(token, &records);
        self.observer
            .on_event(&TreeEvent::ReparentCommitted(record.clone()));
        Ok(record)
    }

    /// Apply a filter query to presentation state and return the
    /// visibility mask.
    pub fn apply_filter(&self, query: &TreeQuery) -> HashMap<String, bool> {
        let mut view = self.view();
        filter::apply(&mut view.forest, query)
    }

    /// Toggle expansion on a single node. Returns false for unknown ids.
    pub fn set_expanded(&self, id: &str, expanded: bool) -> bool {
        self.view().forest.set_expanded(id, expanded)
    }

    fn next_token(&self) -> u64 {
        self.load_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn install(&self, token: u64, records: &[ClassificationRecord]) {
        if token != self.load_seq.load(Ordering::SeqCst) {
            debug!(token, "discarding stale load response");
            self.observer
                .on_event(&TreeEvent::StaleLoadDiscarded { token });
            return;
        }
        let forest = self.builder.build(records);
        let node_count = forest.node_count();

        let mut view = self.view();
        // Selection survives a rebuild only if the node still exists
        let selection_lost = match view.selected.as_deref() {
            Some(id) => !forest.contains(id),
            None => false,
        };
        if selection_lost {
            view.selected = None;
        }
        view.forest = forest;
        drop(view);

        if selection_lost {
            self.observer.on_event(&TreeEvent::SelectionChanged(None));
        }
        self.observer
            .on_event(&TreeEvent::ForestRefreshed { node_count });
    }

    fn view(&self) -> MutexGuard<'_, ViewState> {
        // A poisoned view lock only means a panic mid-update elsewhere;
        // the state itself is still coherent snapshots
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the busy flag on every exit path.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
