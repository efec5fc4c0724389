//! Service container for dependency injection
//!
//! Wires up the tree state with its dependencies.

use std::sync::Arc;

use crate::application::events::{NullObserver, TreeObserver};
use crate::application::services::TreeState;
use crate::config::Settings;
use crate::infrastructure::json_store::JsonFileStore;
use crate::infrastructure::traits::{ClassificationStore, StoreScope};

/// Container holding the wired application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Persistence boundary
    pub store: Arc<dyn ClassificationStore>,

    /// Tree synchronization state for the configured scope
    pub tree: Arc<TreeState>,
}

impl ServiceContainer {
    /// Create a container backed by the JSON file store from settings.
    pub fn new(settings: Settings) -> Self {
        let store: Arc<dyn ClassificationStore> =
            Arc::new(JsonFileStore::new(settings.store_path.clone()));
        Self::with_deps(settings, store, Arc::new(NullObserver))
    }

    /// Create a container with custom dependencies (for testing, or to
    /// attach a real observer).
    pub fn with_deps(
        settings: Settings,
        store: Arc<dyn ClassificationStore>,
        observer: Arc<dyn TreeObserver>,
    ) -> Self {
        let settings = Arc::new(settings);
        let scope = StoreScope::new(settings.kind.clone(), settings.domain.clone());
        let tree = Arc::new(TreeState::new(Arc::clone(&store), scope, observer));

        Self {
            settings,
            store,
            tree,
        }
    }
}
