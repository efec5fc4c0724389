//! State-transition events published to an injected observer
//!
//! The observer replaces ambient subject streams: whoever constructs the
//! tree state decides where notifications go.

use crate::domain::ClassificationRecord;

/// Notifications emitted by the tree state and the reparent coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEvent {
    /// The forest was rebuilt from a fresh record fetch.
    ForestRefreshed { node_count: usize },

    /// The selected node changed; `None` means deselected.
    SelectionChanged(Option<String>),

    /// The presentation layer should collapse this branch: after an
    /// outgoing move its expand toggle would dangle over <2 children.
    BranchCollapsed(String),

    /// A reparent persisted; carries the canonical server copy.
    ReparentCommitted(ClassificationRecord),

    /// A load response arrived after a newer load was issued and was dropped.
    StaleLoadDiscarded { token: u64 },
}

/// Receiver for tree events.
pub trait TreeObserver: Send + Sync {
    fn on_event(&self, event: &TreeEvent);
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NullObserver;

impl TreeObserver for NullObserver {
    fn on_event(&self, _event: &TreeEvent) {}
}
