//! classtree: classification hierarchy engine
//!
//! Builds deterministic classification forests from flat record sets, keeps
//! them consistent under reparenting, and reconciles UI state with a
//! persistence backend.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::TreeState;
pub use domain::{ClassificationRecord, Forest, HierarchyBuilder, TreeNode, TreeQuery};
pub use infrastructure::{ClassificationStore, StoreScope};
