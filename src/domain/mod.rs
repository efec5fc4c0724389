//! Domain layer: records, forests, and the pure hierarchy algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod filter;
pub mod forest;
pub mod hierarchy;
pub mod record;

pub use error::DomainError;
pub use filter::{apply as apply_filter, matches, visibility, TreeQuery};
pub use forest::{Forest, ForestIter, TreeNode};
pub use hierarchy::HierarchyBuilder;
pub use record::{key_cmp, ClassificationRecord};
