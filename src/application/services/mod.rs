//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the persistence boundary trait but are themselves
//! concrete structs, not traits.

mod reparent;
mod tree_state;

pub use reparent::{collapse_candidate, ReparentCoordinator};
pub use tree_state::TreeState;
