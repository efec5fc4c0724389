//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business rule violations.
///
/// Degraded input inside the hierarchy builder (unknown parents, cycles,
/// duplicates) is not an error; these cover operations the engine refuses
/// to perform.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("reparenting {node_id} under {new_parent_id} would create a cycle")]
    WouldCreateCycle {
        node_id: String,
        new_parent_id: String,
    },
}
