//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Errors raised by container mutations.
///
/// Generic over the value type so a rejected value is handed back to the
/// caller instead of being dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError<T> {
    /// Attaching `value` below `parent` would make a value its own ancestor.
    #[error("invalid child {value:?} for parent {parent:?}: value is already an ancestor")]
    InvalidChild { parent: NodeId, value: T },

    #[error("node not found in tree: {0:?}")]
    NodeNotFound(NodeId),
}

impl<T> TreeError<T> {
    /// The value carried by an `InvalidChild` error.
    pub fn rejected_value(&self) -> Option<&T> {
        match self {
            TreeError::InvalidChild { value, .. } => Some(value),
            TreeError::NodeNotFound(_) => None,
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<R, T> = Result<R, TreeError<T>>;
