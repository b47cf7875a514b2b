//! Domain layer: the in-memory hierarchy container
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod hierarchy;
pub mod query;

pub use arena::{Node, NodeId, PostOrderIterator, Tree, TreeIterator};
pub use error::{TreeError, TreeResult};
pub use hierarchy::HierarchyView;
