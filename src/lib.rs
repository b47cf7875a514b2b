//! Generic hierarchical container.
//!
//! A [`Tree`] owns every node of a forest in a generational arena and hands
//! out [`NodeId`] handles. Values are attached below a parent only if they do
//! not already appear in the parent's ancestor chain, so the hierarchy stays
//! acyclic unless checking is switched off in [`TreeOptions`].
//!
//! ```
//! use valtree::{Tree, TreeOptions};
//!
//! let tree = Tree::from_children_selector(
//!     vec!["A"],
//!     |v: &&str| match *v {
//!         "A" => vec!["B", "C"],
//!         "B" => vec!["D"],
//!         _ => vec![],
//!     },
//!     TreeOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(tree.view().to_vec(), vec!["A", "B", "D", "C"]);
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod tree_traits;
pub mod util;

pub use config::TreeOptions;
pub use domain::{HierarchyView, Node, NodeId, Tree, TreeError, TreeResult};
pub use errors::OptionsError;
pub use tree_traits::TreeNodeConvert;
