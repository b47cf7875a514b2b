use std::fmt::Display;

use termtree::Tree as TermTree;
use tracing::instrument;

use crate::domain::{NodeId, Tree};

/// Render a hierarchy for terminal output.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> TermTree<String>;
}

impl<T: Display> TreeNodeConvert for Tree<T> {
    /// A single root renders as itself; several roots hang below a `.` node.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> TermTree<String> {
        fn build_tree<T: Display>(tree: &Tree<T>, node_idx: NodeId) -> TermTree<String> {
            let label = tree.value(node_idx).map(ToString::to_string).unwrap_or_default();
            let leaves: Vec<_> = tree
                .children(node_idx)
                .iter()
                .map(|&child| build_tree(tree, child))
                .collect();
            TermTree::new(label).with_leaves(leaves)
        }

        match self.roots() {
            [] => TermTree::new("Empty tree".to_string()),
            [root] => build_tree(self, *root),
            roots => TermTree::new(".".to_string())
                .with_leaves(roots.iter().map(|&root| build_tree(self, root))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_root() {
        let mut tree = Tree::new();
        let a = tree.add_value("A");
        let b = tree.add_child(a, "B").unwrap().unwrap();
        tree.add_child(b, "C").unwrap();
        tree.add_child(a, "D").unwrap();

        let rendered = tree.to_tree_string().to_string();
        assert_eq!(rendered, "A\n├── B\n│   └── C\n└── D\n");
    }

    #[test]
    fn test_render_forest_and_empty() {
        let tree = Tree::from_values(vec![1, 2], Default::default());
        assert_eq!(tree.to_tree_string().to_string(), ".\n├── 1\n└── 2\n");

        let empty: Tree<i32> = Tree::new();
        assert_eq!(empty.to_tree_string().to_string(), "Empty tree\n");
    }
}
