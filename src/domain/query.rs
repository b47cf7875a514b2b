//! Read-only traversal queries over a [`Tree`].
//!
//! Single-node queries return an empty result for stale indices. The
//! set-lifted `get_*` variants apply a query to every input node and return
//! the distinct union in first-seen order.
//!
//! All of these walk parent or child links without cycle detection. On a
//! tree built with the auto check disabled and a caller-introduced cycle they
//! may not terminate.

use itertools::Itertools;

use crate::domain::arena::{NodeId, Tree};

impl<T> Tree<T> {
    pub fn parent(&self, idx: NodeId) -> Option<NodeId> {
        self.get(idx).and_then(|node| node.parent())
    }

    /// Ancestor chain, root first and nearest ancestor last.
    pub fn ancestors(&self, idx: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.parent(idx);
        while let Some(p) = current {
            chain.push(p);
            current = self.parent(p);
        }
        chain.reverse();
        chain
    }

    /// Topmost ancestor, or `idx` itself for a root.
    pub fn root(&self, idx: NodeId) -> Option<NodeId> {
        if !self.contains(idx) {
            return None;
        }
        let mut current = idx;
        while let Some(p) = self.parent(current) {
            current = p;
        }
        Some(current)
    }

    pub fn children(&self, idx: NodeId) -> &[NodeId] {
        self.get(idx).map(|node| node.children()).unwrap_or(&[])
    }

    /// All descendants in depth-first pre-order, `idx` excluded.
    pub fn offspring(&self, idx: NodeId) -> Vec<NodeId> {
        self.iter_subtree(idx).skip(1).map(|(i, _)| i).collect()
    }

    /// Other children of the parent; empty for roots.
    pub fn siblings(&self, idx: NodeId) -> Vec<NodeId> {
        self.parent(idx)
            .map(|p| {
                self.children(p)
                    .iter()
                    .copied()
                    .filter(|&c| c != idx)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Children of the parent's siblings.
    ///
    /// Historically exposed as "uncles", although genealogically these are
    /// the first cousins of `idx`. The behaviour is kept as is because
    /// callers depend on it.
    pub fn siblings_children(&self, idx: NodeId) -> Vec<NodeId> {
        self.parent(idx)
            .map(|p| {
                self.siblings(p)
                    .into_iter()
                    .flat_map(|s| self.children(s).iter().copied())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Children of the nodes returned by [`siblings_children`](Self::siblings_children).
    pub fn nephews(&self, idx: NodeId) -> Vec<NodeId> {
        self.siblings_children(idx)
            .into_iter()
            .flat_map(|c| self.children(c).iter().copied())
            .collect()
    }

    pub fn get_roots(&self, nodes: &[NodeId]) -> Vec<NodeId> {
        nodes.iter().filter_map(|&n| self.root(n)).unique().collect()
    }

    pub fn get_parents(&self, nodes: &[NodeId]) -> Vec<NodeId> {
        nodes.iter().filter_map(|&n| self.parent(n)).unique().collect()
    }

    pub fn get_ancestors(&self, nodes: &[NodeId]) -> Vec<NodeId> {
        nodes
            .iter()
            .flat_map(|&n| self.ancestors(n))
            .unique()
            .collect()
    }

    pub fn get_children(&self, nodes: &[NodeId]) -> Vec<NodeId> {
        nodes
            .iter()
            .flat_map(|&n| self.children(n).iter().copied())
            .unique()
            .collect()
    }

    pub fn get_offspring(&self, nodes: &[NodeId]) -> Vec<NodeId> {
        nodes
            .iter()
            .flat_map(|&n| self.offspring(n))
            .unique()
            .collect()
    }

    /// Leaves below the given nodes: offspring without children.
    pub fn get_bottom(&self, nodes: &[NodeId]) -> Vec<NodeId> {
        self.get_offspring(nodes)
            .into_iter()
            .filter(|&n| self.children(n).is_empty())
            .collect()
    }
}

impl<T: PartialEq> Tree<T> {
    /// The given nodes whose value is one of `values`.
    pub fn get_self(&self, nodes: &[NodeId], values: &[T]) -> Vec<NodeId> {
        nodes
            .iter()
            .copied()
            .filter(|&n| self.value(n).is_some_and(|v| values.contains(v)))
            .unique()
            .collect()
    }
}
