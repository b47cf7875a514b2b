use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::config::TreeOptions;
use crate::domain::error::{TreeError, TreeResult};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

fn next_tree_id() -> u64 {
    NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Handle of a node, valid only for the [`Tree`] that created it.
///
/// Carries the owning tree's id next to the arena slot, so a handle of
/// another tree (or of a clone) never resolves to an unrelated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    tree: u64,
    index: Index,
}

/// Tree node in the arena-based hierarchy structure.
///
/// Nodes are created only through [`Tree`] mutations. Their position is
/// fixed for their whole life: moving a value means removing it and adding
/// it again elsewhere.
#[derive(Debug, Clone)]
pub struct Node<T> {
    value: T,
    /// Parent node, None for root nodes
    parent: Option<NodeId>,
    /// Distance from the root, roots are level 0
    level: usize,
    /// Child nodes, insertion order
    children: Vec<NodeId>,
}

impl<T> Node<T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based container owning every node of one hierarchy (a forest:
/// any number of roots).
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Handles of removed nodes go stale and never alias a later node. Handles
/// of other trees are never members.
///
/// Not synchronised: mutate from one thread at a time. Shared read-only
/// traversal is fine.
#[derive(Debug)]
pub struct Tree<T> {
    id: u64,
    /// Arena storage for all tree nodes
    arena: Arena<Node<T>>,
    /// All node handles in insertion order
    order: Vec<NodeId>,
    /// Nodes without parent, insertion order
    roots: Vec<NodeId>,
    options: TreeOptions,
}

/// A clone is a separate container: it gets its own id and every handle it
/// stores is rewritten, so handles of the original do not resolve in it.
impl<T: Clone> Clone for Tree<T> {
    fn clone(&self) -> Self {
        let id = next_tree_id();
        let rehome = move |node_id: NodeId| NodeId { tree: id, ..node_id };

        let mut arena = self.arena.clone();
        for (_, node) in arena.iter_mut() {
            node.parent = node.parent.map(rehome);
            node.children.iter_mut().for_each(|c| *c = rehome(*c));
        }

        Self {
            id,
            arena,
            order: self.order.iter().copied().map(rehome).collect(),
            roots: self.roots.iter().copied().map(rehome).collect(),
            options: self.options,
        }
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self::with_options(TreeOptions::default())
    }

    pub fn with_options(options: TreeOptions) -> Self {
        Self {
            id: next_tree_id(),
            arena: Arena::new(),
            order: Vec::new(),
            roots: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> TreeOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// False for stale handles and for handles of another tree.
    pub fn contains(&self, idx: NodeId) -> bool {
        self.get(idx).is_some()
    }

    pub fn get(&self, idx: NodeId) -> Option<&Node<T>> {
        if idx.tree != self.id {
            return None;
        }
        self.arena.get(idx.index)
    }

    fn get_mut(&mut self, idx: NodeId) -> Option<&mut Node<T>> {
        if idx.tree != self.id {
            return None;
        }
        self.arena.get_mut(idx.index)
    }

    pub fn value(&self, idx: NodeId) -> Option<&T> {
        self.get(idx).map(|node| &node.value)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<T>)> + '_ {
        self.order
            .iter()
            .filter_map(move |&idx| self.get(idx).map(|node| (idx, node)))
    }

    /// All values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.nodes().map(|(_, node)| &node.value)
    }

    pub fn indices(&self) -> &[NodeId] {
        &self.order
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Nodes without children, insertion order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.nodes()
            .filter(|(_, node)| node.is_leaf())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Number of levels, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, idx: NodeId) -> usize {
        if let Some(node) = self.get(idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Remove every node. Handles issued before stay invalid afterwards.
    pub fn clear(&mut self) {
        // Arena::clear restarts slot reuse without a generation bump
        self.id = next_tree_id();
        self.arena.clear();
        self.order.clear();
        self.roots.clear();
    }

    /// Depth-first pre-order over every root, roots in insertion order.
    pub fn iter(&self) -> TreeIterator<'_, T> {
        TreeIterator::new(self, &self.roots)
    }

    /// Pre-order over `idx` and its offspring; empty for a stale index.
    pub fn iter_subtree(&self, idx: NodeId) -> TreeIterator<'_, T> {
        if self.contains(idx) {
            TreeIterator::new(self, &[idx])
        } else {
            TreeIterator::new(self, &[])
        }
    }

    /// Children before their parent, every root.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self)
    }

    /// Add a root node. Roots have no ancestors, so this never fails.
    #[instrument(level = "trace", skip(self, value))]
    pub fn add_value(&mut self, value: T) -> NodeId {
        self.insert_node(value, None)
    }

    pub fn add_values<I>(&mut self, values: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = T>,
    {
        values.into_iter().map(|v| self.add_value(v)).collect()
    }

    /// Unvalidated insertion; the caller has checked `parent`.
    #[instrument(level = "trace", skip(self, value))]
    pub(crate) fn insert_node(&mut self, value: T, parent: Option<NodeId>) -> NodeId {
        let level = parent
            .and_then(|p| self.get(p))
            .map_or(0, |p| p.level + 1);
        let node = Node {
            value,
            parent,
            level,
            children: Vec::new(),
        };
        let node_idx = NodeId {
            tree: self.id,
            index: self.arena.insert(node),
        };

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }
        self.order.push(node_idx);

        node_idx
    }

    /// Remove `idx` and its whole subtree.
    ///
    /// Returns false when the node is not (or no longer) part of this tree.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, idx: NodeId) -> bool {
        let Some(parent) = self.get(idx).map(|node| node.parent) else {
            return false;
        };

        match parent {
            Some(parent_idx) => {
                if let Some(parent) = self.get_mut(parent_idx) {
                    parent.children.retain(|&c| c != idx);
                }
            }
            None => self.roots.retain(|&r| r != idx),
        }

        let doomed: HashSet<NodeId> = self.iter_subtree(idx).map(|(i, _)| i).collect();
        for &i in &doomed {
            self.arena.remove(i.index);
        }
        self.order.retain(|i| !doomed.contains(i));
        debug!(removed = doomed.len(), "removed subtree");
        true
    }

    /// Remove every node whose value matches, with their subtrees.
    ///
    /// Returns the number of matching nodes removed, including matches
    /// nested below another match.
    #[instrument(level = "debug", skip(self, predicate))]
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let matches: Vec<NodeId> = self
            .nodes()
            .filter(|(_, node)| predicate(&node.value))
            .map(|(idx, _)| idx)
            .collect();
        for &idx in &matches {
            self.remove(idx);
        }
        matches.len()
    }
}

impl<T: PartialEq> Tree<T> {
    /// Acyclicity check: false iff `value` equals the value of `parent` or of
    /// any of its ancestors.
    pub fn is_valid_child(&self, parent: NodeId, value: &T) -> bool {
        match self.get(parent) {
            Some(node) => {
                node.value != *value
                    && self
                        .ancestors(parent)
                        .into_iter()
                        .filter_map(|a| self.value(a))
                        .all(|v| v != value)
            }
            None => false,
        }
    }

    /// Add `value` as last child of `parent`.
    ///
    /// With auto check enabled an ancestor value is rejected: `Err` when
    /// `throw_on_error` is set, `Ok(None)` otherwise. The tree is unchanged
    /// on rejection.
    #[instrument(level = "debug", skip(self, value))]
    pub fn add_child(&mut self, parent: NodeId, value: T) -> TreeResult<Option<NodeId>, T> {
        if !self.contains(parent) {
            return Err(TreeError::NodeNotFound(parent));
        }
        if self.options.enable_auto_check && !self.is_valid_child(parent, &value) {
            debug!(?parent, "rejected child: value already in ancestor chain");
            if self.options.throw_on_error {
                return Err(TreeError::InvalidChild { parent, value });
            }
            return Ok(None);
        }
        Ok(Some(self.insert_node(value, Some(parent))))
    }

    /// Batch form of [`add_child`](Self::add_child).
    ///
    /// In silent mode rejected values are left out and the rest still get
    /// added. In fail-fast mode every value is checked first, so an error
    /// leaves the tree untouched.
    #[instrument(level = "debug", skip(self, values))]
    pub fn add_children<I>(&mut self, parent: NodeId, values: I) -> TreeResult<Vec<NodeId>, T>
    where
        I: IntoIterator<Item = T>,
    {
        if !self.contains(parent) {
            return Err(TreeError::NodeNotFound(parent));
        }
        let mut values: Vec<T> = values.into_iter().collect();

        if self.options.fails_fast() {
            if let Some(pos) = values.iter().position(|v| !self.is_valid_child(parent, v)) {
                debug!(?parent, "rejected batch: value already in ancestor chain");
                let value = values.swap_remove(pos);
                return Err(TreeError::InvalidChild { parent, value });
            }
        }

        let mut created = Vec::with_capacity(values.len());
        for value in values {
            if let Some(idx) = self.add_child(parent, value)? {
                created.push(idx);
            }
        }
        Ok(created)
    }

    /// All nodes holding `value`, insertion order.
    pub fn find(&self, value: &T) -> Vec<NodeId> {
        self.nodes()
            .filter(|(_, node)| node.value == *value)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Remove all nodes holding `value` (duplicates included) with their subtrees.
    pub fn remove_value(&mut self, value: &T) -> usize {
        self.remove_where(|v| v == value)
    }
}

pub struct TreeIterator<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> TreeIterator<'a, T> {
    fn new(tree: &'a Tree<T>, start: &[NodeId]) -> Self {
        // Reverse so the first start node is popped first
        let stack = start.iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = (NodeId, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(tree: &'a Tree<T>) -> Self {
        let stack = tree.roots.iter().rev().map(|&r| (r, false)).collect();
        Self { tree, stack }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (NodeId, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
