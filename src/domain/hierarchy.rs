//! Whole-tree transforms: hierarchy linearization and tree inversion.

use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, Tree};
use crate::domain::error::TreeResult;

impl<T> Tree<T> {
    /// Linearize the trees touched by `nodes`.
    ///
    /// Takes the distinct roots of `nodes` in first-seen order and emits each
    /// root followed by its whole offspring in pre-order. Nodes outside
    /// `nodes` but below one of its roots are included.
    pub fn order_by_hierarchy(&self, nodes: &[NodeId]) -> Vec<NodeId> {
        let mut ordered = Vec::with_capacity(nodes.len());
        for root in self.get_roots(nodes) {
            ordered.push(root);
            ordered.extend(self.offspring(root));
        }
        ordered
    }

    /// Linearize with ordering by `key`.
    ///
    /// Roots are sorted by key. Below each root the offspring are flattened
    /// and sorted once as a whole, not per parent, so only the root level is
    /// guaranteed to keep siblings grouped under their parent. Sorting is
    /// stable: equal keys keep pre-order.
    pub fn order_by_hierarchy_by_key<K, F>(&self, nodes: &[NodeId], mut key: F) -> Vec<NodeId>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        let mut roots = self.get_roots(nodes);
        roots.sort_by_cached_key(|&r| self.value(r).map(&mut key));

        let mut ordered = Vec::with_capacity(nodes.len());
        for root in roots {
            ordered.push(root);
            let mut offspring = self.offspring(root);
            offspring.sort_by_cached_key(|&o| self.value(o).map(&mut key));
            ordered.extend(offspring);
        }
        ordered
    }

    /// Snapshot of all values in hierarchy order.
    pub fn view(&self) -> HierarchyView<'_, T> {
        HierarchyView::new(self, self.order_by_hierarchy(self.indices()))
    }

    /// Snapshot of all values in keyed hierarchy order.
    pub fn view_by_key<K, F>(&self, key: F) -> HierarchyView<'_, T>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        HierarchyView::new(self, self.order_by_hierarchy_by_key(self.indices(), key))
    }
}

impl<T: PartialEq + Clone> Tree<T> {
    /// Build a new tree with every parent/child edge inverted.
    ///
    /// Distinct leaf values become the new roots. Below a new node holding
    /// `v` go the distinct values of the parents of every original node
    /// holding `v`. Matching is by value, so duplicate values are merged into
    /// one node per position in the new tree.
    ///
    /// The new tree uses this tree's options; a rejected edge either fails
    /// the call or is dropped accordingly. `self` is not modified.
    #[instrument(level = "debug", skip(self))]
    pub fn reverse(&self) -> TreeResult<Tree<T>, T> {
        let leaf_values = self.distinct_values(&self.leaves());
        let mut reversed = Tree::with_options(self.options());
        reversed.fill_from_children(leaf_values, |v| self.parent_values(v))?;
        debug!(nodes = reversed.len(), roots = reversed.roots().len(), "reversed tree");
        Ok(reversed)
    }

    fn parent_values(&self, value: &T) -> Vec<T> {
        let holders = self.get_self(self.indices(), std::slice::from_ref(value));
        self.distinct_values(&self.get_parents(&holders))
    }

    fn distinct_values(&self, nodes: &[NodeId]) -> Vec<T> {
        let mut values: Vec<T> = Vec::with_capacity(nodes.len());
        for v in nodes.iter().filter_map(|&n| self.value(n)) {
            if !values.contains(v) {
                values.push(v.clone());
            }
        }
        values
    }
}

/// Read-only projection of a tree's values in hierarchy order.
///
/// Borrows the tree, so the tree cannot change while the view exists.
#[derive(Debug, Clone)]
pub struct HierarchyView<'a, T> {
    values: Vec<&'a T>,
}

impl<'a, T> HierarchyView<'a, T> {
    fn new(tree: &'a Tree<T>, order: Vec<NodeId>) -> Self {
        let values = order.into_iter().filter_map(|idx| tree.value(idx)).collect();
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&'a T> {
        self.values.get(position).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.values.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.values.iter().map(|&v| v.clone()).collect()
    }
}

impl<'a, T> std::ops::Index<usize> for HierarchyView<'a, T> {
    type Output = T;

    fn index(&self, position: usize) -> &T {
        self.values[position]
    }
}

impl<'a, T> IntoIterator for HierarchyView<'a, T> {
    type Item = &'a T;
    type IntoIter = std::vec::IntoIter<&'a T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
