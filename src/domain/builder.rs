//! Construction strategies for populating a [`Tree`] from external data.
//!
//! Every strategy funnels through [`Tree::add_value`] and [`Tree::add_child`],
//! so the container's options decide what happens to values that would close
//! a cycle. Nodes are inserted in depth-first pre-order. Traversal uses an
//! explicit stack, so deep hierarchies do not grow the call stack.

use tracing::{debug, instrument};

use crate::config::TreeOptions;
use crate::domain::arena::{NodeId, Tree};
use crate::domain::error::TreeResult;

impl<T: PartialEq> Tree<T> {
    /// Every value becomes its own root.
    pub fn from_values<I>(values: I, options: TreeOptions) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::with_options(options);
        tree.add_values(values);
        tree
    }

    /// Top-down construction: add each root, then ask `get_children` for the
    /// children of every created node. Each node is expanded exactly once.
    pub fn from_children_selector<I, F, C>(
        roots: I,
        get_children: F,
        options: TreeOptions,
    ) -> TreeResult<Self, T>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> C,
        C: IntoIterator<Item = T>,
    {
        let mut tree = Self::with_options(options);
        tree.fill_from_children(roots, get_children)?;
        Ok(tree)
    }

    /// Top-down construction without explicit roots: roots are the values
    /// that `get_children` never returns for any other value.
    pub fn from_values_with_children<I, F, C>(
        values: I,
        mut get_children: F,
        options: TreeOptions,
    ) -> TreeResult<Self, T>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> C,
        C: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        let child_lists: Vec<Vec<T>> = values
            .iter()
            .map(|v| get_children(v).into_iter().collect())
            .collect();
        let is_root: Vec<bool> = values
            .iter()
            .map(|v| !child_lists.iter().any(|children| children.contains(v)))
            .collect();

        let roots = values
            .into_iter()
            .zip(is_root)
            .filter_map(|(v, root)| root.then_some(v));
        Self::from_children_selector(roots, get_children, options)
    }

    /// Add `roots` as root nodes and expand them through `get_children`.
    ///
    /// Returns the indices of the created roots.
    #[instrument(level = "debug", skip_all)]
    pub fn fill_from_children<I, F, C>(
        &mut self,
        roots: I,
        mut get_children: F,
    ) -> TreeResult<Vec<NodeId>, T>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> C,
        C: IntoIterator<Item = T>,
    {
        let mut stack: Vec<(T, Option<NodeId>)> = roots.into_iter().map(|r| (r, None)).collect();
        stack.reverse();
        let mut created_roots = Vec::new();

        while let Some((value, parent)) = stack.pop() {
            let current_idx = match parent {
                None => {
                    let idx = self.add_value(value);
                    created_roots.push(idx);
                    idx
                }
                Some(parent_idx) => match self.add_child(parent_idx, value)? {
                    Some(idx) => idx,
                    // rejected: its subtree is never expanded
                    None => continue,
                },
            };

            if let Some(current) = self.value(current_idx) {
                let children: Vec<T> = get_children(current).into_iter().collect();
                stack.extend(children.into_iter().rev().map(|c| (c, Some(current_idx))));
            }
        }

        debug!(roots = created_roots.len(), nodes = self.len(), "filled from children selector");
        Ok(created_roots)
    }
}

impl<T: PartialEq + Clone> Tree<T> {
    /// Bottom-up construction from a flat list: values without parents are
    /// roots, the children of a node are the list entries whose
    /// `get_parents` result contains the node's value.
    ///
    /// Finding children scans the whole list for every node, O(n²). Prefer
    /// [`from_children_selector`](Self::from_children_selector) for large
    /// inputs.
    pub fn from_parent_selector<I, F, P>(
        values: I,
        get_parents: F,
        options: TreeOptions,
    ) -> TreeResult<Self, T>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> P,
        P: IntoIterator<Item = T>,
    {
        let mut tree = Self::with_options(options);
        tree.fill_from_parents(values, get_parents)?;
        Ok(tree)
    }

    /// Bottom-up fill into an existing tree. Returns the created roots.
    #[instrument(level = "debug", skip_all)]
    pub fn fill_from_parents<I, F, P>(
        &mut self,
        values: I,
        mut get_parents: F,
    ) -> TreeResult<Vec<NodeId>, T>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> P,
        P: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        let parent_lists: Vec<Vec<T>> = values
            .iter()
            .map(|v| get_parents(v).into_iter().collect())
            .collect();

        let mut stack: Vec<(usize, Option<NodeId>)> = (0..values.len())
            .rev()
            .filter(|&pos| parent_lists[pos].is_empty())
            .map(|pos| (pos, None))
            .collect();
        let mut created_roots = Vec::new();

        while let Some((pos, parent)) = stack.pop() {
            let value = values[pos].clone();
            let current_idx = match parent {
                None => {
                    let idx = self.add_value(value);
                    created_roots.push(idx);
                    idx
                }
                Some(parent_idx) => match self.add_child(parent_idx, value)? {
                    Some(idx) => idx,
                    None => continue,
                },
            };

            let current = &values[pos];
            let children: Vec<usize> = parent_lists
                .iter()
                .enumerate()
                .filter(|(_, parents)| parents.contains(current))
                .map(|(child_pos, _)| child_pos)
                .collect();
            stack.extend(children.into_iter().rev().map(|c| (c, Some(current_idx))));
        }

        debug!(roots = created_roots.len(), nodes = self.len(), "filled from parent selector");
        Ok(created_roots)
    }
}
