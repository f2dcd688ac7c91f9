//! Read-only shape inspection.
//!
//! A single breadth-first sweep computes size, depth, leaf statistics, the
//! node value range and the structural predicates. Search never consults
//! these; they describe what a well-formed generated tree looks like.

use super::{BinaryTree, NodeId};

/// Structural summary of a [`BinaryTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeProperties {
    pub depth: usize,
    pub size: usize,
    pub leaf_count: usize,
    pub min_node_value: usize,
    pub max_node_value: usize,
    pub min_leaf_depth: usize,
    pub max_leaf_depth: usize,
    /// Every parent is >= both of its children.
    pub is_descending: bool,
    /// Every parent is <= both of its children.
    pub is_ascending: bool,
    /// No node has exactly one child.
    pub is_strict: bool,
    /// All levels are full except possibly the last, which is packed left.
    pub is_complete: bool,
    /// `leaf_count == 2^depth`.
    pub is_perfect: bool,
    pub is_max_heap: bool,
    pub is_min_heap: bool,
}

impl BinaryTree {
    /// Inspects the tree and returns its properties.
    pub fn properties(&self) -> TreeProperties {
        let root_value = self.get(self.root).value;

        let mut is_descending = true;
        let mut is_ascending = true;
        let mut min_node_value = root_value;
        let mut max_node_value = root_value;
        let mut size = 0;
        let mut leaf_count = 0;
        let mut min_leaf_depth: Option<usize> = None;
        let mut depth = 0;
        let mut is_strict = true;
        let mut is_complete = true;
        let mut non_full_node_seen = false;

        let mut current_level: Vec<NodeId> = vec![self.root];
        let mut level = 0;

        while !current_level.is_empty() {
            depth = level;
            let mut next_level = Vec::new();

            for id in current_level {
                let node = self.get(id);
                let value = node.value;
                size += 1;
                min_node_value = min_node_value.min(value);
                max_node_value = max_node_value.max(value);

                if node.is_leaf() {
                    min_leaf_depth.get_or_insert(level);
                    leaf_count += 1;
                }

                for child in [node.left, node.right] {
                    match child {
                        Some(child) => {
                            let child_value = self.get(child).value;
                            if child_value > value {
                                is_descending = false;
                            } else if child_value < value {
                                is_ascending = false;
                            }
                            if non_full_node_seen {
                                is_complete = false;
                            }
                            next_level.push(child);
                        }
                        None => non_full_node_seen = true,
                    }
                }

                is_strict &= node.left.is_none() == node.right.is_none();
            }

            current_level = next_level;
            level += 1;
        }

        let is_perfect = u32::try_from(depth)
            .ok()
            .and_then(|d| 1usize.checked_shl(d))
            .is_some_and(|full| full == leaf_count);

        TreeProperties {
            depth,
            size,
            leaf_count,
            min_node_value,
            max_node_value,
            min_leaf_depth: min_leaf_depth.unwrap_or(0),
            max_leaf_depth: depth,
            is_descending,
            is_ascending,
            is_strict,
            is_complete,
            is_perfect,
            is_max_heap: is_complete && is_descending,
            is_min_heap: is_complete && is_ascending,
        }
    }
}
