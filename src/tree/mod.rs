//! # Binary Tree Arena
//!
//! A fixed-shape binary tree whose nodes live in a contiguous `Vec` and refer
//! to each other by [`NodeId`]. Children are reached through `left`/`right`,
//! and every non-root node stores its parent's index so backup can walk upward
//! in O(depth) without any shared ownership.
//!
//! The tree is built once, either from random level-order values
//! ([`BinaryTree::generate`]) or from explicit ones
//! ([`BinaryTree::from_level_order`]), and is never restructured afterwards.
//! Only `reward` and `visits` change during search.

mod analysis;
mod display;
mod node;

pub use analysis::TreeProperties;
pub use display::Label;
pub use node::{Node, NodeId};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::TreeError;

/// Largest height accepted by [`BinaryTree::generate`].
pub const MAX_HEIGHT: u32 = 20;

/// Leaf rewards are sampled uniformly from `[0, MAX_REWARD)`.
pub const MAX_REWARD: f64 = 100.0;

/// Binary tree with arena-based node storage.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryTree {
    /// Arena storing all nodes, in level order
    nodes: Vec<Node>,

    /// Root node index (always 0)
    root: NodeId,
}

/// Returns a random permutation of `0..2^(height+1)-1`.
fn random_node_values<R: Rng>(height: u32, rng: &mut R) -> Vec<usize> {
    let max_node_count = (1usize << (height + 1)) - 1;
    let mut values: Vec<usize> = (0..max_node_count).collect();
    values.shuffle(rng);
    values
}

impl BinaryTree {
    /// Generates a perfect tree of the given height with randomly permuted values.
    ///
    /// Rewards are left at zero; see [`BinaryTree::random`] for a tree ready
    /// for search.
    ///
    /// # Arguments
    /// * `height` - Depth of the deepest leaf; 0 produces a single root leaf.
    /// * `rng` - Source of the value permutation.
    pub fn generate<R: Rng>(height: u32, rng: &mut R) -> Result<Self, TreeError> {
        if height > MAX_HEIGHT {
            return Err(TreeError::HeightTooLarge {
                height,
                max: MAX_HEIGHT,
            });
        }

        let values: Vec<Option<usize>> = random_node_values(height, rng)
            .into_iter()
            .map(Some)
            .collect();
        let tree = Self::from_level_order(&values)?;

        debug!(height, nodes = tree.len(), "generated binary tree");
        Ok(tree)
    }

    /// Generates a tree and assigns random leaf rewards.
    pub fn random<R: Rng>(height: u32, rng: &mut R) -> Result<Self, TreeError> {
        let mut tree = Self::generate(height, rng)?;
        tree.init_rewards(rng);
        Ok(tree)
    }

    /// Builds a tree from values laid out in level order.
    ///
    /// The node at index `i` is attached to the node at `(i - 1) / 2`, as the
    /// left child for odd `i` and the right child for even `i`. `None` marks
    /// an empty slot; a populated slot under an empty one is an error.
    pub fn from_level_order(values: &[Option<usize>]) -> Result<Self, TreeError> {
        if !matches!(values.first(), Some(Some(_))) {
            return Err(TreeError::EmptyTree);
        }

        let mut nodes: Vec<Node> = Vec::with_capacity(values.len());
        let mut slots: Vec<Option<NodeId>> = Vec::with_capacity(values.len());

        for (index, value) in values.iter().enumerate() {
            let Some(value) = *value else {
                slots.push(None);
                continue;
            };

            let id = NodeId(nodes.len() as u32);
            let mut node = Node::new(value, index);

            if index > 0 {
                let parent_index = (index - 1) / 2;
                let parent = slots[parent_index].ok_or(TreeError::MissingParent {
                    index,
                    parent: parent_index,
                })?;

                node.parent = Some(parent);
                let parent_node = &mut nodes[parent.index()];
                if index % 2 == 1 {
                    parent_node.left = Some(id);
                } else {
                    parent_node.right = Some(id);
                }
            }

            nodes.push(node);
            slots.push(Some(id));
        }

        Ok(Self {
            nodes,
            root: NodeId(0),
        })
    }

    /// Resets all statistics and samples a fresh reward for every leaf.
    pub fn init_rewards<R: Rng>(&mut self, rng: &mut R) -> &mut Self {
        for node in &mut self.nodes {
            node.visits = 0;
            node.reward = 0.0;
        }
        for id in self.leaves() {
            self.nodes[id.index()].reward = rng.random_range(0.0..MAX_REWARD);
        }
        self
    }

    /// Overrides the terminal reward of a leaf.
    ///
    /// Only allowed before the leaf has been visited; once a search has
    /// counted it, its reward stays fixed.
    pub fn set_leaf_reward(&mut self, id: NodeId, reward: f64) -> Result<(), TreeError> {
        if !reward.is_finite() {
            return Err(TreeError::NonFiniteReward(reward));
        }
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(TreeError::UnknownNode(id))?;
        if !node.is_leaf() {
            return Err(TreeError::RewardOnInternalNode(id));
        }
        if node.visits > 0 {
            return Err(TreeError::RewardAfterSearch(id));
        }
        node.reward = reward;
        Ok(())
    }

    /// Fails on the first node, in level order, that has exactly one child.
    pub fn check_strict(&self) -> Result<(), TreeError> {
        match self
            .iter()
            .find(|(_, node)| node.left.is_some() != node.right.is_some())
        {
            Some((id, _)) => Err(TreeError::NotStrict(id)),
            None => Ok(()),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    ///
    /// Panics if `id` was not produced by this tree.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn try_get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a constructed tree.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Iterates over `(NodeId, &Node)` pairs in level order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Depth of the deepest node.
    pub fn height(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| level_of(node.level_index))
            .max()
            .unwrap_or(0)
    }

    /// Collects every node without children, breadth first.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut current_level = vec![self.root];

        while !current_level.is_empty() {
            let mut next_level = Vec::new();
            for id in current_level {
                let node = self.get(id);
                if node.is_leaf() {
                    leaves.push(id);
                    continue;
                }
                next_level.extend(node.left);
                next_level.extend(node.right);
            }
            current_level = next_level;
        }

        leaves
    }

    /// Parent of a node, read from its back-reference.
    #[inline]
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.try_get(id).and_then(|node| node.parent)
    }

    /// Parent of a node, found by searching the tree from the root for the
    /// node that owns `child`.
    pub fn find_parent(&self, child: NodeId) -> Option<NodeId> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.get(id);
            if node.left == Some(child) || node.right == Some(child) {
                return Some(id);
            }
            stack.extend(node.left);
            stack.extend(node.right);
        }
        None
    }

    /// Node IDs from `id` up to and including the root.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            path.push(parent);
            current = self.parent_of(parent);
        }
        path
    }

    /// Number of edges between `id` and the root.
    pub fn depth_of(&self, id: NodeId) -> usize {
        self.path_to_root(id).len() - 1
    }

    /// Checks that every back-reference points at the node owning the child.
    pub fn validate_links(&self) -> bool {
        self.iter().all(|(id, node)| {
            let children_ok = [node.left, node.right]
                .into_iter()
                .flatten()
                .all(|child| self.try_get(child).and_then(|c| c.parent) == Some(id));
            let parent_ok = if id == self.root {
                node.parent.is_none()
            } else {
                node.parent.is_some() && node.parent == self.find_parent(id)
            };
            children_ok && parent_ok
        })
    }
}

/// Depth of a level-order position.
fn level_of(level_index: usize) -> usize {
    (usize::BITS - 1 - (level_index + 1).leading_zeros()) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn rng() -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(7)
    }

    #[test]
    fn test_generate_node_count() {
        for height in 0..6 {
            let tree = BinaryTree::generate(height, &mut rng()).unwrap();
            assert_eq!(tree.len(), (1 << (height + 1)) - 1);
            assert_eq!(tree.height(), height as usize);
            assert_eq!(tree.leaves().len(), 1 << height);
        }
    }

    #[test]
    fn test_generate_rejects_large_height() {
        let err = BinaryTree::generate(MAX_HEIGHT + 1, &mut rng()).unwrap_err();
        assert_eq!(
            err,
            TreeError::HeightTooLarge {
                height: MAX_HEIGHT + 1,
                max: MAX_HEIGHT
            }
        );
    }

    #[test]
    fn test_single_root_leaf() {
        let tree = BinaryTree::random(0, &mut rng()).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.leaves(), vec![tree.root()]);
        assert!(tree.get(tree.root()).parent.is_none());
        let reward = tree.get(tree.root()).reward;
        assert!((0.0..MAX_REWARD).contains(&reward));
    }

    #[test]
    fn test_from_level_order_links() {
        let tree = BinaryTree::from_level_order(&[Some(5), Some(3), Some(8), Some(1)]).unwrap();
        let root = tree.get(tree.root());
        assert_eq!(root.value, 5);
        assert_eq!(root.left, Some(NodeId(1)));
        assert_eq!(root.right, Some(NodeId(2)));

        let left = tree.get(NodeId(1));
        assert_eq!(left.left, Some(NodeId(3)));
        assert_eq!(left.right, None);
        assert_eq!(tree.get(NodeId(3)).value, 1);
        assert_eq!(tree.parent_of(NodeId(3)), Some(NodeId(1)));
        assert!(tree.validate_links());
    }

    #[test]
    fn test_from_level_order_skips_holes() {
        // Index 3 and 4 are empty, index 5 hangs off index 2.
        let tree =
            BinaryTree::from_level_order(&[Some(0), Some(1), Some(2), None, None, Some(5)]).unwrap();
        assert_eq!(tree.len(), 4);
        let deep = tree.get(NodeId(3));
        assert_eq!(deep.level_index, 5);
        assert_eq!(deep.parent, Some(NodeId(2)));
        assert_eq!(tree.get(NodeId(2)).left, Some(NodeId(3)));
        assert_eq!(tree.depth_of(NodeId(3)), 2);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_from_level_order_missing_parent() {
        let err = BinaryTree::from_level_order(&[Some(0), None, Some(2), Some(3)]).unwrap_err();
        assert_eq!(err, TreeError::MissingParent { index: 3, parent: 1 });
    }

    #[test]
    fn test_from_level_order_empty() {
        assert_eq!(
            BinaryTree::from_level_order(&[]).unwrap_err(),
            TreeError::EmptyTree
        );
        assert_eq!(
            BinaryTree::from_level_order(&[None, Some(1)]).unwrap_err(),
            TreeError::EmptyTree
        );
    }

    #[test]
    fn test_init_rewards_only_on_leaves() {
        let tree = BinaryTree::random(4, &mut rng()).unwrap();
        for (_, node) in tree.iter() {
            assert_eq!(node.visits, 0);
            if node.is_leaf() {
                assert!((0.0..MAX_REWARD).contains(&node.reward));
            } else {
                assert_eq!(node.reward, 0.0);
            }
        }
    }

    #[test]
    fn test_set_leaf_reward() {
        let mut tree = BinaryTree::generate(1, &mut rng()).unwrap();
        tree.set_leaf_reward(NodeId(1), 42.0).unwrap();
        assert_eq!(tree.get(NodeId(1)).reward, 42.0);

        assert_eq!(
            tree.set_leaf_reward(tree.root(), 1.0),
            Err(TreeError::RewardOnInternalNode(NodeId(0)))
        );
        assert_eq!(
            tree.set_leaf_reward(NodeId(2), f64::NAN).unwrap_err().to_string(),
            "reward must be a finite number, got NaN"
        );
        assert_eq!(
            tree.set_leaf_reward(NodeId(9), 1.0),
            Err(TreeError::UnknownNode(NodeId(9)))
        );
    }

    #[test]
    fn test_visited_leaf_keeps_its_reward() {
        let mut tree = BinaryTree::generate(1, &mut rng()).unwrap();
        tree.set_leaf_reward(NodeId(2), 7.0).unwrap();
        tree.get_mut(NodeId(2)).visits = 1;

        assert_eq!(
            tree.set_leaf_reward(NodeId(2), 99.0),
            Err(TreeError::RewardAfterSearch(NodeId(2)))
        );
        assert_eq!(tree.get(NodeId(2)).reward, 7.0);
        tree.set_leaf_reward(NodeId(1), 3.0).unwrap();
    }

    #[test]
    fn test_check_strict() {
        assert_eq!(BinaryTree::generate(3, &mut rng()).unwrap().check_strict(), Ok(()));
        assert_eq!(
            BinaryTree::from_level_order(&[Some(0)]).unwrap().check_strict(),
            Ok(())
        );

        let lopsided =
            BinaryTree::from_level_order(&[Some(0), Some(1), Some(2), Some(3)]).unwrap();
        assert_eq!(lopsided.check_strict(), Err(TreeError::NotStrict(NodeId(1))));
        assert!(!lopsided.properties().is_strict);
    }

    #[test]
    fn test_find_parent_matches_back_reference() {
        let tree = BinaryTree::generate(4, &mut rng()).unwrap();
        assert_eq!(tree.find_parent(tree.root()), None);
        for (id, _) in tree.iter().skip(1) {
            assert_eq!(tree.find_parent(id), tree.parent_of(id));
        }
        assert!(tree.validate_links());
    }

    #[test]
    fn test_path_to_root() {
        let tree = BinaryTree::generate(3, &mut rng()).unwrap();
        let leaf = *tree.leaves().last().unwrap();
        let path = tree.path_to_root(leaf);
        assert_eq!(path.len(), 4);
        assert_eq!(path.first(), Some(&leaf));
        assert_eq!(path.last(), Some(&tree.root()));
        assert_eq!(tree.depth_of(leaf), 3);
    }

    #[test]
    fn test_leaves_are_deterministic() {
        let tree = BinaryTree::random(5, &mut rng()).unwrap();
        let before = tree.clone();
        assert_eq!(tree.leaves(), tree.leaves());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_level_of() {
        assert_eq!(level_of(0), 0);
        assert_eq!(level_of(1), 1);
        assert_eq!(level_of(2), 1);
        assert_eq!(level_of(3), 2);
        assert_eq!(level_of(6), 2);
        assert_eq!(level_of(7), 3);
    }
}
