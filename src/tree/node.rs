//! Binary tree vertex and its arena index.

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A vertex of the binary tree.
///
/// Children are owned through the arena; `parent` is a plain index used only
/// for walking upward during backup.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Label drawn from the random permutation assigned at generation.
    pub value: usize,
    /// Position of this node in level order (root is 0).
    pub level_index: usize,
    /// Terminal reward for leaves, accumulated reward mass for internal nodes.
    pub reward: f64,
    /// Number of backup passes that went through this node.
    pub visits: u64,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(value: usize, level_index: usize) -> Self {
        Self {
            value,
            level_index,
            reward: 0.0,
            visits: 0,
            left: None,
            right: None,
            parent: None,
        }
    }

    /// Returns true if the node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns true if selection should stop at this node.
    ///
    /// A node is terminal when it has no children, or when it has never been
    /// visited. The second clause means selection may stop at an internal
    /// node, which is why the engine follows selection with a rollout.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.is_leaf() || self.visits == 0
    }

    /// Both children, if the node has exactly two.
    #[inline]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match (self.left, self.right) {
            (Some(left), Some(right)) => Some((left, right)),
            _ => None,
        }
    }

    /// Average reward per visit, or zero for an unvisited node.
    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward / self.visits as f64
        }
    }

    /// Calculates the UCB1 (Upper Confidence Bound 1) score for this node.
    ///
    /// Unvisited nodes score positive infinity. A parent with zero visits is
    /// treated as having one, so the confidence term is zero instead of NaN.
    ///
    /// # Arguments
    /// * `parent_visits` - The number of visits to the parent node.
    /// * `exploration_weight` - A constant to tune the level of exploration.
    pub fn ucb1(&self, parent_visits: u64, exploration_weight: f64) -> f64 {
        if self.visits == 0 {
            f64::INFINITY
        } else {
            let visits = self.visits as f64;
            let parent_visits = parent_visits.max(1) as f64;
            self.reward / visits + exploration_weight * (parent_visits.ln() / visits).sqrt()
        }
    }
}
