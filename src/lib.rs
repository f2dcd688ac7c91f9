//! # UCB Tree Search
//!
//! Monte Carlo Tree Search over a fixed binary tree whose leaves carry random
//! rewards. Each epoch walks down from the root choosing children by a UCB1
//! score, continues to a real leaf if selection stopped early, then walks back
//! up through parent links adding the leaf's reward and a visit to every
//! ancestor. Over many epochs the most visited leaf tends to be the one with the
//! highest reward.
//!
//! ## Modules
//! - [`tree`]: the arena-backed [`BinaryTree`], shape analysis and pretty printing
//! - [`config`]: [`MctsConfig`] and the [`BackupStrategy`] switch
//! - [`experiment`]: repeated independent trials, run in parallel
//!
//! ## Usage
//! ```
//! use mcts::{MctsConfig, MCTS};
//!
//! let mut search = MCTS::with_seed(&MctsConfig::default(), 42).unwrap();
//! let stats = search.run(1_000);
//! assert_eq!(stats.root_visits, 1_000);
//! ```

pub mod config;
pub mod error;
pub mod experiment;
pub mod tree;

pub use config::{BackupStrategy, MctsConfig};
pub use error::{MctsError, TreeError};
pub use tree::{BinaryTree, Label, Node, NodeId, TreeProperties};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, trace};

/// Counters describing the work done by an engine so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Completed epochs.
    pub epochs: u64,
    /// Visits recorded at the root; equals `epochs` for every tree.
    pub root_visits: u64,
    /// Epochs whose selection stopped at an unvisited internal node.
    pub early_stops: u64,
    pub total_nodes: usize,
}

/// What a single epoch did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochOutcome {
    /// Node where selection stopped; receives the visit-only increment.
    pub stopped_at: NodeId,
    /// Node whose reward was backed up.
    pub leaf: NodeId,
    pub reward: f64,
}

/// The tree search engine.
///
/// Owns its tree and its random source. Independent engines never share
/// state, so many of them can run on different threads.
#[derive(Debug, Clone)]
pub struct MCTS<R: Rng = Xoshiro256PlusPlus> {
    tree: BinaryTree,
    /// The exploration weight for the UCB1 formula.
    exploration_weight: f64,
    backup: BackupStrategy,
    rng: R,
    stats: SearchStatistics,
}

impl MCTS<Xoshiro256PlusPlus> {
    /// Creates an engine driven by a seeded xoshiro generator.
    pub fn with_seed(config: &MctsConfig, seed: u64) -> Result<Self, MctsError> {
        Self::new(config, Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}

impl<R: Rng> MCTS<R> {
    /// Creates a new engine with a freshly generated, randomly rewarded tree.
    ///
    /// # Arguments
    /// * `config` - Tree height, exploration weight and backup strategy.
    /// * `rng` - Random source used for generation and for selection tie-breaks.
    pub fn new(config: &MctsConfig, mut rng: R) -> Result<Self, MctsError> {
        config.validate()?;
        let tree = BinaryTree::random(config.tree_height, &mut rng)?;
        Ok(Self::assemble(tree, config, rng))
    }

    /// Creates an engine over an existing tree. `config.tree_height` is ignored.
    ///
    /// The tree must be strict: a node with a single child would end every
    /// descent early without reaching a leaf.
    pub fn from_tree(tree: BinaryTree, config: &MctsConfig, rng: R) -> Result<Self, MctsError> {
        let config = MctsConfig {
            tree_height: 0,
            ..config.clone()
        };
        config.validate()?;
        tree.check_strict()?;
        Ok(Self::assemble(tree, &config, rng))
    }

    fn assemble(tree: BinaryTree, config: &MctsConfig, rng: R) -> Self {
        let stats = SearchStatistics {
            total_nodes: tree.len(),
            ..Default::default()
        };
        MCTS {
            tree,
            exploration_weight: config.exploration_weight,
            backup: config.backup,
            rng,
            stats,
        }
    }

    pub fn tree(&self) -> &BinaryTree {
        &self.tree
    }

    pub fn into_tree(self) -> BinaryTree {
        self.tree
    }

    pub fn exploration_weight(&self) -> f64 {
        self.exploration_weight
    }

    pub fn statistics(&self) -> SearchStatistics {
        self.stats
    }

    /// Runs `epochs` full select/rollout/backup cycles, one after another.
    pub fn run(&mut self, epochs: u64) -> SearchStatistics {
        for _ in 0..epochs {
            self.run_epoch();
        }
        debug!(
            epochs = self.stats.epochs,
            root_visits = self.stats.root_visits,
            early_stops = self.stats.early_stops,
            "search finished"
        );
        self.stats
    }

    /// Runs a single epoch.
    pub fn run_epoch(&mut self) -> EpochOutcome {
        let stopped_at = self.select();

        let leaf = match self.backup {
            BackupStrategy::Rollout => self.rollout(stopped_at),
            BackupStrategy::Immediate => stopped_at,
        };
        let reward = self.tree.get(leaf).reward;

        self.back_propagate(stopped_at, reward);

        self.stats.epochs += 1;
        self.stats.root_visits = self.tree.get(self.tree.root()).visits;
        if !self.tree.get(stopped_at).is_leaf() {
            self.stats.early_stops += 1;
        }

        trace!(?stopped_at, ?leaf, reward, "epoch complete");
        EpochOutcome {
            stopped_at,
            leaf,
            reward,
        }
    }

    /// Selection phase.
    ///
    /// Descends until it reaches a terminal node: one with no children or
    /// with zero visits. With [`BackupStrategy::Rollout`] the root is never
    /// tested, so at least one step is taken unless the root is a leaf. With
    /// [`BackupStrategy::Immediate`] an unvisited root stops selection at once.
    fn select(&mut self) -> NodeId {
        let mut current = self.tree.root();
        if self.backup == BackupStrategy::Immediate && self.tree.get(current).is_terminal() {
            return current;
        }
        while let Some(next) = self.choose(current) {
            current = next;
            if self.tree.get(current).is_terminal() {
                break;
            }
        }
        current
    }

    /// Rollout phase: descend from `from` with the selection rule until a
    /// node without children is reached.
    fn rollout(&mut self, from: NodeId) -> NodeId {
        let mut current = from;
        while let Some(next) = self.choose(current) {
            current = next;
        }
        current
    }

    /// Backup phase.
    ///
    /// The stopped node gets one visit and no reward. Every ancestor up to and
    /// including the root gets one visit and `reward`.
    fn back_propagate(&mut self, stopped_at: NodeId, reward: f64) {
        let node = self.tree.get_mut(stopped_at);
        node.visits += 1;

        let mut current = node.parent;
        while let Some(id) = current {
            let node = self.tree.get_mut(id);
            node.reward += reward;
            node.visits += 1;
            current = node.parent;
        }
    }

    /// Picks the better-scoring child of `node`, or `None` if it has no
    /// child pair. The children are shuffled first and the first one wins ties.
    fn choose(&mut self, node: NodeId) -> Option<NodeId> {
        let (left, right) = self.tree.get(node).children()?;
        let mut children = [left, right];
        children.shuffle(&mut self.rng);

        let [first, second] = children;
        if self.score(second) > self.score(first) {
            Some(second)
        } else {
            Some(first)
        }
    }

    /// UCB1 score of a node relative to its parent.
    ///
    /// A parentless node has no confidence term and scores its mean reward
    /// (or infinity if it was never visited).
    pub fn score(&self, node: NodeId) -> f64 {
        let parent_visits = self
            .tree
            .parent_of(node)
            .map_or(0, |parent| self.tree.get(parent).visits);
        self.tree
            .get(node)
            .ucb1(parent_visits, self.exploration_weight)
    }

    /// The leaf with the highest reward; the first one in breadth-first order wins ties.
    pub fn best_leaf_by_reward(&self) -> NodeId {
        best_leaf_by(&self.tree, |node| node.reward)
    }

    /// The leaf with the most visits; the first one in breadth-first order wins ties.
    pub fn best_leaf_by_visits(&self) -> NodeId {
        best_leaf_by(&self.tree, |node| node.visits as f64)
    }
}

fn best_leaf_by(tree: &BinaryTree, key: impl Fn(&Node) -> f64) -> NodeId {
    tree.leaves()
        .into_iter()
        .reduce(|best, id| {
            if key(tree.get(id)) > key(tree.get(best)) {
                id
            } else {
                best
            }
        })
        .unwrap_or_else(|| tree.root())
}
