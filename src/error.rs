//! Error types for tree construction and search setup.
//!
//! Every error here is a deterministic precondition violation. Nothing is
//! retried; errors are surfaced to the caller as soon as they are detected.

use thiserror::Error;

use crate::tree::NodeId;

/// Errors raised while building or initializing a [`BinaryTree`](crate::BinaryTree).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("tree height {height} exceeds the supported maximum of {max}")]
    HeightTooLarge { height: u32, max: u32 },

    #[error("level-order input has no root node")]
    EmptyTree,

    /// A level-order slot is populated but its parent slot is not.
    #[error("parent node missing at index {parent} (required by index {index})")]
    MissingParent { index: usize, parent: usize },

    #[error("reward must be a finite number, got {0}")]
    NonFiniteReward(f64),

    #[error("node {0:?} has children and cannot hold a terminal reward")]
    RewardOnInternalNode(NodeId),

    #[error("node {0:?} does not belong to this tree")]
    UnknownNode(NodeId),

    /// A node has exactly one child; search needs every internal node to have two.
    #[error("node {0:?} has a single child; search requires a strict tree")]
    NotStrict(NodeId),

    #[error("leaf {0:?} has already been visited and its reward is fixed")]
    RewardAfterSearch(NodeId),
}

/// Errors raised while configuring the search engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MctsError {
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("exploration weight must be finite and non-negative, got {0}")]
    InvalidExplorationWeight(f64),
}
