//! Search configuration parameters.

use crate::error::{MctsError, TreeError};
use crate::tree::MAX_HEIGHT;

/// Where the reward propagated by a backup pass comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BackupStrategy {
    /// Continue from the selection-stopped node down to a real leaf and back
    /// up that leaf's reward.
    #[default]
    Rollout,
    /// Back up the selection-stopped node's own reward with no rollout.
    /// Selection may stop at the root itself while it is unvisited, so the
    /// first epoch only counts a root visit with a reward of zero.
    /// Kept for comparison against the canonical strategy.
    Immediate,
}

/// Configuration for the tree search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Height of the generated tree (0 is a single leaf).
    pub tree_height: u32,

    /// Weight of the confidence term in the UCB1 score.
    /// Higher values encourage exploration, lower values favor exploitation.
    /// Leaf rewards span `[0, 100)`, so useful values are of the same order.
    pub exploration_weight: f64,

    pub backup: BackupStrategy,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            tree_height: 3,
            exploration_weight: 50.0,
            backup: BackupStrategy::Rollout,
        }
    }
}

impl MctsConfig {
    /// Create a small config for testing.
    pub fn for_testing() -> Self {
        Self {
            tree_height: 2,
            exploration_weight: 10.0,
            backup: BackupStrategy::Rollout,
        }
    }

    /// Checks the height bound and that the exploration weight is usable.
    pub fn validate(&self) -> Result<(), MctsError> {
        if self.tree_height > MAX_HEIGHT {
            return Err(TreeError::HeightTooLarge {
                height: self.tree_height,
                max: MAX_HEIGHT,
            }
            .into());
        }
        if !self.exploration_weight.is_finite() || self.exploration_weight < 0.0 {
            return Err(MctsError::InvalidExplorationWeight(self.exploration_weight));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(MctsConfig::default().validate().is_ok());
        assert!(MctsConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_weight() {
        for weight in [-1.0, f64::NAN, f64::INFINITY] {
            let config = MctsConfig {
                exploration_weight: weight,
                ..MctsConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(MctsError::InvalidExplorationWeight(_))
            ));
        }
    }

    #[test]
    fn test_rejects_tall_tree() {
        let config = MctsConfig {
            tree_height: MAX_HEIGHT + 1,
            ..MctsConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(MctsError::Tree(TreeError::HeightTooLarge {
                height: MAX_HEIGHT + 1,
                max: MAX_HEIGHT
            }))
        );
    }
}
