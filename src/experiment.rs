//! # Accuracy Experiments
//!
//! A trial builds its own engine from a seed, runs a fixed number of epochs
//! and checks whether the most visited leaf is also the most rewarding one.
//! An experiment repeats that over many seeds on a rayon thread pool. Every
//! trial owns an independent tree, so trials never share mutable state.

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::info;

use crate::config::MctsConfig;
use crate::error::MctsError;
use crate::tree::NodeId;
use crate::MCTS;

/// Snapshot of one leaf at the end of a trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafSummary {
    pub id: NodeId,
    pub level_index: usize,
    pub reward: f64,
    pub visits: u64,
}

/// Result of a single trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialOutcome {
    pub seed: u64,
    pub best_by_reward: LeafSummary,
    pub best_by_visits: LeafSummary,
}

impl TrialOutcome {
    /// True when the most visited leaf has the same statistics as the most
    /// rewarding one.
    pub fn is_correct(&self) -> bool {
        self.best_by_visits.visits == self.best_by_reward.visits
            && self.best_by_visits.reward == self.best_by_reward.reward
    }
}

/// All trial outcomes of an experiment, in seed order.
#[derive(Debug, Clone, Default)]
pub struct ExperimentReport {
    pub outcomes: Vec<TrialOutcome>,
}

impl ExperimentReport {
    pub fn correct(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_correct()).count()
    }

    pub fn incorrect(&self) -> usize {
        self.outcomes.len() - self.correct()
    }

    /// Fraction of correct trials, or zero for an empty report.
    pub fn accuracy(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.correct() as f64 / self.outcomes.len() as f64
        }
    }
}

fn summarize<R: rand::Rng>(search: &MCTS<R>, id: NodeId) -> LeafSummary {
    let node = search.tree().get(id);
    LeafSummary {
        id,
        level_index: node.level_index,
        reward: node.reward,
        visits: node.visits,
    }
}

/// Runs one trial with a freshly generated tree.
///
/// # Arguments
/// * `config` - Engine configuration shared by all trials.
/// * `epochs` - Number of search epochs to run.
/// * `seed` - Seed for this trial's random source.
pub fn run_trial(config: &MctsConfig, epochs: u64, seed: u64) -> Result<TrialOutcome, MctsError> {
    let mut search = MCTS::with_seed(config, seed)?;
    search.run(epochs);

    Ok(TrialOutcome {
        seed,
        best_by_reward: summarize(&search, search.best_leaf_by_reward()),
        best_by_visits: summarize(&search, search.best_leaf_by_visits()),
    })
}

/// Runs `trials` independent trials in parallel within `pool`.
///
/// Trial `i` uses seed `base_seed + i`, so a report is reproducible no matter
/// how many threads the pool has.
pub fn run_experiment(
    pool: &ThreadPool,
    config: &MctsConfig,
    epochs: u64,
    trials: u32,
    base_seed: u64,
) -> Result<ExperimentReport, MctsError> {
    config.validate()?;

    let outcomes = pool.install(|| {
        (0..trials)
            .into_par_iter()
            .map(|trial| run_trial(config, epochs, base_seed.wrapping_add(trial as u64)))
            .collect::<Result<Vec<_>, _>>()
    })?;

    let report = ExperimentReport { outcomes };
    info!(
        trials,
        correct = report.correct(),
        accuracy = report.accuracy(),
        "experiment finished"
    );
    Ok(report)
}
