//! # UCB Tree Search Accuracy Experiment
//!
//! Repeatedly builds a random binary tree, searches it for a fixed number of
//! epochs and reports how often the most visited leaf is the one with the
//! highest reward.
//!
//! ## Usage
//! Run with `cargo run --release -- --trials 100` for best performance.
//! Set `RUST_LOG=mcts=debug` to see per-run search statistics.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rayon::ThreadPoolBuilder;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mcts::experiment::{run_experiment, TrialOutcome};
use mcts::{BackupStrategy, Label, MctsConfig, MCTS};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Height of each generated tree (0 is a single leaf)
    #[arg(long, default_value_t = 12)]
    height: u32,

    /// Weight of the exploration term in the UCB1 score
    #[arg(long, default_value_t = 250.0)]
    exploration_weight: f64,

    /// Search epochs per trial
    #[arg(long, default_value_t = 100_000)]
    epochs: u64,

    /// Number of independent trials
    #[arg(long, default_value_t = 1_000)]
    trials: u32,

    /// Seed of the first trial; trial i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of worker threads (0 uses all CPUs)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Reward source for backup
    #[arg(long, value_enum, default_value_t = BackupStrategy::Rollout)]
    backup: BackupStrategy,

    /// Print the searched tree of the first trial
    #[arg(long, default_value_t = false)]
    show_tree: bool,

    /// Node label format used by --show-tree
    #[arg(long, value_enum, default_value_t = Label::Index)]
    label: Label,

    /// Only print the final accuracy
    #[arg(long, short, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mcts=info,play=info")),
        )
        .init();

    let args = Args::parse();

    let config = MctsConfig {
        tree_height: args.height,
        exploration_weight: args.exploration_weight,
        backup: args.backup,
    };
    config.validate()?;

    let threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };
    let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;

    info!(
        height = config.tree_height,
        exploration_weight = config.exploration_weight,
        epochs = args.epochs,
        trials = args.trials,
        threads,
        "starting experiment"
    );

    let report = run_experiment(&pool, &config, args.epochs, args.trials, args.seed)?;

    if !args.quiet {
        for outcome in &report.outcomes {
            print_outcome(outcome);
        }
    }

    if args.show_tree {
        let mut search = MCTS::with_seed(&config, args.seed)?;
        search.run(args.epochs);
        println!("Tree for seed {}:", args.seed);
        println!("{}", search.tree().render(args.label));
    }

    println!(
        "Accuracy = {} ({}/{})",
        report.accuracy(),
        report.correct(),
        report.outcomes.len()
    );
    Ok(())
}

fn print_outcome(outcome: &TrialOutcome) {
    if outcome.is_correct() {
        println!("{} (seed {})", "Correct guess".green(), outcome.seed);
    } else {
        println!("{} (seed {})", "Incorrect guess".red(), outcome.seed);
        let r = outcome.best_by_reward;
        let v = outcome.best_by_visits;
        println!(
            "  best by reward: node {} reward={:.2} visits={}",
            r.level_index, r.reward, r.visits
        );
        println!(
            "  best by visits: node {} reward={:.2} visits={}",
            v.level_index, v.reward, v.visits
        );
    }
}
