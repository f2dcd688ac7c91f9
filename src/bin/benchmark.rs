use anyhow::Result;
use clap::Parser;
use mcts::{MctsConfig, SearchStatistics, MCTS};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tree height (default: 16)
    #[arg(long, default_value_t = 16)]
    height: u32,

    /// Number of epochs to run (default: 1,000,000)
    #[arg(long, default_value_t = 1_000_000)]
    epochs: u64,

    /// Exploration weight (default: 250)
    #[arg(long, default_value_t = 250.0)]
    exploration_weight: f64,

    /// Seed for tree generation and selection (default: 0)
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    println!("UCB Tree Search - Benchmark Tool");
    println!("================================");
    println!("Tree Height: {}", args.height);
    println!("Epochs: {}", args.epochs);
    println!("Exploration Weight: {}", args.exploration_weight);
    println!("--------------------------------");

    #[cfg(debug_assertions)]
    println!("WARNING: Running in debug mode. Performance will be significantly lower.\nUse --release for accurate benchmarks.\n");

    let config = MctsConfig {
        tree_height: args.height,
        exploration_weight: args.exploration_weight,
        ..MctsConfig::default()
    };

    let start = Instant::now();
    let mut search = MCTS::with_seed(&config, args.seed)?;
    let build_time = start.elapsed();

    let start = Instant::now();
    let stats = search.run(args.epochs);
    let duration = start.elapsed();

    println!("Tree build: {:.3}s", build_time.as_secs_f64());
    print_stats(&stats, duration);
    Ok(())
}

fn print_stats(stats: &SearchStatistics, duration: Duration) {
    let secs = duration.as_secs_f64();
    let eps = stats.epochs as f64 / secs;

    println!("Results:");
    println!("  Total Nodes: {}", stats.total_nodes);
    println!("  Time: {:.3}s", secs);
    println!("  EPS: {:.0} epochs/sec", eps);
    println!("  Root Visits: {}", stats.root_visits);
    println!("  Early Stops: {}", stats.early_stops);
}
