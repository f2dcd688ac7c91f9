//! Search behaviour across whole runs

use mcts::experiment::run_experiment;
use mcts::{BackupStrategy, MctsConfig, MCTS};
use proptest::prelude::*;
use rayon::ThreadPoolBuilder;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_visit_conservation(
        height in 0u32..=5,
        epochs in 0u64..400,
        seed in any::<u64>(),
        immediate in any::<bool>(),
    ) {
        let config = MctsConfig {
            tree_height: height,
            exploration_weight: 25.0,
            backup: if immediate { BackupStrategy::Immediate } else { BackupStrategy::Rollout },
        };
        let mut search = MCTS::with_seed(&config, seed).unwrap();
        let leaf_rewards: Vec<f64> = search.tree().nodes().iter().map(|n| n.reward).collect();

        let stats = search.run(epochs);
        let tree = search.tree();

        prop_assert_eq!(stats.epochs, epochs);
        prop_assert_eq!(tree.get(tree.root()).visits, epochs);

        for (id, node) in tree.iter() {
            match node.children() {
                Some((left, right)) => {
                    prop_assert!(node.visits >= tree.get(left).visits + tree.get(right).visits);
                }
                None => prop_assert_eq!(node.reward, leaf_rewards[id.0 as usize]),
            }
        }
    }
}

#[test]
fn test_most_visited_leaf_tends_to_be_best() {
    let pool = ThreadPoolBuilder::new().num_threads(4).build().unwrap();
    let config = MctsConfig {
        tree_height: 2,
        exploration_weight: 50.0,
        backup: BackupStrategy::Rollout,
    };
    let trials = 32;
    let report = run_experiment(&pool, &config, 10_000, trials, 2024).unwrap();

    assert_eq!(report.outcomes.len(), trials as usize);
    assert!(
        report.correct() * 2 > trials as usize,
        "only {} of {} trials found the best leaf",
        report.correct(),
        trials
    );
}

#[test]
fn test_render_after_search() {
    let mut search = MCTS::with_seed(&MctsConfig::for_testing(), 3).unwrap();
    search.run(10);
    let rendered = search.tree().render(mcts::Label::Index);
    assert!(rendered.starts_with(' '));
    assert!(rendered.contains("0-10"));
}
