//! Property-based tests for the registry and top-K view
//!
//! A plain `Vec` model (insertion order, in-place updates) serves as the
//! oracle: after every call the view must equal the model's K largest values
//! under a stable descending sort.

use proptest::prelude::*;
use rank_slot::{Leaderboard, LeaderboardConfig, RecomputeStrategy, Upsert};

const MAX_ENTITIES: usize = 25;

fn expected_top(model: &[(String, i64)], k: usize) -> Vec<(String, i64)> {
    let mut sorted = model.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.truncate(k);
    sorted
}

fn strategy() -> impl Strategy<Value = RecomputeStrategy> {
    prop_oneof![
        Just(RecomputeStrategy::FullSort),
        Just(RecomputeStrategy::Incremental),
    ]
}

proptest! {
    #[test]
    fn prop_top_k_matches_model(
        k in 1usize..12,
        strategy in strategy(),
        ops in prop::collection::vec((0usize..40, 0i64..=100), 1..80)
    ) {
        let config = LeaderboardConfig {
            top_k: k,
            max_entities: MAX_ENTITIES,
            strategy,
            ..LeaderboardConfig::default()
        };
        let mut board = Leaderboard::in_memory(&config);
        let mut model: Vec<(String, i64)> = Vec::new();

        for (key_idx, value) in ops {
            let key = format!("player{}", key_idx);
            board.add_or_update(&key, value).unwrap();

            if let Some(entry) = model.iter_mut().find(|(name, _)| *name == key) {
                entry.1 = value;
            } else if model.len() < MAX_ENTITIES {
                model.push((key.clone(), value));
            }

            let actual: Vec<(String, i64)> = board
                .top()
                .map(|e| (e.key.clone(), e.value))
                .collect();
            prop_assert_eq!(actual, expected_top(&model, k));
        }
    }

    #[test]
    fn prop_find_after_upsert_returns_value(
        ops in prop::collection::vec((0usize..10, 0i64..=100), 1..40)
    ) {
        let mut board = Leaderboard::in_memory(&LeaderboardConfig::default());

        for (key_idx, value) in ops {
            let key = format!("p{}", key_idx);
            board.add_or_update(&key, value).unwrap();
            prop_assert_eq!(board.find(&key).map(|e| e.value), Some(value));
        }
    }

    #[test]
    fn prop_count_never_exceeds_capacity(
        capacity in 1usize..10,
        keys in prop::collection::vec(0usize..30, 1..60)
    ) {
        let config = LeaderboardConfig {
            max_entities: capacity,
            ..LeaderboardConfig::default()
        };
        let mut board = Leaderboard::in_memory(&config);

        for key_idx in keys {
            let before = board.len();
            let outcome = board.add_or_update(&format!("k{}", key_idx), 50).unwrap().outcome;

            prop_assert!(board.len() <= capacity);
            if let Upsert::Rejected { .. } = outcome {
                prop_assert_eq!(board.len(), before);
                prop_assert_eq!(before, capacity);
            }
        }
    }

    #[test]
    fn prop_strategies_agree_after_removals(
        ops in prop::collection::vec((0usize..20, 0i64..=100, any::<bool>()), 1..60)
    ) {
        let full = LeaderboardConfig {
            top_k: 5,
            strategy: RecomputeStrategy::FullSort,
            ..LeaderboardConfig::default()
        };
        let incremental = LeaderboardConfig {
            strategy: RecomputeStrategy::Incremental,
            ..full.clone()
        };
        let mut a = Leaderboard::in_memory(&full);
        let mut b = Leaderboard::in_memory(&incremental);

        for (key_idx, value, remove) in ops {
            let key = format!("e{}", key_idx);
            if remove {
                a.remove(&key);
                b.remove(&key);
            } else {
                a.add_or_update(&key, value).unwrap();
                b.add_or_update(&key, value).unwrap();
            }

            let top_a: Vec<_> = a.top().cloned().collect();
            let top_b: Vec<_> = b.top().cloned().collect();
            prop_assert_eq!(top_a, top_b);
        }
    }
}

#[test]
fn test_twenty_sixth_player_rejected() {
    let mut board = Leaderboard::in_memory(&LeaderboardConfig::default());
    for i in 0..MAX_ENTITIES {
        let outcome = board.add_or_update(&format!("player{}", i), 10).unwrap().outcome;
        assert_eq!(outcome, Upsert::Inserted);
    }

    let outcome = board.add_or_update("late", 100).unwrap().outcome;
    assert_eq!(outcome, Upsert::Rejected { capacity: MAX_ENTITIES });
    assert_eq!(board.len(), MAX_ENTITIES);
    assert!(board.find("late").is_none());
}

#[test]
fn test_eve_updated_not_duplicated() {
    let mut board = Leaderboard::in_memory(&LeaderboardConfig::default());
    board.add_or_update("Eve", 37).unwrap();
    board.add_or_update("Eve", 99).unwrap();

    let all: Vec<_> = board.all().collect();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].key, "Eve");
    assert_eq!(all[0].value, 99);
}
