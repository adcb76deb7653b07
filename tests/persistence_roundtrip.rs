//! Leaderboard snapshots and config files on disk

use rank_slot::shell::Session;
use rank_slot::{Config, Leaderboard, LeaderboardConfig, ParkingLot, RankError, Upsert};
use std::io::Cursor;
use tempfile::TempDir;

fn board_config(dir: &TempDir) -> LeaderboardConfig {
    LeaderboardConfig {
        snapshot_path: dir.path().join("leaderboard.txt"),
        ..LeaderboardConfig::default()
    }
}

#[test]
fn test_leaderboard_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = board_config(&dir);

    {
        let mut board = Leaderboard::open(&config).unwrap();
        board.add_or_update("Kurt", 50).unwrap();
        board.add_or_update("Jeff", 75).unwrap();
        board.add_or_update("Eve", 37).unwrap();
        board.add_or_update("Eve", 99).unwrap();
        board.remove("Kurt");
    }

    let text = std::fs::read_to_string(&config.snapshot_path).unwrap();
    assert_eq!(text, "1. Eve - 99\n2. Jeff - 75\n");

    let board = Leaderboard::open(&config).unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board.find("Eve").unwrap().value, 99);
    assert!(board.find("Kurt").is_none());

    let top: Vec<_> = board.top().map(|e| e.key.as_str()).collect();
    assert_eq!(top, ["Eve", "Jeff"]);
}

#[test]
fn test_seeded_roster_written_on_first_change() {
    let dir = TempDir::new().unwrap();
    let config = LeaderboardConfig {
        seed_defaults: true,
        ..board_config(&dir)
    };

    let mut board = Leaderboard::open(&config).unwrap();
    assert_eq!(board.len(), 10);
    assert!(!config.snapshot_path.exists());

    let committed = board.add_or_update("Eve", 99).unwrap();
    assert_eq!(committed.outcome, Upsert::Updated { previous: 37 });
    assert!(committed.is_persisted());

    let text = std::fs::read_to_string(&config.snapshot_path).unwrap();
    assert_eq!(text.lines().next(), Some("1. Eve - 99"));
    assert_eq!(text.lines().count(), 10);
}

#[test]
fn test_existing_snapshot_beats_seed() {
    let dir = TempDir::new().unwrap();
    let config = LeaderboardConfig {
        seed_defaults: true,
        ..board_config(&dir)
    };
    std::fs::write(&config.snapshot_path, "1. Solo - 10\n").unwrap();

    let board = Leaderboard::open(&config).unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board.find("Solo").unwrap().value, 10);
}

#[test]
fn test_snapshot_entries_outside_range_dropped() {
    let dir = TempDir::new().unwrap();
    let config = board_config(&dir);
    std::fs::write(
        &config.snapshot_path,
        "1. Cheater - 500\n2. Fair - 80\nnot a ranking line\n",
    )
    .unwrap();

    let board = Leaderboard::open(&config).unwrap();
    assert_eq!(board.len(), 1);
    assert!(board.find("Cheater").is_none());
}

#[test]
fn test_unwritable_snapshot_keeps_memory_state() {
    let dir = TempDir::new().unwrap();
    let config = LeaderboardConfig {
        snapshot_path: dir.path().join("missing").join("leaderboard.txt"),
        ..LeaderboardConfig::default()
    };

    let mut board = Leaderboard::open(&config).unwrap();
    let committed = board.add_or_update("Jeff", 75).unwrap();

    assert_eq!(committed.outcome, Upsert::Inserted);
    assert!(matches!(committed.persist_error, Some(RankError::Io(_))));
    assert_eq!(board.find("Jeff").unwrap().value, 75);
}

#[test]
fn test_config_file_drives_session() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("rank-slot.toml");
    std::fs::write(
        &config_path,
        r#"
[leaderboard]
top_k = 2
strategy = "incremental"

[parking]
rows = 1
cols = 1
"#,
    )
    .unwrap();

    let mut config = Config::load(&config_path).unwrap();
    config.rebase(dir.path());
    assert_eq!(config.leaderboard.snapshot_path, dir.path().join("leaderboard.txt"));

    let board = Leaderboard::open(&config.leaderboard).unwrap();
    let lot = ParkingLot::open(&config.parking).unwrap();
    let mut session = Session::new(board, lot);

    let script = "add Kurt 50\nadd Jeff 75\nadd Eve 37\ntop\npark AAA\npark BBB\nquit\n";
    let mut out = Vec::new();
    session.run(Cursor::new(script), &mut out).unwrap();

    assert_eq!(session.board().view().len(), 2);
    assert_eq!(session.lot().grid().queue().len(), 1);
    assert!(dir.path().join("leaderboard.txt").exists());
    assert!(dir.path().join("current_parked_vehicles.txt").exists());
    assert!(dir.path().join("parking_log.txt").exists());
}

#[test]
fn test_invalid_config_rejected() {
    let err = Config::from_toml_str("[leaderboard]\ntop_k = 0\n").unwrap_err();
    assert!(matches!(err, RankError::InvalidConfig(_)));

    let err = Config::from_toml_str("[parking]\nrows = 27\n").unwrap_err();
    assert!(matches!(err, RankError::InvalidConfig(_)));
}
