//! Parking lot scenarios: admission, overflow queueing, release history and
//! restart recovery

use rank_slot::{Admission, ParkingConfig, ParkingLot, RankError, ResourceGrid, SlotLabel};
use std::collections::HashSet;
use tempfile::TempDir;

fn label(s: &str) -> SlotLabel {
    s.parse().unwrap()
}

fn on_disk(dir: &TempDir) -> ParkingConfig {
    ParkingConfig {
        snapshot_path: dir.path().join("current_parked_vehicles.txt"),
        audit_log_path: dir.path().join("parking_log.txt"),
        ..ParkingConfig::default()
    }
}

#[test]
fn test_full_grid_queue_then_release() {
    let mut grid = ResourceGrid::new(2, 3).unwrap();
    for key in ["K1", "K2", "K3", "K4", "K5", "K6"] {
        assert!(matches!(grid.admit(key).unwrap(), Admission::Admitted { .. }));
    }
    assert!(grid.is_full());

    assert_eq!(grid.admit("X").unwrap(), Admission::Queued { position: 1 });
    assert_eq!(grid.queue().iter().collect::<Vec<_>>(), ["X"]);

    let release = grid.release("K1").unwrap();
    let promoted = release.promoted.unwrap();
    assert_eq!(promoted.key, "X");
    assert_eq!(promoted.label, release.label);
    assert_eq!(grid.find_slot("X"), Some(label("A1")));
    assert!(grid.queue().is_empty());
}

#[test]
fn test_admit_release_history_grows_by_one() {
    let mut grid = ResourceGrid::new(2, 3).unwrap();
    grid.admit("K1").unwrap();

    let full_before = grid.is_full();
    let history_before = grid.history().len();

    grid.admit("AAA").unwrap();
    let release = grid.release("AAA").unwrap();

    assert_eq!(grid.is_full(), full_before);
    assert_eq!(grid.history().len(), history_before + 1);
    assert_eq!(grid.history().peek(), Some(release.label));
}

#[test]
fn test_queue_drains_in_fifo_order() {
    let mut grid = ResourceGrid::new(1, 2).unwrap();
    grid.admit("A").unwrap();
    grid.admit("B").unwrap();
    grid.admit("Q1").unwrap();
    grid.admit("Q2").unwrap();
    assert_eq!(grid.queue().len(), 2);

    let first = grid.release("B").unwrap();
    assert_eq!(first.promoted.unwrap().key, "Q1");
    assert_eq!(grid.queue().len(), 1);

    let second = grid.release("A").unwrap();
    assert_eq!(second.promoted.unwrap().key, "Q2");
    assert!(grid.queue().is_empty());

    let labels: Vec<_> = grid.history().iter().map(|l| l.to_string()).collect();
    assert_eq!(labels, ["A1", "A2"]);
}

#[test]
fn test_no_key_in_two_places() {
    let mut grid = ResourceGrid::new(1, 2).unwrap();
    let keys = ["A", "B", "C", "A", "C", "D"];
    for key in keys {
        grid.admit(key).unwrap();
    }
    grid.release("A").unwrap();
    grid.admit("A").unwrap();

    let parked: Vec<_> = grid.slots().filter_map(|(_, k)| k).collect();
    let unique: HashSet<_> = parked.iter().collect();
    assert_eq!(parked.len(), unique.len());

    for key in grid.queue().iter() {
        assert!(!parked.contains(&key), "{} both parked and queued", key);
    }
    assert_eq!(grid.log().len(), grid.occupied());
}

#[test]
fn test_restart_restores_occupancy() {
    let dir = TempDir::new().unwrap();
    let config = on_disk(&dir);

    let before: Vec<(SlotLabel, Option<String>)> = {
        let mut lot = ParkingLot::open(&config).unwrap();
        for key in ["K1", "K2", "K3", "K4"] {
            lot.admit(key).unwrap();
        }
        lot.release("K2").unwrap();
        lot.grid()
            .slots()
            .map(|(l, k)| (l, k.map(str::to_string)))
            .collect()
    };

    let lot = ParkingLot::open(&config).unwrap();
    let after: Vec<(SlotLabel, Option<String>)> = lot
        .grid()
        .slots()
        .map(|(l, k)| (l, k.map(str::to_string)))
        .collect();

    assert_eq!(before, after);
    assert_eq!(lot.find_slot("K3"), Some(label("A3")));
    assert_eq!(lot.find_slot("K2"), None);
    assert_eq!(lot.grid().log().len(), 3);

    // Queue and history are not persisted
    assert!(lot.grid().queue().is_empty());
    assert!(lot.grid().history().is_empty());
}

#[test]
fn test_restart_then_admit_fills_gap() {
    let dir = TempDir::new().unwrap();
    let config = on_disk(&dir);
    std::fs::write(&config.snapshot_path, "OLD1 at slot A1\nOLD2 at slot A3\n").unwrap();

    let mut lot = ParkingLot::open(&config).unwrap();
    let parked = lot.admit("NEW").unwrap();
    assert_eq!(parked.outcome, Admission::Admitted { label: label("A2") });
}

#[test]
fn test_audit_log_is_append_only_across_restarts() {
    let dir = TempDir::new().unwrap();
    let config = on_disk(&dir);

    {
        let mut lot = ParkingLot::open(&config).unwrap();
        lot.admit("AAA").unwrap();
    }
    {
        let mut lot = ParkingLot::open(&config).unwrap();
        lot.release("AAA").unwrap();
    }

    let text = std::fs::read_to_string(&config.audit_log_path).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Parked: AAA at slot A1"));
    assert!(lines[1].contains("Retrieved: AAA from slot A1"));
}

#[test]
fn test_invalid_plate_rejected() {
    let mut lot = ParkingLot::in_memory(&ParkingConfig::default()).unwrap();
    assert!(matches!(lot.admit("has space"), Err(RankError::InvalidKey(_))));
    assert_eq!(lot.grid().occupied(), 0);
}
