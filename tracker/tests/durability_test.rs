//! Integration tests for record durability.
//!
//! These tests exercise the tracker end-to-end over a real [`FileStore`],
//! verifying that the record survives across tracker instances (simulated
//! page loads), tolerates corrupt stored data, and converges on the last
//! writer when two trackers share one file.

use std::path::Path;

use engage_tracker::config::Config;
use engage_tracker::store::{FileStore, RecordStore};
use engage_tracker::tracker::EngagementTracker;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn test_config(data_dir: &Path) -> Config {
    Config {
        data_dir: data_dir.to_path_buf(),
        recent_cap: 50,
        snapshot_events: 10,
    }
}

/// Constructs a tracker over a file store rooted at `data_dir`, simulating
/// one page load per call.
fn new_tracker(data_dir: &Path) -> EngagementTracker<FileStore> {
    EngagementTracker::new(FileStore::new(data_dir), test_config(data_dir))
}

fn read_stored_json(data_dir: &Path) -> serde_json::Value {
    let text = FileStore::new(data_dir)
        .read()
        .expect("store readable")
        .expect("record present");
    serde_json::from_str(&text).expect("stored record is valid JSON")
}

// ============================================================================
// Durability Across Page Loads
// ============================================================================

#[test]
fn record_survives_across_tracker_instances() {
    let dir = TempDir::new().unwrap();

    let mut first = new_tracker(dir.path());
    first.initialize();
    first.record_click("facebook", 2);
    first.record_click("instagram", 5);
    drop(first);

    let mut second = new_tracker(dir.path());
    second.initialize();

    let snapshot = second.query();
    assert_eq!(snapshot.visit_count, 2);
    assert_eq!(snapshot.total_clicks, 2);
    assert_eq!(snapshot.clicks_by_platform["facebook"], 1);
    assert_eq!(snapshot.clicks_by_platform["instagram"], 1);
    assert_eq!(snapshot.recent_events.len(), 2);
}

#[test]
fn visit_count_accumulates_one_per_initialization() {
    let dir = TempDir::new().unwrap();

    for expected in 1..=4u64 {
        let mut tracker = new_tracker(dir.path());
        tracker.initialize();
        assert_eq!(tracker.query().visit_count, expected);
    }
}

#[test]
fn stored_record_uses_camel_case_schema() {
    let dir = TempDir::new().unwrap();

    let mut tracker = new_tracker(dir.path());
    tracker.initialize();
    tracker.record_click("tiktok", 9);

    let json = read_stored_json(dir.path());
    assert_eq!(json["visitCount"], 1);
    assert_eq!(json["totalClicks"], 1);
    assert_eq!(json["clicksByPlatform"]["tiktok"], 1);
    assert_eq!(json["lastClick"]["platform"], "tiktok");
    assert_eq!(json["recentEvents"][0]["secondsOnPage"], 9);
    assert!(json["sessionStart"].is_string());
}

// ============================================================================
// Corruption and Legacy Tolerance
// ============================================================================

#[test]
fn corrupt_file_on_disk_yields_fresh_record() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("engagement.json"), "<<< not json >>>").unwrap();

    let mut tracker = new_tracker(dir.path());
    tracker.initialize();

    let snapshot = tracker.query();
    assert_eq!(snapshot.visit_count, 1);
    assert_eq!(snapshot.total_clicks, 0);

    // The fresh record also replaced the corrupt file.
    let json = read_stored_json(dir.path());
    assert_eq!(json["visitCount"], 1);
}

#[test]
fn visit_only_record_is_readable() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("engagement.json"), r#"{"visitCount":12}"#).unwrap();

    let mut tracker = new_tracker(dir.path());
    tracker.initialize();

    let snapshot = tracker.query();
    assert_eq!(snapshot.visit_count, 13);
    assert_eq!(snapshot.total_clicks, 0);
    assert!(snapshot.recent_events.is_empty());
}

#[test]
fn record_with_unknown_fields_is_readable() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("engagement.json"),
        r#"{"visitCount":1,"clicksByPlatform":{"facebook":3},"heatmap":[1,2,3]}"#,
    )
    .unwrap();

    let mut tracker = new_tracker(dir.path());
    tracker.initialize();

    assert_eq!(tracker.query().clicks_by_platform["facebook"], 3);
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn reset_removes_the_record_file() {
    let dir = TempDir::new().unwrap();

    let mut tracker = new_tracker(dir.path());
    tracker.initialize();
    tracker.record_click("facebook", 1);
    assert!(dir.path().join("engagement.json").exists());

    tracker.reset();

    assert!(!dir.path().join("engagement.json").exists());
}

#[test]
fn fresh_start_after_reset_persists_again() {
    let dir = TempDir::new().unwrap();

    let mut tracker = new_tracker(dir.path());
    tracker.initialize();
    tracker.record_click("facebook", 1);
    tracker.reset();

    tracker.record_click("twitter", 3);

    let json = read_stored_json(dir.path());
    assert_eq!(json["visitCount"], 0);
    assert_eq!(json["totalClicks"], 1);
    assert_eq!(json["clicksByPlatform"]["twitter"], 1);
    assert!(json["clicksByPlatform"].get("facebook").is_none());
}

// ============================================================================
// Concurrent Writers
// ============================================================================

#[test]
fn shared_record_converges_on_last_writer() {
    let dir = TempDir::new().unwrap();

    let mut first = new_tracker(dir.path());
    first.initialize();
    let mut second = new_tracker(dir.path());
    second.initialize();

    first.record_click("facebook", 1);
    second.record_click("instagram", 2);

    // The second tracker loaded before the first tracker's click, so the
    // stored record reflects only the last writer's view.
    let json = read_stored_json(dir.path());
    assert_eq!(json["clicksByPlatform"]["instagram"], 1);
    assert!(json["clicksByPlatform"].get("facebook").is_none());
    assert_eq!(json["visitCount"], 2);
}

// ============================================================================
// History Bounds
// ============================================================================

#[test]
fn history_cap_is_enforced_across_page_loads() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        recent_cap: 4,
        snapshot_events: 10,
    };

    let mut first = EngagementTracker::new(FileStore::new(dir.path()), config.clone());
    first.initialize();
    for i in 0..6 {
        first.record_click(&format!("p{i}"), i);
    }
    drop(first);

    let mut second = EngagementTracker::new(FileStore::new(dir.path()), config);
    second.initialize();

    let snapshot = second.query();
    assert_eq!(snapshot.recent_events.len(), 4);
    assert_eq!(snapshot.recent_events[0].platform, "p2");
    assert_eq!(snapshot.recent_events[3].platform, "p5");
}
