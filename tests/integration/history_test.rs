#![allow(clippy::expect_used)]

use hostcheck::application::config::AppConfig;
use hostcheck::application::services::history::{HistoryState, PersistOutcome, SnapshotHistory};
use hostcheck::domain::entities::snapshot::Snapshot;
use hostcheck::domain::ports::store::SnapshotStore;
use hostcheck::domain::rules::{drift_report, LadderCatalog};
use hostcheck::infrastructure::persistence::FileSnapshotStore;

fn snapshot(timestamp: i64, mem_pct: f64, processes: u64) -> Snapshot {
    Snapshot {
        timestamp,
        issues: 0,
        warnings: 1,
        mem_pct,
        disk_pct: 60.0,
        swap_mb: 256.0,
        pageouts: 5_000,
        cpu_load: 2.0,
        processes,
    }
}

fn config_in(dir: &std::path::Path) -> AppConfig {
    let toml_str = format!(
        r#"
[history]
path = "{}"

[thresholds]
mem_warn_percent = 60.0
mem_critical_percent = 80.0
"#,
        dir.join("nested").join("last_run.toml").display()
    );
    let path = dir.join("config.toml");
    std::fs::write(&path, toml_str).expect("write config");
    AppConfig::load_from(&path).expect("load config")
}

#[test]
fn configured_history_path_is_created_on_first_save() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let config = config_in(dir.path());
    let store = FileSnapshotStore::from_config_path(&config.history.path);

    let mut history = SnapshotHistory::load(Some(&store));
    assert_eq!(history.state(), HistoryState::NoHistory);

    assert_eq!(history.save(&snapshot(100, 50.0, 400)), PersistOutcome::Saved);
    assert_eq!(history.state(), HistoryState::Persisted);
    assert!(dir.path().join("nested").join("last_run.toml").exists());
}

#[test]
fn history_round_trip_feeds_drift() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = FileSnapshotStore::new(dir.path().join("last_run.toml"));
    store
        .write_snapshot(&snapshot(100, 50.0, 400))
        .expect("seed snapshot");

    let history = SnapshotHistory::load(Some(&store));
    assert_eq!(history.state(), HistoryState::HistoryLoaded);

    let current = snapshot(200, 80.0, 430);
    let drift = drift_report(&current, history.prior());
    let significant: Vec<&str> = drift
        .iter()
        .filter(|d| d.significant)
        .map(|d| d.field.key())
        .collect();
    // +30 mem crosses 10, +30 processes stays under 50
    assert_eq!(significant, vec!["mem_pct"]);
}

#[test]
fn unwritable_history_path_fails_soft() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").expect("write blocker");
    let store = FileSnapshotStore::new(blocker.join("last_run.toml"));

    let mut history = SnapshotHistory::load(Some(&store));
    assert_eq!(history.state(), HistoryState::NoHistory);
    let outcome = history.save(&snapshot(1, 10.0, 10));
    assert!(matches!(outcome, PersistOutcome::Failed(_)));
}

#[test]
fn configured_thresholds_reach_the_catalog() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let config = config_in(dir.path());
    let thresholds = config.threshold_set();
    assert!((thresholds.mem_warning - 60.0).abs() < f64::EPSILON);
    assert!((thresholds.mem_critical - 80.0).abs() < f64::EPSILON);
    let catalog = LadderCatalog::from_thresholds(&thresholds).expect("catalog");
    assert!(!catalog.is_empty());
}
