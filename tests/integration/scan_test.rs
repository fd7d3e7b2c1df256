#![allow(clippy::expect_used)]

use chrono::{DateTime, Duration, TimeZone, Utc};

use hostcheck::application::config::AppConfig;
use hostcheck::application::services::diagnostic::{DiagnosticReport, DiagnosticService};
use hostcheck::application::services::history::{HistoryState, PersistOutcome};
use hostcheck::domain::entities::fix_action::Selection;
use hostcheck::domain::ports::store::SnapshotStore;
use hostcheck::domain::rules::{metric, Direction, LadderCatalog, RuleEngine};
use hostcheck::domain::value_objects::severity::Severity;
use hostcheck::infrastructure::persistence::FileSnapshotStore;
use hostcheck::infrastructure::providers::StaticProvider;

// ---------------------------------------------------------------------------
// Fixture loader
// ---------------------------------------------------------------------------

fn load_fixture(name: &str) -> StaticProvider {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    StaticProvider::load_from(&path).expect("Failed to load fixture")
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0)
        .single()
        .expect("valid time")
}

fn scan(
    provider: &StaticProvider,
    store: Option<&dyn SnapshotStore>,
    at: DateTime<Utc>,
) -> DiagnosticReport {
    let config = AppConfig::default();
    let engine = RuleEngine::new(
        LadderCatalog::from_thresholds(&config.threshold_set()).expect("catalog"),
    );
    let matcher = config.bundle_matcher();
    DiagnosticService::new(provider, provider, store, &engine, &matcher, config.general.top_k)
        .run_at(at)
        .expect("scan")
}

fn severity(report: &DiagnosticReport, name: &str) -> Severity {
    report
        .findings
        .iter()
        .find(|f| f.metric == name)
        .map(|f| f.severity)
        .expect("finding present")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn healthy_fixture_is_clean() {
    let report = scan(&load_fixture("healthy_host.json"), None, now());

    assert_eq!(report.issues_found, 0);
    assert_eq!(report.warnings_found, 0);
    assert_eq!(report.exit_code(), 0);
    assert!(report.fixes.is_empty());
    assert!(report
        .findings
        .iter()
        .all(|f| matches!(f.severity, Severity::Ok | Severity::Info)));

    let helpers = report.app_helpers.as_ref().expect("slack helper grouped");
    assert_eq!(helpers.entities.len(), 1);
    assert_eq!(helpers.entities[0].group_key, "Slack");
    assert_eq!(severity(&report, metric::HELPER_RSS_MB), Severity::Ok);

    let scripts = report.scripts.as_ref().expect("python worker grouped");
    assert_eq!(scripts.entities[0].group_key, "python3:worker.py");
}

#[test]
fn stressed_fixture_flags_every_problem() {
    let report = scan(&load_fixture("stressed_host.json"), None, now());

    for name in [
        metric::MEM_PCT,
        metric::DISK_PCT,
        metric::BATTERY_PCT,
        metric::WIFI_RSSI,
        metric::CPU_LOAD,
        metric::HELPER_RSS_MB,
    ] {
        assert_eq!(severity(&report, name), Severity::Critical, "{name}");
    }
    for name in [
        metric::SWAP_MB,
        metric::PAGEOUTS,
        metric::PROCESSES,
        metric::UPTIME_DAYS,
        metric::FIREWALL,
        metric::CLOUD_SYNC_AGE_DAYS,
        metric::TOP_CPU_PCT,
    ] {
        assert_eq!(severity(&report, name), Severity::Warning, "{name}");
    }
    assert_eq!(severity(&report, metric::BATTERY_CYCLES), Severity::Info);

    assert_eq!(report.issues_found, 6);
    assert_eq!(report.warnings_found, 7);
    assert_eq!(report.exit_code(), 1);

    let labels: Vec<&str> = report
        .fixes
        .resolve(&Selection::All)
        .iter()
        .map(|f| f.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Purge inactive memory",
            "Empty the trash",
            "Enable the application firewall"
        ]
    );
}

#[test]
fn stressed_fixture_groups_helpers_and_scripts() {
    let report = scan(&load_fixture("stressed_host.json"), None, now());

    let helpers = report.app_helpers.as_ref().expect("helpers");
    let keys: Vec<&str> = helpers.entities.iter().map(|e| e.group_key.as_str()).collect();
    assert_eq!(keys, vec!["Slack", "Visual Studio Code"]);
    assert!((helpers.total.total_rss_mb - 4608.0).abs() < f64::EPSILON);

    let scripts = report.scripts.as_ref().expect("scripts");
    let keys: Vec<&str> = scripts.entities.iter().map(|e| e.group_key.as_str()).collect();
    assert_eq!(keys, vec!["node:webpack", "node:server.js"]);

    assert_eq!(report.top_cpu[0].members[0].pid, 62003);
    assert_eq!(report.top_memory[0].members[0].pid, 62001);
    assert_eq!(report.top_cpu.len(), 5);
}

#[test]
fn second_run_reports_drift_from_file_history() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = FileSnapshotStore::new(dir.path().join("state").join("last_run.toml"));

    let first = scan(&load_fixture("healthy_host.json"), Some(&store), now());
    assert_eq!(first.history, HistoryState::Persisted);
    assert_eq!(first.persist, PersistOutcome::Saved);
    assert!(first.drift.is_empty());
    assert!(store.path().exists());

    let second = scan(
        &load_fixture("stressed_host.json"),
        Some(&store),
        now() + Duration::hours(6),
    );
    let mem = second
        .drift
        .iter()
        .find(|d| d.field.key() == "mem_pct")
        .expect("mem drift");
    assert_eq!(mem.delta.direction, Direction::Up);
    assert!((mem.delta.magnitude - 51.0).abs() < f64::EPSILON);
    assert!(mem.significant);

    // swap was zero last time: no baseline, no drift
    let swap = second
        .drift
        .iter()
        .find(|d| d.field.key() == "swap_mb")
        .expect("swap drift");
    assert_eq!(swap.delta.direction, Direction::None);
    assert!(!swap.significant);

    // drift notes never move the counters
    assert_eq!(second.issues_found, 6);
    assert_eq!(second.warnings_found, 7);

    let stored = store.read_snapshot().expect("read").expect("present");
    assert_eq!(stored, second.snapshot);
}

#[test]
fn corrupt_history_is_treated_as_first_run() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("last_run.toml");
    std::fs::write(&path, "issues = \"lots\"\n").expect("write garbage");
    let store = FileSnapshotStore::new(&path);

    let report = scan(&load_fixture("healthy_host.json"), Some(&store), now());
    assert!(report.drift.is_empty());
    assert_eq!(report.persist, PersistOutcome::Saved);
    assert!(store.read_snapshot().expect("readable now").is_some());
}

#[test]
fn text_memory_reading_still_reports_critical_disk_and_saves() {
    let provider = StaticProvider::new()
        .with(metric::MEM_PCT, "93%")
        .with(metric::DISK_PCT, 95.0);
    let dir = tempfile::tempdir().expect("create tempdir");
    let store = FileSnapshotStore::new(dir.path().join("last_run.toml"));

    let report = scan(&provider, Some(&store), now());
    assert_eq!(severity(&report, metric::MEM_PCT), Severity::Info);
    assert_eq!(severity(&report, metric::DISK_PCT), Severity::Critical);
    assert_eq!(report.issues_found, 1);
    assert_eq!(report.persist, PersistOutcome::Saved);

    let stored = store.read_snapshot().expect("read").expect("present");
    assert!((stored.disk_pct - 95.0).abs() < f64::EPSILON);
    assert_eq!(stored.issues, 1);
}

#[test]
fn report_json_has_expected_shape() {
    let report = scan(&load_fixture("stressed_host.json"), None, now());
    let json = serde_json::to_value(&report).expect("serialize");

    assert_eq!(json["issues_found"], 6);
    assert_eq!(json["warnings_found"], 7);
    assert_eq!(json["history"], "no_history");
    assert_eq!(json["persist"]["status"], "skipped");
    assert_eq!(json["app_helpers"]["total"]["group_key"], "TOTAL");
    assert_eq!(json["fixes"]["actions"][0]["index"], 0);
    assert_eq!(json["snapshot"]["processes"], 1104);
}
