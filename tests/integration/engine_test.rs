#![allow(clippy::expect_used)]

use hostcheck::domain::aggregation::bundles::BundleMatcher;
use hostcheck::domain::aggregation::{aggregate, top_k};
use hostcheck::domain::entities::fix_action::{FixRegistry, Selection};
use hostcheck::domain::entities::process::ProcessSample;
use hostcheck::domain::entities::run_context::RunContext;
use hostcheck::domain::rules::{
    classify, classify_reading, load_int, metric, ConfigurationError, LadderCatalog, Predicate,
    RuleEngine, ThresholdLadder,
};
use hostcheck::domain::value_objects::metric::MetricValue;
use hostcheck::domain::value_objects::severity::Severity;
use hostcheck::domain::value_objects::thresholds::ThresholdSet;

fn catalog() -> LadderCatalog {
    LadderCatalog::from_thresholds(&ThresholdSet::default()).expect("default catalog")
}

fn severity_of(engine: &RuleEngine, name: &str, value: f64) -> Severity {
    let mut ctx = RunContext::new();
    engine
        .evaluate(&mut ctx, name, Some(&MetricValue::Number(value)))
        .expect("classify")
        .severity
}

// ---------------------------------------------------------------------------
// Ladders
// ---------------------------------------------------------------------------

#[test]
fn memory_ladder_boundaries() {
    let engine = RuleEngine::new(catalog());
    assert_eq!(severity_of(&engine, metric::MEM_PCT, 74.0), Severity::Ok);
    assert_eq!(severity_of(&engine, metric::MEM_PCT, 75.0), Severity::Warning);
    assert_eq!(severity_of(&engine, metric::MEM_PCT, 90.0), Severity::Critical);
    assert_eq!(severity_of(&engine, metric::MEM_PCT, 91.0), Severity::Critical);
}

#[test]
fn cpu_load_ladder_scales_with_cores() {
    let ladder = catalog().cpu_load(8).expect("cpu ladder");
    let classify_load = |load: f64| {
        let mut ctx = RunContext::new();
        classify(&mut ctx, metric::CPU_LOAD, &MetricValue::Number(load_int(load)), &ladder)
            .expect("classify")
            .severity
    };
    assert_eq!(classify_load(17.0), Severity::Critical);
    assert_eq!(classify_load(9.0), Severity::Warning);
    assert_eq!(classify_load(8.0), Severity::Ok);
    assert_eq!(classify_load(8.7), Severity::Ok);
}

#[test]
fn lower_is_worse_ladders() {
    let engine = RuleEngine::new(catalog());
    assert_eq!(severity_of(&engine, metric::BATTERY_PCT, 10.0), Severity::Critical);
    assert_eq!(severity_of(&engine, metric::BATTERY_PCT, 20.0), Severity::Warning);
    assert_eq!(severity_of(&engine, metric::BATTERY_PCT, 21.0), Severity::Ok);
    assert_eq!(severity_of(&engine, metric::WIFI_RSSI, -81.0), Severity::Critical);
    assert_eq!(severity_of(&engine, metric::WIFI_RSSI, -80.0), Severity::Warning);
    assert_eq!(severity_of(&engine, metric::WIFI_RSSI, -70.0), Severity::Ok);
}

#[test]
fn custom_thresholds_move_boundaries() {
    let thresholds = ThresholdSet {
        mem_warning: 50.0,
        mem_critical: 60.0,
        ..ThresholdSet::default()
    };
    let engine =
        RuleEngine::new(LadderCatalog::from_thresholds(&thresholds).expect("custom catalog"));
    assert_eq!(severity_of(&engine, metric::MEM_PCT, 55.0), Severity::Warning);
    assert_eq!(severity_of(&engine, metric::MEM_PCT, 60.0), Severity::Critical);
}

#[test]
fn ladder_without_default_is_rejected() {
    let err = ThresholdLadder::numeric("temp_c")
        .rung(Predicate::AtLeast(90.0), Severity::Critical, "hot")
        .build()
        .expect_err("must be exhaustive");
    assert!(matches!(err, ConfigurationError::NonExhaustiveLadder(_)));
}

#[test]
fn text_value_on_numeric_ladder_is_a_configuration_error() {
    let catalog = catalog();
    let ladder = catalog.get(metric::DISK_PCT).expect("disk ladder");
    let mut ctx = RunContext::new();
    let err = classify(&mut ctx, metric::DISK_PCT, &MetricValue::from("full"), ladder)
        .expect_err("kind mismatch");
    assert!(matches!(err, ConfigurationError::ValueKindMismatch { .. }));
    assert!(ctx.findings().is_empty());
}

#[test]
fn absent_reading_is_info_and_uncounted() {
    let catalog = catalog();
    let ladder = catalog.get(metric::SWAP_MB).expect("swap ladder");
    let mut ctx = RunContext::new();
    let finding = classify_reading(&mut ctx, metric::SWAP_MB, None, ladder).expect("classify");
    assert_eq!(finding.severity, Severity::Info);
    assert_eq!(finding.message, "swap_mb unavailable");
    assert_eq!(ctx.issues_found(), 0);
    assert_eq!(ctx.warnings_found(), 0);
}

#[test]
fn counters_and_fixes_follow_findings() {
    let engine = RuleEngine::new(catalog());
    let mut ctx = RunContext::new();
    engine
        .evaluate(&mut ctx, metric::MEM_PCT, Some(&MetricValue::Number(95.0)))
        .expect("mem");
    engine
        .evaluate(&mut ctx, metric::SWAP_MB, Some(&MetricValue::Number(2000.0)))
        .expect("swap");
    engine
        .evaluate(&mut ctx, metric::FIREWALL, Some(&MetricValue::from("Disabled")))
        .expect("firewall");
    engine
        .evaluate(&mut ctx, metric::DISK_PCT, Some(&MetricValue::Number(10.0)))
        .expect("disk");

    assert_eq!(ctx.issues_found(), 1);
    assert_eq!(ctx.warnings_found(), 2);
    // swap has no remediation, disk was fine
    let labels: Vec<&str> = ctx.fixes().list().iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, vec!["Purge inactive memory", "Enable the application firewall"]);
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[test]
fn top_k_is_stable_on_ties() {
    let items = [("A", 10.0), ("B", 30.0), ("C", 30.0), ("D", 5.0)];
    let top: Vec<&str> = top_k(&items, 2, |item| item.1)
        .into_iter()
        .map(|item| item.0)
        .collect();
    assert_eq!(top, vec!["B", "C"]);
}

#[test]
fn helper_aggregation_total_matches_entities_and_is_idempotent() {
    let samples = vec![
        ProcessSample::new(
            "/Applications/Slack.app/Contents/Frameworks/Slack Helper.app/Contents/MacOS/Slack Helper",
            1,
            3.0,
            300_001,
        ),
        ProcessSample::new(
            "/Applications/Figma.app/Contents/Frameworks/Figma Helper (Renderer).app/Contents/MacOS/Figma Helper (Renderer)",
            2,
            7.0,
            123_457,
        ),
        ProcessSample::new(
            "/Applications/Slack.app/Contents/Frameworks/Slack Helper (GPU).app/Contents/MacOS/Slack Helper (GPU)",
            3,
            1.0,
            77_777,
        ),
        ProcessSample::new("/usr/libexec/helperd", 4, 0.0, 999_999),
    ];
    let matcher = BundleMatcher::default();
    let run = || aggregate(&samples, |s| matcher.is_helper(s), |s| matcher.owner(s));

    let first = run().expect("helpers");
    assert_eq!(first, run().expect("helpers"));

    let entity_sum: f64 = first.entities.iter().map(|e| e.total_rss_mb).sum();
    assert!((first.total.total_rss_mb - entity_sum).abs() < 1e-9);
    assert_eq!(first.total.member_count, 3);
    assert_eq!(first.entities[0].group_key, "Slack");
    assert_eq!(first.entities[0].pids(), vec![1, 3]);
}

#[test]
fn no_matching_samples_gives_none() {
    let samples = vec![ProcessSample::new("/usr/bin/vim", 1, 0.0, 1024)];
    let matcher = BundleMatcher::default();
    assert!(aggregate(&samples, |s| matcher.is_helper(s), |s| matcher.owner(s)).is_none());
}

// ---------------------------------------------------------------------------
// Fix registry
// ---------------------------------------------------------------------------

#[test]
fn registry_resolves_selections_in_enqueue_order() {
    let mut fixes = FixRegistry::new();
    fixes.enqueue("a", "cmd-a");
    fixes.enqueue("b", "cmd-b");
    fixes.enqueue("c", "cmd-c");

    let all: Vec<usize> = fixes.resolve(&Selection::All).iter().map(|f| f.index).collect();
    assert_eq!(all, vec![0, 1, 2]);

    let picked: Vec<usize> = fixes
        .resolve(&Selection::parse("5, 1"))
        .iter()
        .map(|f| f.index)
        .collect();
    assert_eq!(picked, vec![1]);

    assert!(fixes.resolve(&Selection::parse("none")).is_empty());
}
