use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::history::{HistoryState, PersistOutcome, SnapshotHistory};
use crate::domain::aggregation::bundles::BundleMatcher;
use crate::domain::aggregation::interpreters::{is_script_process, script_key};
use crate::domain::aggregation::{aggregate, singleton, top_k};
use crate::domain::entities::finding::Finding;
use crate::domain::entities::fix_action::FixRegistry;
use crate::domain::entities::process::{Aggregation, LogicalEntity, ProcessSample};
use crate::domain::entities::run_context::RunContext;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::ports::provider::{MetricProvider, ProcessLister};
use crate::domain::ports::store::SnapshotStore;
use crate::domain::rules::staleness::days_since;
use crate::domain::rules::{
    classify, classify_reading, drift_report, load_int, measured, metric, ConfigurationError,
    FieldDrift, RuleEngine, PROVIDED_METRICS,
};
use crate::domain::value_objects::metric::{Metric, MetricValue};

/// Everything one run produced, ready for rendering or JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub generated_at: DateTime<Utc>,
    pub findings: Vec<Finding>,
    pub issues_found: u32,
    pub warnings_found: u32,
    pub top_cpu: Vec<LogicalEntity>,
    pub top_memory: Vec<LogicalEntity>,
    /// Helper processes grouped under their application bundle
    pub app_helpers: Option<Aggregation>,
    /// Interpreter processes grouped by the script they run
    pub scripts: Option<Aggregation>,
    pub drift: Vec<FieldDrift>,
    pub fixes: FixRegistry,
    pub history: HistoryState,
    pub persist: PersistOutcome,
    pub snapshot: Snapshot,
}

impl DiagnosticReport {
    /// Process exit status: non-zero only when critical issues were found.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.issues_found > 0 {
            1
        } else {
            0
        }
    }

    /// Drift entries that crossed their significance threshold.
    pub fn significant_drift(&self) -> impl Iterator<Item = &FieldDrift> {
        self.drift.iter().filter(|d| d.significant)
    }
}

/// Orchestrates one diagnostic run: read → classify → aggregate → compare → persist.
pub struct DiagnosticService<'a> {
    provider: &'a dyn MetricProvider,
    lister: &'a dyn ProcessLister,
    store: Option<&'a dyn SnapshotStore>,
    engine: &'a RuleEngine,
    matcher: &'a BundleMatcher,
    top_k: usize,
}

impl<'a> DiagnosticService<'a> {
    #[must_use]
    pub fn new(
        provider: &'a dyn MetricProvider,
        lister: &'a dyn ProcessLister,
        store: Option<&'a dyn SnapshotStore>,
        engine: &'a RuleEngine,
        matcher: &'a BundleMatcher,
        top_k: usize,
    ) -> Self {
        Self {
            provider,
            lister,
            store,
            engine,
            matcher,
            top_k,
        }
    }

    /// Runs a full diagnostic pass stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` only for a broken ladder catalog. Bad
    /// provider values and store failures never surface as errors.
    pub fn run(&self) -> Result<DiagnosticReport, ConfigurationError> {
        self.run_at(Utc::now())
    }

    /// Runs a full diagnostic pass as of `now`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` only for a broken ladder catalog.
    pub fn run_at(&self, now: DateTime<Utc>) -> Result<DiagnosticReport, ConfigurationError> {
        let mut ctx = RunContext::new();
        let mut history = SnapshotHistory::load(self.store);

        let mut readings: BTreeMap<&str, MetricValue> = BTreeMap::new();
        for &name in PROVIDED_METRICS {
            let reading = self.read_metric(name);
            if self.evaluate(&mut ctx, name, reading.as_ref())? {
                if let Some(m) = reading {
                    readings.insert(name, m.value);
                }
            }
        }

        let cpu_load = self.read_number(metric::CPU_LOAD);
        self.classify_cpu(&mut ctx, cpu_load)?;
        self.classify_cloud_sync(&mut ctx, now)?;

        let samples = self.list_processes(&mut ctx);
        let top_cpu = self.top_by(&samples, |s| s.cpu_pct);
        #[allow(clippy::cast_precision_loss)]
        let top_memory = self.top_by(&samples, |s| s.rss_kb as f64);

        let top_cpu_reading = top_cpu
            .first()
            .map(|entity| measured(metric::TOP_CPU_PCT, round1(entity.total_cpu_pct)));
        self.evaluate(&mut ctx, metric::TOP_CPU_PCT, top_cpu_reading.as_ref())?;

        let app_helpers = aggregate(
            &samples,
            |s| self.matcher.is_helper(s),
            |s| self.matcher.owner(s),
        );
        if let Some(helpers) = &app_helpers {
            let total = measured(metric::HELPER_RSS_MB, round1(helpers.total.total_rss_mb));
            self.evaluate(&mut ctx, metric::HELPER_RSS_MB, Some(&total))?;
        } else {
            ctx.note(metric::HELPER_RSS_MB, "No application helper processes detected");
        }
        let scripts = aggregate(&samples, is_script_process, script_key);

        let snapshot = build_snapshot(&ctx, now, &readings, cpu_load, &samples);
        let drift = drift_report(&snapshot, history.prior());
        for entry in drift.iter().filter(|d| d.significant) {
            if let Some(annotation) = entry.delta.annotation() {
                ctx.note(
                    entry.field.key(),
                    format!("{} changed {annotation} since last run", entry.field.label()),
                );
            }
        }

        let persist = history.save(&snapshot);
        let issues_found = ctx.issues_found();
        let warnings_found = ctx.warnings_found();
        let (findings, fixes) = ctx.into_parts();
        info!(
            issues = issues_found,
            warnings = warnings_found,
            fixes = fixes.len(),
            "diagnostic run complete"
        );

        Ok(DiagnosticReport {
            generated_at: now,
            findings,
            issues_found,
            warnings_found,
            top_cpu,
            top_memory,
            app_helpers,
            scripts,
            drift,
            fixes,
            history: history.state(),
            persist,
            snapshot,
        })
    }

    /// Classifies one reading. A value of the wrong kind is bad provider
    /// data: it is logged and recorded as unavailable, and `false` is returned.
    fn evaluate(
        &self,
        ctx: &mut RunContext,
        name: &str,
        reading: Option<&Metric>,
    ) -> Result<bool, ConfigurationError> {
        match self.engine.evaluate_metric(ctx, name, reading) {
            Ok(_) => Ok(true),
            Err(e @ ConfigurationError::ValueKindMismatch { .. }) => {
                warn!("Ignoring reading for {name}: {e}");
                ctx.record(Finding::unavailable(name));
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn read_metric(&self, name: &str) -> Option<Metric> {
        match self.provider.read_metric(name) {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Failed to read {name}: {e}");
                None
            }
        }
    }

    fn read(&self, name: &str) -> Option<MetricValue> {
        match self.provider.read(name) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {name}: {e}");
                None
            }
        }
    }

    fn read_number(&self, name: &str) -> Option<f64> {
        self.read(name).as_ref().and_then(MetricValue::as_number)
    }

    fn classify_cpu(
        &self,
        ctx: &mut RunContext,
        load: Option<f64>,
    ) -> Result<(), ConfigurationError> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cores = self
            .read_number(metric::CPU_CORES)
            .filter(|c| *c >= 1.0)
            .map(|c| c as u32);
        match (load, cores) {
            (Some(load), Some(cores)) => {
                let ladder = self.engine.catalog().cpu_load(cores)?;
                classify(ctx, metric::CPU_LOAD, &MetricValue::Number(load_int(load)), &ladder)?;
            }
            _ => {
                debug!(?load, ?cores, "cpu load or core count missing");
                let ladder = self.engine.catalog().cpu_load(1)?;
                classify_reading(ctx, metric::CPU_LOAD, None, &ladder)?;
            }
        }
        Ok(())
    }

    /// Sync age is measured against `now`; a provider may also hand over the
    /// age directly.
    fn classify_cloud_sync(
        &self,
        ctx: &mut RunContext,
        now: DateTime<Utc>,
    ) -> Result<(), ConfigurationError> {
        let age = match self.read(metric::CLOUD_SYNC_LAST_ACTIVITY) {
            Some(MetricValue::Text(raw)) => match DateTime::parse_from_rfc3339(raw.trim()) {
                Ok(last) => Some(MetricValue::Number(days_since(last.with_timezone(&Utc), now))),
                Err(e) => {
                    warn!("Unparseable cloud sync time {raw:?}: {e}");
                    None
                }
            },
            Some(MetricValue::Number(_)) => {
                warn!("Cloud sync activity time must be an RFC 3339 string");
                None
            }
            None => self.read(metric::CLOUD_SYNC_AGE_DAYS),
        };
        let age = age.map(|value| measured(metric::CLOUD_SYNC_AGE_DAYS, value));
        self.evaluate(ctx, metric::CLOUD_SYNC_AGE_DAYS, age.as_ref())?;
        Ok(())
    }

    fn list_processes(&self, ctx: &mut RunContext) -> Vec<ProcessSample> {
        match self.lister.processes() {
            Ok(mut samples) => {
                // Exclude own process from the rankings
                let own_pid = std::process::id();
                samples.retain(|p| p.pid != own_pid);
                debug!(count = samples.len(), "listed processes");
                samples
            }
            Err(e) => {
                warn!("Failed to list processes: {e}");
                ctx.note(metric::PROCESSES, "Process list unavailable");
                Vec::new()
            }
        }
    }

    fn top_by<F>(&self, samples: &[ProcessSample], key: F) -> Vec<LogicalEntity>
    where
        F: Fn(&ProcessSample) -> f64,
    {
        top_k(samples, self.top_k, key)
            .into_iter()
            .map(singleton)
            .collect()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn build_snapshot(
    ctx: &RunContext,
    now: DateTime<Utc>,
    readings: &BTreeMap<&str, MetricValue>,
    cpu_load: Option<f64>,
    samples: &[ProcessSample],
) -> Snapshot {
    let number = |name: &str| readings.get(name).and_then(MetricValue::as_number);
    let processes = number(metric::PROCESSES)
        .map_or(samples.len() as u64, |n| n.max(0.0) as u64);
    Snapshot {
        timestamp: now.timestamp(),
        issues: ctx.issues_found(),
        warnings: ctx.warnings_found(),
        mem_pct: number(metric::MEM_PCT).unwrap_or(0.0),
        disk_pct: number(metric::DISK_PCT).unwrap_or(0.0),
        swap_mb: number(metric::SWAP_MB).unwrap_or(0.0),
        pageouts: number(metric::PAGEOUTS).unwrap_or(0.0).max(0.0) as u64,
        cpu_load: cpu_load.unwrap_or(0.0),
        processes,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
