pub mod catalog;
pub mod drift;
pub mod ladder;
pub mod staleness;

use tracing::debug;

use crate::domain::entities::finding::Finding;
use crate::domain::entities::run_context::RunContext;
use crate::domain::value_objects::metric::{Metric, MetricValue};

pub use catalog::{load_int, measured, metric, LadderCatalog, PROVIDED_METRICS};
pub use drift::{compute_drift, drift_report, Delta, Direction, FieldDrift};
pub use ladder::{ConfigurationError, Predicate, Remediation, Rung, ThresholdLadder};

/// Classifies `value` with `ladder` and records the result in `ctx`.
///
/// Exactly one finding is produced. Critical and Warning findings bump the
/// run counters and, when the ladder carries a remediation, queue a fix.
///
/// # Errors
///
/// Returns `ConfigurationError` if `value` is not of the ladder's kind.
pub fn classify(
    ctx: &mut RunContext,
    metric_name: &str,
    value: &MetricValue,
    ladder: &ThresholdLadder,
) -> Result<Finding, ConfigurationError> {
    classify_with_unit(ctx, metric_name, value, None, ladder)
}

/// Like [`classify`], rendering the metric's unit into the message.
///
/// # Errors
///
/// Returns `ConfigurationError` if the metric value is not of the ladder's kind.
pub fn classify_metric(
    ctx: &mut RunContext,
    metric: &Metric,
    ladder: &ThresholdLadder,
) -> Result<Finding, ConfigurationError> {
    classify_with_unit(ctx, &metric.name, &metric.value, metric.unit.as_deref(), ladder)
}

fn classify_with_unit(
    ctx: &mut RunContext,
    metric_name: &str,
    value: &MetricValue,
    unit: Option<&str>,
    ladder: &ThresholdLadder,
) -> Result<Finding, ConfigurationError> {
    let rung = ladder.select(value)?;
    let finding = Finding::new(rung.severity, metric_name, rung.render(value, unit));
    debug!(metric = metric_name, %value, severity = %finding.severity, "classified");

    if finding.severity.is_actionable() {
        if let Some(remediation) = ladder.remediation() {
            let index = ctx.enqueue_fix(remediation.label.clone(), remediation.command.clone());
            debug!(metric = metric_name, index, "queued fix");
        }
    }
    ctx.record(finding.clone());
    Ok(finding)
}

/// Classifies a provider reading; a missing reading becomes an Info finding.
///
/// # Errors
///
/// Returns `ConfigurationError` if a present value is not of the ladder's kind.
pub fn classify_reading(
    ctx: &mut RunContext,
    metric_name: &str,
    reading: Option<&MetricValue>,
    ladder: &ThresholdLadder,
) -> Result<Finding, ConfigurationError> {
    match reading {
        Some(value) => classify(ctx, metric_name, value, ladder),
        None => {
            let finding = Finding::unavailable(metric_name);
            ctx.record(finding.clone());
            Ok(finding)
        }
    }
}

/// Classifies metrics by name against a [`LadderCatalog`].
pub struct RuleEngine {
    catalog: LadderCatalog,
}

impl RuleEngine {
    #[must_use]
    pub const fn new(catalog: LadderCatalog) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub const fn catalog(&self) -> &LadderCatalog {
        &self.catalog
    }

    /// Classifies a bare reading for a metric registered in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::UnknownMetric` for metrics without a
    /// ladder, or a kind mismatch from the ladder itself.
    pub fn evaluate(
        &self,
        ctx: &mut RunContext,
        metric_name: &str,
        reading: Option<&MetricValue>,
    ) -> Result<Finding, ConfigurationError> {
        classify_reading(ctx, metric_name, reading, self.ladder(metric_name)?)
    }

    /// Classifies a provider [`Metric`], rendering its unit. An absent
    /// metric becomes an Info finding.
    ///
    /// # Errors
    ///
    /// Same as [`RuleEngine::evaluate`].
    pub fn evaluate_metric(
        &self,
        ctx: &mut RunContext,
        metric_name: &str,
        reading: Option<&Metric>,
    ) -> Result<Finding, ConfigurationError> {
        let ladder = self.ladder(metric_name)?;
        match reading {
            Some(metric) => classify_metric(ctx, metric, ladder),
            None => classify_reading(ctx, metric_name, None, ladder),
        }
    }

    fn ladder(&self, metric_name: &str) -> Result<&ThresholdLadder, ConfigurationError> {
        self.catalog
            .get(metric_name)
            .ok_or_else(|| ConfigurationError::UnknownMetric(metric_name.to_string()))
    }
}
