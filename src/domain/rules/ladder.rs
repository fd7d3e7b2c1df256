use thiserror::Error;

use crate::domain::value_objects::metric::{MetricValue, ValueKind};
use crate::domain::value_objects::severity::Severity;

/// Defects in ladder definitions or in how a ladder is used.
///
/// These only arise from bad configuration, never from runtime data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("ladder for {0} has no rungs")]
    EmptyLadder(String),
    #[error("ladder for {0} is not exhaustive: last rung must be unconditional")]
    NonExhaustiveLadder(String),
    #[error("ladder for {metric}: rung {index} is unreachable after an unconditional rung")]
    UnreachableRung { metric: String, index: usize },
    #[error("ladder for {metric} is {expected} but rung {index} tests a {found} value")]
    KindMismatch {
        metric: String,
        index: usize,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("no ladder registered for metric {0}")]
    UnknownMetric(String),
    #[error("ladder for {metric} expects a {expected} value, got {found}")]
    ValueKindMismatch {
        metric: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// Condition tested by one rung of a ladder.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `value >= x`
    AtLeast(f64),
    /// `value > x`
    Above(f64),
    /// `value <= x`
    AtMost(f64),
    /// `value < x`
    Below(f64),
    /// Case-insensitive text equality
    Equals(String),
    /// Case-insensitive substring match
    Contains(String),
    /// Case-insensitive equality with any of the listed values
    OneOf(Vec<String>),
    Always,
}

impl Predicate {
    /// Kind of value the predicate inspects; `None` for [`Predicate::Always`].
    #[must_use]
    pub const fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::AtLeast(_) | Self::Above(_) | Self::AtMost(_) | Self::Below(_) => {
                Some(ValueKind::Numeric)
            }
            Self::Equals(_) | Self::Contains(_) | Self::OneOf(_) => Some(ValueKind::Text),
            Self::Always => None,
        }
    }

    #[must_use]
    pub fn matches(&self, value: &MetricValue) -> bool {
        match (self, value) {
            (Self::Always, _) => true,
            (Self::AtLeast(x), MetricValue::Number(v)) => v >= x,
            (Self::Above(x), MetricValue::Number(v)) => v > x,
            (Self::AtMost(x), MetricValue::Number(v)) => v <= x,
            (Self::Below(x), MetricValue::Number(v)) => v < x,
            (Self::Equals(s), MetricValue::Text(v)) => v.trim().eq_ignore_ascii_case(s),
            (Self::Contains(s), MetricValue::Text(v)) => {
                v.to_lowercase().contains(&s.to_lowercase())
            }
            (Self::OneOf(options), MetricValue::Text(v)) => {
                options.iter().any(|s| v.trim().eq_ignore_ascii_case(s))
            }
            _ => false,
        }
    }
}

/// One step of a ladder: if the predicate holds, the value gets this severity.
#[derive(Debug, Clone, PartialEq)]
pub struct Rung {
    pub predicate: Predicate,
    pub severity: Severity,
    /// Message with `{value}` and `{unit}` placeholders
    pub template: String,
}

impl Rung {
    #[must_use]
    pub fn render(&self, value: &MetricValue, unit: Option<&str>) -> String {
        self.template
            .replace("{value}", &value.to_string())
            .replace("{unit}", unit.unwrap_or(""))
    }
}

/// Remediation queued when a ladder classifies a value as Warning or Critical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remediation {
    pub label: String,
    pub command: String,
}

/// Ordered, exhaustive classification table for one metric kind.
///
/// Rungs are evaluated top-down and the first match wins. The last rung is
/// always unconditional, so evaluation never falls through.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdLadder {
    metric: String,
    kind: ValueKind,
    rungs: Vec<Rung>,
    remediation: Option<Remediation>,
}

impl ThresholdLadder {
    #[must_use]
    pub fn numeric(metric: impl Into<String>) -> LadderBuilder {
        LadderBuilder::new(metric.into(), ValueKind::Numeric)
    }

    #[must_use]
    pub fn text(metric: impl Into<String>) -> LadderBuilder {
        LadderBuilder::new(metric.into(), ValueKind::Text)
    }

    #[must_use]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    #[must_use]
    pub fn rungs(&self) -> &[Rung] {
        &self.rungs
    }

    #[must_use]
    pub const fn remediation(&self) -> Option<&Remediation> {
        self.remediation.as_ref()
    }

    /// Returns the first rung matching `value`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::ValueKindMismatch` when `value` is not of
    /// the kind this ladder was built for.
    pub fn select(&self, value: &MetricValue) -> Result<&Rung, ConfigurationError> {
        if value.kind() != self.kind {
            return Err(ConfigurationError::ValueKindMismatch {
                metric: self.metric.clone(),
                expected: self.kind,
                found: value.kind(),
            });
        }
        self.rungs
            .iter()
            .find(|rung| rung.predicate.matches(value))
            // build() guarantees an unconditional last rung
            .ok_or_else(|| ConfigurationError::NonExhaustiveLadder(self.metric.clone()))
    }
}

/// Incremental constructor for [`ThresholdLadder`]; validation happens in [`LadderBuilder::build`].
#[derive(Debug)]
pub struct LadderBuilder {
    metric: String,
    kind: ValueKind,
    rungs: Vec<Rung>,
    remediation: Option<Remediation>,
}

impl LadderBuilder {
    const fn new(metric: String, kind: ValueKind) -> Self {
        Self {
            metric,
            kind,
            rungs: Vec::new(),
            remediation: None,
        }
    }

    #[must_use]
    pub fn rung(mut self, predicate: Predicate, severity: Severity, template: &str) -> Self {
        self.rungs.push(Rung {
            predicate,
            severity,
            template: template.to_string(),
        });
        self
    }

    /// Adds the unconditional default rung.
    #[must_use]
    pub fn otherwise(self, severity: Severity, template: &str) -> Self {
        self.rung(Predicate::Always, severity, template)
    }

    #[must_use]
    pub fn remediation(mut self, label: &str, command: &str) -> Self {
        self.remediation = Some(Remediation {
            label: label.to_string(),
            command: command.to_string(),
        });
        self
    }

    /// Validates and freezes the ladder.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` when the ladder is empty, lacks an
    /// unconditional last rung, has rungs after an unconditional one, or mixes
    /// numeric and text predicates.
    pub fn build(self) -> Result<ThresholdLadder, ConfigurationError> {
        let Some(last) = self.rungs.last() else {
            return Err(ConfigurationError::EmptyLadder(self.metric));
        };
        if last.predicate != Predicate::Always {
            return Err(ConfigurationError::NonExhaustiveLadder(self.metric));
        }
        let last_index = self.rungs.len() - 1;
        for (index, rung) in self.rungs.iter().enumerate() {
            match rung.predicate.kind() {
                None if index != last_index => {
                    return Err(ConfigurationError::UnreachableRung {
                        metric: self.metric,
                        index: index + 1,
                    });
                }
                Some(found) if found != self.kind => {
                    return Err(ConfigurationError::KindMismatch {
                        metric: self.metric,
                        index,
                        expected: self.kind,
                        found,
                    });
                }
                _ => {}
            }
        }
        Ok(ThresholdLadder {
            metric: self.metric,
            kind: self.kind,
            rungs: self.rungs,
            remediation: self.remediation,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn two_step() -> ThresholdLadder {
        ThresholdLadder::numeric("load")
            .rung(Predicate::AtLeast(10.0), Severity::Critical, "load {value}{unit} critical")
            .rung(Predicate::AtLeast(5.0), Severity::Warning, "load {value}{unit} high")
            .otherwise(Severity::Ok, "load {value}{unit} ok")
            .build()
            .expect("valid ladder")
    }

    #[test]
    fn first_matching_rung_wins() {
        let ladder = two_step();
        let rung = ladder.select(&MetricValue::Number(12.0)).expect("select");
        assert_eq!(rung.severity, Severity::Critical);
        let rung = ladder.select(&MetricValue::Number(5.0)).expect("select");
        assert_eq!(rung.severity, Severity::Warning);
        let rung = ladder.select(&MetricValue::Number(4.99)).expect("select");
        assert_eq!(rung.severity, Severity::Ok);
    }

    #[test]
    fn nan_falls_through_to_default() {
        let ladder = two_step();
        let rung = ladder.select(&MetricValue::Number(f64::NAN)).expect("select");
        assert_eq!(rung.severity, Severity::Ok);
    }

    #[test]
    fn render_substitutes_placeholders() {
        let ladder = two_step();
        let rung = ladder.select(&MetricValue::Number(7.0)).expect("select");
        assert_eq!(rung.render(&MetricValue::Number(7.0), Some("%")), "load 7% high");
        assert_eq!(rung.render(&MetricValue::Number(7.0), None), "load 7 high");
    }

    #[test]
    fn text_input_on_numeric_ladder_is_configuration_error() {
        let err = two_step()
            .select(&MetricValue::from("high"))
            .expect_err("kind mismatch");
        assert!(matches!(err, ConfigurationError::ValueKindMismatch { .. }));
    }

    #[test]
    fn empty_ladder_is_rejected() {
        let err = ThresholdLadder::numeric("x").build().expect_err("empty");
        assert_eq!(err, ConfigurationError::EmptyLadder("x".into()));
    }

    #[test]
    fn ladder_without_default_is_rejected() {
        let err = ThresholdLadder::numeric("x")
            .rung(Predicate::Above(1.0), Severity::Warning, "w")
            .build()
            .expect_err("non-exhaustive");
        assert_eq!(err, ConfigurationError::NonExhaustiveLadder("x".into()));
    }

    #[test]
    fn rungs_after_default_are_rejected() {
        let err = ThresholdLadder::numeric("x")
            .otherwise(Severity::Ok, "ok")
            .otherwise(Severity::Ok, "again")
            .build()
            .expect_err("unreachable");
        assert!(matches!(err, ConfigurationError::UnreachableRung { index: 1, .. }));
    }

    #[test]
    fn mixed_predicate_kinds_are_rejected() {
        let err = ThresholdLadder::numeric("x")
            .rung(Predicate::Equals("off".into()), Severity::Warning, "w")
            .otherwise(Severity::Ok, "ok")
            .build()
            .expect_err("kind mismatch");
        assert!(matches!(err, ConfigurationError::KindMismatch { index: 0, .. }));
    }

    #[test]
    fn text_predicates_ignore_case() {
        let ladder = ThresholdLadder::text("firewall")
            .rung(Predicate::Equals("disabled".into()), Severity::Warning, "off")
            .rung(Predicate::Contains("block".into()), Severity::Ok, "strict")
            .otherwise(Severity::Ok, "on")
            .build()
            .expect("valid");
        let rung = ladder.select(&MetricValue::from(" Disabled ")).expect("select");
        assert_eq!(rung.severity, Severity::Warning);
        let rung = ladder.select(&MetricValue::from("Block all")).expect("select");
        assert_eq!(rung.template, "strict");
    }

    #[test]
    fn one_of_matches_any_listed_value() {
        let predicate = Predicate::OneOf(vec!["disabled".into(), "off".into()]);
        assert_eq!(predicate.kind(), Some(ValueKind::Text));
        assert!(predicate.matches(&MetricValue::from("OFF")));
        assert!(predicate.matches(&MetricValue::from("disabled\n")));
        assert!(!predicate.matches(&MetricValue::from("offline")));
        assert!(!predicate.matches(&MetricValue::Number(0.0)));
        assert!(!Predicate::OneOf(Vec::new()).matches(&MetricValue::from("off")));
    }

    #[test]
    fn configuration_error_display() {
        let err = ConfigurationError::NonExhaustiveLadder("mem_pct".into());
        assert_eq!(
            err.to_string(),
            "ladder for mem_pct is not exhaustive: last rung must be unconditional"
        );
    }
}
