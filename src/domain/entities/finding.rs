use serde::{Deserialize, Serialize};

use crate::domain::value_objects::severity::Severity;

/// A classified observation derived from one metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    pub metric: String,
}

impl Finding {
    #[must_use]
    pub fn new(severity: Severity, metric: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            metric: metric.into(),
        }
    }

    /// Finding for a metric the provider could not supply.
    #[must_use]
    pub fn unavailable(metric: &str) -> Self {
        Self::new(Severity::Info, metric, format!("{metric} unavailable"))
    }
}
