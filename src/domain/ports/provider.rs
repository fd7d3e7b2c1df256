use thiserror::Error;

use crate::domain::entities::process::ProcessSample;
use crate::domain::rules::measured;
use crate::domain::value_objects::metric::{Metric, MetricValue};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("metric unavailable: {0}")]
    Unavailable(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("timeout while reading {0}")]
    Timeout(String),
}

/// Source of named metric values for one sampling pass.
///
/// Implementations do their own OS calls and parsing; callers only ever see
/// parsed values.
pub trait MetricProvider: Send + Sync {
    /// Read one metric.
    ///
    /// `Ok(None)` means the metric does not exist on this host (no battery,
    /// no Wi-Fi); that is a normal outcome.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the value exists but could not be obtained.
    fn read(&self, metric: &str) -> Result<Option<MetricValue>, ProviderError>;

    /// Read one metric together with its display unit.
    ///
    /// # Errors
    ///
    /// Same as [`MetricProvider::read`].
    fn read_metric(&self, metric: &str) -> Result<Option<Metric>, ProviderError> {
        Ok(self.read(metric)?.map(|value| measured(metric, value)))
    }
}

/// Source of the raw process list for one sampling pass.
pub trait ProcessLister: Send + Sync {
    /// List running processes.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the process table cannot be read.
    fn processes(&self) -> Result<Vec<ProcessSample>, ProviderError>;
}
