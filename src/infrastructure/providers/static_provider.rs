use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::entities::process::ProcessSample;
use crate::domain::ports::provider::{MetricProvider, ProcessLister, ProviderError};
use crate::domain::value_objects::metric::MetricValue;

/// Provider serving fixed values, loaded from a JSON fixture or built in code.
///
/// Useful for tests and for replaying a captured host state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticProvider {
    #[serde(default)]
    metrics: BTreeMap<String, MetricValue>,
    /// Metrics that fail with `ProviderError::Unavailable` when read
    #[serde(default)]
    failing: BTreeSet<String>,
    #[serde(default)]
    processes: Vec<ProcessSample>,
}

impl StaticProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<MetricValue>) -> Self {
        self.metrics.insert(name.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    #[must_use]
    pub fn with_processes(mut self, processes: Vec<ProcessSample>) -> Self {
        self.processes = processes;
        self
    }

    /// Loads a fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid fixture JSON.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        serde_json::from_str(&content).context("Failed to parse fixture")
    }
}

impl MetricProvider for StaticProvider {
    fn read(&self, metric: &str) -> Result<Option<MetricValue>, ProviderError> {
        if self.failing.contains(metric) {
            return Err(ProviderError::Unavailable(metric.to_string()));
        }
        Ok(self.metrics.get(metric).cloned())
    }
}

impl ProcessLister for StaticProvider {
    fn processes(&self) -> Result<Vec<ProcessSample>, ProviderError> {
        Ok(self.processes.clone())
    }
}
