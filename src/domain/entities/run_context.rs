use super::finding::Finding;
use super::fix_action::FixRegistry;
use crate::domain::value_objects::severity::Severity;

/// Mutable state of a single diagnostic run.
///
/// Created at run start, threaded by `&mut` through the engine and discarded
/// once the report is built.
#[derive(Debug, Default)]
pub struct RunContext {
    findings: Vec<Finding>,
    issues_found: u32,
    warnings_found: u32,
    fixes: FixRegistry,
}

impl RunContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding and bumps the matching counter.
    pub fn record(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Critical => self.issues_found += 1,
            Severity::Warning => self.warnings_found += 1,
            Severity::Ok | Severity::Info => {}
        }
        self.findings.push(finding);
    }

    /// Records a finding that must not affect the counters.
    pub fn note(&mut self, metric: &str, message: impl Into<String>) {
        self.findings
            .push(Finding::new(Severity::Info, metric, message));
    }

    pub fn enqueue_fix(&mut self, label: impl Into<String>, command: impl Into<String>) -> usize {
        self.fixes.enqueue(label, command)
    }

    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    #[must_use]
    pub const fn issues_found(&self) -> u32 {
        self.issues_found
    }

    #[must_use]
    pub const fn warnings_found(&self) -> u32 {
        self.warnings_found
    }

    #[must_use]
    pub const fn fixes(&self) -> &FixRegistry {
        &self.fixes
    }

    /// Consumes the context, handing back its findings and fixes.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Finding>, FixRegistry) {
        (self.findings, self.fixes)
    }
}
