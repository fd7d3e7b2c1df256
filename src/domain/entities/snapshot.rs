use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of one run, persisted so the next run can report drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Unix timestamp (seconds) of the run
    pub timestamp: i64,
    pub issues: u32,
    pub warnings: u32,
    pub mem_pct: f64,
    pub disk_pct: f64,
    pub swap_mb: f64,
    pub pageouts: u64,
    pub cpu_load: f64,
    pub processes: u64,
}

impl Snapshot {
    /// Snapshot with every numeric field at zero, stamped with `at`.
    #[must_use]
    pub fn empty(at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at.timestamp(),
            issues: 0,
            warnings: 0,
            mem_pct: 0.0,
            disk_pct: 0.0,
            swap_mb: 0.0,
            pageouts: 0,
            cpu_load: 0.0,
            processes: 0,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self, field: SnapshotField) -> f64 {
        match field {
            SnapshotField::Issues => f64::from(self.issues),
            SnapshotField::Warnings => f64::from(self.warnings),
            SnapshotField::MemPct => self.mem_pct,
            SnapshotField::DiskPct => self.disk_pct,
            SnapshotField::SwapMb => self.swap_mb,
            SnapshotField::Pageouts => self.pageouts as f64,
            SnapshotField::CpuLoad => self.cpu_load,
            SnapshotField::Processes => self.processes as f64,
        }
    }
}

/// The drift-tracked fields of a [`Snapshot`] (everything but the timestamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotField {
    Issues,
    Warnings,
    MemPct,
    DiskPct,
    SwapMb,
    Pageouts,
    CpuLoad,
    Processes,
}

impl SnapshotField {
    pub const ALL: [Self; 8] = [
        Self::Issues,
        Self::Warnings,
        Self::MemPct,
        Self::DiskPct,
        Self::SwapMb,
        Self::Pageouts,
        Self::CpuLoad,
        Self::Processes,
    ];

    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Issues => "issues",
            Self::Warnings => "warnings",
            Self::MemPct => "mem_pct",
            Self::DiskPct => "disk_pct",
            Self::SwapMb => "swap_mb",
            Self::Pageouts => "pageouts",
            Self::CpuLoad => "cpu_load",
            Self::Processes => "processes",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Issues => "Issues",
            Self::Warnings => "Warnings",
            Self::MemPct => "Memory usage",
            Self::DiskPct => "Disk usage",
            Self::SwapMb => "Swap used",
            Self::Pageouts => "Pageouts",
            Self::CpuLoad => "CPU load",
            Self::Processes => "Process count",
        }
    }

    /// Smallest absolute change worth reporting for this field.
    #[must_use]
    pub const fn significance(&self) -> f64 {
        match self {
            Self::Issues | Self::Warnings => 1.0,
            Self::MemPct => 10.0,
            Self::DiskPct => 5.0,
            Self::SwapMb => 512.0,
            Self::Pageouts => 10_000.0,
            Self::CpuLoad => 2.0,
            Self::Processes => 50.0,
        }
    }
}

impl std::fmt::Display for SnapshotField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
