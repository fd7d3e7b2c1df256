use serde::{Deserialize, Serialize};

const KB_PER_MB: f64 = 1024.0;

/// One raw process record as reported by the process lister.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSample {
    /// Full command or executable path
    pub identity: String,
    pub pid: u32,
    pub cpu_pct: f64,
    pub rss_kb: u64,
}

impl ProcessSample {
    #[must_use]
    pub fn new(identity: impl Into<String>, pid: u32, cpu_pct: f64, rss_kb: u64) -> Self {
        Self {
            identity: identity.into(),
            pid,
            cpu_pct,
            rss_kb,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rss_mb(&self) -> f64 {
        self.rss_kb as f64 / KB_PER_MB
    }

    /// Last path component of the executable, without arguments.
    #[must_use]
    pub fn executable_name(&self) -> &str {
        let exec = self.identity.split_whitespace().next().unwrap_or("");
        exec.rsplit('/').next().unwrap_or(exec)
    }
}

/// Processes grouped under one inferred owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalEntity {
    pub group_key: String,
    /// Members in the order they appeared in the input
    pub members: Vec<ProcessSample>,
    pub total_cpu_pct: f64,
    pub total_rss_mb: f64,
    pub member_count: usize,
}

impl LogicalEntity {
    /// Builds an entity from its members, computing the totals.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_members(group_key: impl Into<String>, members: Vec<ProcessSample>) -> Self {
        let total_cpu_pct = members.iter().map(|m| m.cpu_pct).sum();
        // Summing in KB keeps the MB total exact, since KB / 1024 is a power-of-two scale
        let total_rss_kb: u64 = members.iter().map(|m| m.rss_kb).sum();
        Self {
            group_key: group_key.into(),
            member_count: members.len(),
            members,
            total_cpu_pct,
            total_rss_mb: total_rss_kb as f64 / KB_PER_MB,
        }
    }

    #[must_use]
    pub fn pids(&self) -> Vec<u32> {
        self.members.iter().map(|m| m.pid).collect()
    }
}

/// Output of one aggregation call: ranked entities plus the synthetic total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub entities: Vec<LogicalEntity>,
    pub total: LogicalEntity,
}
