use serde::{Deserialize, Serialize};

/// Severity of a finding, ordered by urgency (`Critical` highest).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Ok,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Ok => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl Severity {
    /// Whether findings of this severity count against the run.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        matches!(self, Self::Warning | Self::Critical)
    }

    #[must_use]
    pub const fn symbol(&self) -> &str {
        match self {
            Self::Info => "ℹ",
            Self::Ok => "✔",
            Self::Warning => "⚠",
            Self::Critical => "✖",
        }
    }

    #[must_use]
    pub const fn color(&self) -> &str {
        match self {
            Self::Info => "blue",
            Self::Ok => "green",
            Self::Warning => "yellow",
            Self::Critical => "red",
        }
    }
}
