use serde::{Deserialize, Serialize};

use crate::domain::entities::snapshot::{Snapshot, SnapshotField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    None,
}

/// Change of one field relative to the previous run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub direction: Direction,
    /// Absolute size of the change; zero when there is no baseline
    pub magnitude: f64,
}

impl Delta {
    pub const NONE: Self = Self {
        direction: Direction::None,
        magnitude: 0.0,
    };

    /// Signed change, `None` when there is nothing to show.
    #[must_use]
    pub fn signed(&self) -> Option<f64> {
        match self.direction {
            Direction::Up => Some(self.magnitude),
            Direction::Down => Some(-self.magnitude),
            Direction::None => None,
        }
    }

    /// Short annotation such as `+30` or `-4.5`.
    #[must_use]
    pub fn annotation(&self) -> Option<String> {
        let signed = self.signed()?;
        if signed.fract() == 0.0 {
            Some(format!("{signed:+.0}"))
        } else {
            Some(format!("{signed:+.1}"))
        }
    }
}

/// Compares a current value against the prior run.
///
/// A missing prior, or a prior of exactly zero, means there is no baseline
/// and the result is [`Delta::NONE`].
#[must_use]
pub fn compute_drift(current: f64, prior: Option<f64>) -> Delta {
    let Some(prior) = prior else {
        return Delta::NONE;
    };
    if prior == 0.0 {
        return Delta::NONE;
    }
    let diff = current - prior;
    let direction = if diff > 0.0 {
        Direction::Up
    } else if diff < 0.0 {
        Direction::Down
    } else {
        Direction::None
    };
    Delta {
        direction,
        magnitude: diff.abs(),
    }
}

/// Drift of one snapshot field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDrift {
    pub field: SnapshotField,
    pub current: f64,
    pub prior: Option<f64>,
    pub delta: Delta,
    /// Whether the change reaches the field's significance threshold
    pub significant: bool,
}

/// Drift for every tracked field; empty when there is no prior snapshot.
#[must_use]
pub fn drift_report(current: &Snapshot, prior: Option<&Snapshot>) -> Vec<FieldDrift> {
    let Some(prior) = prior else {
        return Vec::new();
    };
    SnapshotField::ALL
        .iter()
        .map(|&field| {
            let now = current.value(field);
            let before = prior.value(field);
            let delta = compute_drift(now, Some(before));
            FieldDrift {
                field,
                current: now,
                prior: Some(before),
                delta,
                significant: delta.direction != Direction::None
                    && delta.magnitude >= field.significance(),
            }
        })
        .collect()
}
