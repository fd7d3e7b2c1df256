use chrono::{DateTime, Utc};

/// Whole days elapsed between `last_activity` and `now`.
///
/// Timestamps in the future count as zero days old.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn days_since(last_activity: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - last_activity).num_days().max(0) as f64
}
