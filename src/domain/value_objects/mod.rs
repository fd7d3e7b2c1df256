pub mod metric;
pub mod severity;
pub mod thresholds;

pub use metric::{Metric, MetricValue, ValueKind};
pub use severity::Severity;
pub use thresholds::ThresholdSet;
