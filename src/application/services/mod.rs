pub mod diagnostic;
pub mod history;

pub use diagnostic::{DiagnosticReport, DiagnosticService};
pub use history::{HistoryState, PersistOutcome, SnapshotHistory};
