pub mod finding;
pub mod fix_action;
pub mod process;
pub mod run_context;
pub mod snapshot;

pub use finding::Finding;
pub use fix_action::{FixAction, FixRegistry, Selection};
pub use process::{Aggregation, LogicalEntity, ProcessSample};
pub use run_context::RunContext;
pub use snapshot::{Snapshot, SnapshotField};
