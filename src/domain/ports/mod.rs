pub mod provider;
pub mod store;

pub use provider::{MetricProvider, ProcessLister, ProviderError};
pub use store::{SnapshotStore, StoreError};
