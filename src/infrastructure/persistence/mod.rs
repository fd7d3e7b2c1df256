pub mod file_store;
pub mod in_memory_store;

pub use file_store::FileSnapshotStore;
pub use in_memory_store::InMemorySnapshotStore;
