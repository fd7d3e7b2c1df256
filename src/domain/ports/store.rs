use thiserror::Error;

use crate::domain::entities::snapshot::Snapshot;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage read failed: {0}")]
    ReadFailed(String),
    #[error("storage write failed: {0}")]
    WriteFailed(String),
    #[error("stored snapshot is malformed: {0}")]
    Malformed(String),
}

/// Persistence for the single previous-run snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Read the stored snapshot, `None` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the record exists but cannot be read or parsed.
    fn read_snapshot(&self) -> Result<Option<Snapshot>, StoreError>;

    /// Replace the stored snapshot as a whole.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails; the previous record is then
    /// left untouched.
    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}
