use std::sync::Mutex;

use crate::domain::entities::snapshot::Snapshot;
use crate::domain::ports::store::{SnapshotStore, StoreError};

/// In-memory store for testing purposes.
pub struct InMemorySnapshotStore {
    snapshot: Mutex<Option<Snapshot>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl InMemorySnapshotStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            snapshot: Mutex::new(None),
            fail_reads: false,
            fail_writes: false,
        }
    }

    #[must_use]
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            fail_reads: false,
            fail_writes: false,
        }
    }

    /// Store whose reads report a malformed record.
    #[must_use]
    pub const fn unreadable() -> Self {
        Self {
            snapshot: Mutex::new(None),
            fail_reads: true,
            fail_writes: false,
        }
    }

    /// Store whose writes always fail.
    #[must_use]
    pub fn read_only(snapshot: Option<Snapshot>) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            fail_reads: false,
            fail_writes: true,
        }
    }

    /// Current content, bypassing the failure switches.
    #[must_use]
    pub fn current(&self) -> Option<Snapshot> {
        self.snapshot.lock().ok().and_then(|s| s.clone())
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn read_snapshot(&self) -> Result<Option<Snapshot>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Malformed("unreadable test store".into()));
        }
        Ok(self
            .snapshot
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?
            .clone())
    }

    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed("read-only test store".into()));
        }
        *self
            .snapshot
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))? = Some(snapshot.clone());
        Ok(())
    }
}
