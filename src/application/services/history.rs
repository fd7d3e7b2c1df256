use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::entities::snapshot::Snapshot;
use crate::domain::ports::store::{SnapshotStore, StoreError};

/// Where the rolling snapshot stands within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryState {
    /// No usable prior snapshot (first run, disabled, unreadable or malformed)
    NoHistory,
    HistoryLoaded,
    /// A save was attempted; see [`PersistOutcome`] for whether it landed
    Persisted,
}

/// Result of writing the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum PersistOutcome {
    Saved,
    Failed(String),
    /// History disabled for this run
    Skipped,
}

/// Prior-run snapshot plus the store it came from.
///
/// Both directions fail soft: a broken record reads as no history, and a
/// failed write is reported rather than raised.
pub struct SnapshotHistory<'a> {
    store: Option<&'a dyn SnapshotStore>,
    prior: Option<Snapshot>,
    state: HistoryState,
}

impl<'a> SnapshotHistory<'a> {
    /// Loads the prior snapshot, `store = None` disabling history entirely.
    #[must_use]
    pub fn load(store: Option<&'a dyn SnapshotStore>) -> Self {
        let prior = store.and_then(|s| match s.read_snapshot() {
            Ok(Some(snapshot)) => {
                debug!(timestamp = snapshot.timestamp, "loaded previous snapshot");
                Some(snapshot)
            }
            Ok(None) => {
                debug!("no previous snapshot");
                None
            }
            Err(StoreError::Malformed(reason)) => {
                warn!("Ignoring malformed previous snapshot: {reason}");
                None
            }
            Err(e) => {
                warn!("Failed to read previous snapshot: {e}");
                None
            }
        });
        let state = if prior.is_some() {
            HistoryState::HistoryLoaded
        } else {
            HistoryState::NoHistory
        };
        Self {
            store,
            prior,
            state,
        }
    }

    #[must_use]
    pub const fn prior(&self) -> Option<&Snapshot> {
        self.prior.as_ref()
    }

    #[must_use]
    pub const fn state(&self) -> HistoryState {
        self.state
    }

    /// Overwrites the stored snapshot with `current`.
    pub fn save(&mut self, current: &Snapshot) -> PersistOutcome {
        let Some(store) = self.store else {
            debug!("history disabled, snapshot not saved");
            return PersistOutcome::Skipped;
        };
        self.state = HistoryState::Persisted;
        match store.write_snapshot(current) {
            Ok(()) => {
                info!(timestamp = current.timestamp, "snapshot saved");
                PersistOutcome::Saved
            }
            Err(e) => {
                warn!("Failed to save snapshot: {e}");
                PersistOutcome::Failed(e.to_string())
            }
        }
    }
}
