use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::entities::snapshot::Snapshot;
use crate::domain::ports::store::{SnapshotStore, StoreError};

/// Keeps the previous-run snapshot as a flat TOML file (`key = value` lines).
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a concurrent reader sees either the old record or the
/// new one, never a mix.
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Builds a store from a configured path, expanding a leading `~`.
    #[must_use]
    pub fn from_config_path(raw: &str) -> Self {
        Self::new(shellexpand::tilde(raw).into_owned())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn read_snapshot(&self) -> Result<Option<Snapshot>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored snapshot");
                return Ok(None);
            }
            Err(e) => {
                return Err(StoreError::ReadFailed(format!(
                    "{}: {e}",
                    self.path.display()
                )))
            }
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }

    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let write_err = |e: &dyn std::fmt::Display| {
            StoreError::WriteFailed(format!("{}: {e}", self.path.display()))
        };
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| write_err(&e))?;

        let content = toml::to_string(snapshot).map_err(|e| write_err(&e))?;
        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| write_err(&e))?;
        tmp.write_all(content.as_bytes()).map_err(|e| write_err(&e))?;
        tmp.as_file().sync_all().map_err(|e| write_err(&e))?;
        tmp.persist(&self.path).map_err(|e| write_err(&e.error))?;

        debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}
