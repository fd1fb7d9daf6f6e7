//! Snapshot sink
//!
//! Writes a built snapshot to the durable store. When the store refuses the
//! write under its access policy the snapshot is handed back so the caller
//! can save it locally instead.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::IronlogResult;
use crate::storage::write_bytes_atomic;

use super::object_store::ObjectStore;
use super::snapshot::Snapshot;

/// Where a persisted snapshot ended up
#[derive(Debug)]
pub enum PersistOutcome {
    /// Written to the durable store under `path`
    Stored { path: String },
    /// The store refused the write; save the snapshot somewhere else
    LocalFallback {
        snapshot: Snapshot,
        suggested_file_name: String,
    },
}

/// Persists snapshots to an object store
pub struct SnapshotSink<'a> {
    store: &'a dyn ObjectStore,
    pretty: bool,
}

impl<'a> SnapshotSink<'a> {
    /// Create a sink writing pretty-printed JSON to `store`
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self {
            store,
            pretty: true,
        }
    }

    /// Toggle pretty-printing
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Write the snapshot once; no retries
    ///
    /// Authorization failures become [`PersistOutcome::LocalFallback`]; any
    /// other failure is returned as an error.
    pub fn persist(&self, snapshot: Snapshot) -> IronlogResult<PersistOutcome> {
        let file_name = snapshot.file_name();
        let bytes = snapshot.to_json(self.pretty)?;

        match self.store.put(&file_name, &bytes) {
            Ok(path) => {
                info!(path = %path, size = bytes.len(), "Backup stored");
                Ok(PersistOutcome::Stored { path })
            }
            Err(err) if err.is_unauthorized() => {
                warn!(error = %err, "Backup store refused write, falling back to local file");
                Ok(PersistOutcome::LocalFallback {
                    snapshot,
                    suggested_file_name: file_name,
                })
            }
            Err(err) => Err(err),
        }
    }
}

impl PersistOutcome {
    /// Save a fallback snapshot into `dir` under its suggested name
    ///
    /// Returns `None` for snapshots that were already stored.
    pub fn save_fallback(&self, dir: &Path, pretty: bool) -> IronlogResult<Option<PathBuf>> {
        match self {
            Self::Stored { .. } => Ok(None),
            Self::LocalFallback {
                snapshot,
                suggested_file_name,
            } => {
                let target = dir.join(suggested_file_name);
                write_bytes_atomic(&target, &snapshot.to_json(pretty)?)?;
                info!(path = %target.display(), "Backup saved locally");
                Ok(Some(target))
            }
        }
    }
}
