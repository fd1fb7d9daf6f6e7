//! Snapshot catalog
//!
//! Lists the snapshots held in the durable store and fetches them back.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{IronlogError, IronlogResult};
use crate::storage::write_bytes_atomic;

use super::object_store::ObjectStore;

/// A stored snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

/// Read-only view over stored snapshots
pub struct SnapshotCatalog<'a> {
    store: &'a dyn ObjectStore,
}

impl<'a> SnapshotCatalog<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self { store }
    }

    /// Stored snapshots, newest first; folder markers are skipped
    pub fn list(&self) -> IronlogResult<Vec<CatalogEntry>> {
        let mut entries: Vec<CatalogEntry> = self
            .store
            .list()?
            .into_iter()
            .filter(|entry| !entry.is_container())
            .map(|entry| CatalogEntry {
                name: entry.name,
                path: entry.path,
                created_at: entry.created_at,
            })
            .collect();

        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.name.cmp(&a.name))
        });
        debug!(count = entries.len(), "Listed stored backups");
        Ok(entries)
    }

    /// The most recent snapshot, if any
    pub fn latest(&self) -> IronlogResult<Option<CatalogEntry>> {
        Ok(self.list()?.into_iter().next())
    }

    /// Fetch the raw bytes of a stored snapshot
    pub fn download(&self, path: &str) -> IronlogResult<Vec<u8>> {
        self.store.get(path)
    }

    /// Fetch a stored snapshot and save it locally
    ///
    /// When `dest` is an existing directory the file keeps its stored name.
    pub fn download_to(&self, path: &str, dest: &Path) -> IronlogResult<PathBuf> {
        let bytes = self.download(path)?;

        let target = if dest.is_dir() {
            let name = Path::new(path).file_name().ok_or_else(|| {
                IronlogError::Validation(format!("Invalid backup path '{}'", path))
            })?;
            dest.join(name)
        } else {
            dest.to_path_buf()
        };

        write_bytes_atomic(&target, &bytes)?;
        info!(path = %target.display(), size = bytes.len(), "Backup downloaded");
        Ok(target)
    }
}
