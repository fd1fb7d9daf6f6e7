//! Durable object storage for snapshot files
//!
//! The backup engine only needs three operations from the place backups
//! live: put a named blob, list what is there, and fetch one back. Each can
//! fail with [`IronlogError::Unauthorized`] when the access policy forbids
//! it, which callers treat differently from other failures.

use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{IronlogError, IronlogResult};
use crate::storage::write_bytes_atomic;

/// One listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Object identifier; `None` marks a folder rather than a file
    pub id: Option<String>,
    pub name: String,
    /// Path to pass back to [`ObjectStore::get`]
    pub path: String,
    pub created_at: DateTime<Utc>,
}

impl ObjectEntry {
    /// True for folder markers
    pub fn is_container(&self) -> bool {
        self.id.is_none()
    }
}

/// A place backup files are kept
pub trait ObjectStore {
    /// Store `bytes` under `name`, returning the path the store assigned
    fn put(&self, name: &str, bytes: &[u8]) -> IronlogResult<String>;

    /// List the top-level entries
    fn list(&self) -> IronlogResult<Vec<ObjectEntry>>;

    /// Fetch an object by path
    fn get(&self, path: &str) -> IronlogResult<Vec<u8>>;
}

/// Directory-backed object store
///
/// Sub-directories show up as folder markers. A read-only store rejects
/// every write as unauthorized, as does the filesystem when it denies
/// permission.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    read_only: bool,
}

impl LocalObjectStore {
    /// Create a writable store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            read_only: false,
        }
    }

    /// Create a store that can be listed and read but not written
    pub fn read_only(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            read_only: true,
        }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> IronlogResult<PathBuf> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(IronlogError::Validation(format!(
                "Invalid object path '{}'",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectStore for LocalObjectStore {
    fn put(&self, name: &str, bytes: &[u8]) -> IronlogResult<String> {
        if self.read_only {
            return Err(IronlogError::Unauthorized(format!(
                "Backup store {} does not accept writes",
                self.root.display()
            )));
        }

        let target = self.resolve(name)?;
        write_bytes_atomic(&target, bytes)?;
        debug!(path = %target.display(), size = bytes.len(), "Object written");
        Ok(name.to_string())
    }

    fn list(&self) -> IronlogResult<Vec<ObjectEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(".tmp") {
                continue;
            }

            let metadata = entry.metadata()?;
            let created = metadata.created().or_else(|_| metadata.modified())?;
            let id = if metadata.is_dir() {
                None
            } else {
                Some(name.clone())
            };

            entries.push(ObjectEntry {
                id,
                path: name.clone(),
                name,
                created_at: DateTime::<Utc>::from(created),
            });
        }

        Ok(entries)
    }

    fn get(&self, path: &str) -> IronlogResult<Vec<u8>> {
        let target = self.resolve(path)?;
        fs::read(&target).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => IronlogError::backup_not_found(path),
            _ => IronlogError::from(e),
        })
    }
}
