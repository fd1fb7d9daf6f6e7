//! Backup and restore engine for Ironlog
//!
//! Captures the exercise catalog and workout log into a portable JSON
//! snapshot, persists it to a durable object store, and reconciles a
//! snapshot back into the live entity store.
//!
//! # Architecture
//!
//! - [`SnapshotBuilder`]: reads the entity store and assembles a [`Snapshot`]
//! - [`SnapshotSink`]: writes a snapshot to an [`ObjectStore`], falling back
//!   to a local file when the store refuses the write
//! - [`SnapshotCatalog`]: lists and downloads stored snapshots
//! - [`Reconciler`]: restores a snapshot into an [`EntityStore`]
//!
//! # Snapshot Format
//!
//! A single JSON object:
//! - `categories`, `exercises`: required
//! - `workouts`: nested entries and sets, optional
//! - `timestamp`, `version`, `schemaVersion`: metadata
//!
//! # Example
//!
//! ```rust,ignore
//! use ironlog::backup::{BuildOutcome, LocalObjectStore, Reconciler, SnapshotBuilder, SnapshotSink};
//!
//! let store = LocalObjectStore::new(paths.backup_dir());
//! if let BuildOutcome::Built(snapshot) = SnapshotBuilder::new(&storage).build()? {
//!     let outcome = SnapshotSink::new(&store).persist(snapshot)?;
//! }
//!
//! // Later
//! let report = Reconciler::new(&storage).restore(&bytes)?;
//! println!("{}", report.summary());
//! ```
//!
//! [`EntityStore`]: crate::storage::EntityStore

mod builder;
mod catalog;
mod object_store;
mod restore;
mod schema;
mod sink;
mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{BuildOutcome, SnapshotBuilder};
pub use catalog::{CatalogEntry, SnapshotCatalog};
pub use object_store::{LocalObjectStore, ObjectEntry, ObjectStore};
pub use restore::{FailedItem, ItemFailure, Reconciler, RestoreReport, UpsertCounts};
pub use schema::{
    describe_schema, export_schema, ColumnDescriptor, ForeignKey, IndexDescriptor,
    SchemaDescriptor, TableDescriptor, SCHEMA_FILE_NAME,
};
pub use sink::{PersistOutcome, SnapshotSink};
pub use snapshot::{Snapshot, SnapshotSummary, SCHEMA_VERSION, SNAPSHOT_FORMAT_VERSION};
