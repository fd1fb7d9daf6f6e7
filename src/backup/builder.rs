//! Snapshot builder
//!
//! Pulls the full catalog and workout log out of the live store and stamps
//! it as a snapshot.

use chrono::Utc;
use tracing::info;

use crate::error::IronlogResult;
use crate::storage::EntityStore;

use super::snapshot::Snapshot;

/// Result of building a snapshot
#[derive(Debug)]
pub enum BuildOutcome {
    /// A snapshot ready to persist
    Built(Snapshot),
    /// The store holds no data; callers should treat this as a no-op
    NothingToBackUp,
}

/// Assembles snapshots from an entity store
pub struct SnapshotBuilder<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> SnapshotBuilder<'a> {
    /// Create a builder reading from `store`
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    /// Read every entity and bundle them
    pub fn build(&self) -> IronlogResult<BuildOutcome> {
        let categories = self.store.list_categories()?;
        let exercises = self.store.list_exercises()?;
        let workouts = self.store.list_workouts()?;

        if categories.is_empty() && exercises.is_empty() && workouts.is_empty() {
            info!("Store is empty, nothing to back up");
            return Ok(BuildOutcome::NothingToBackUp);
        }

        let snapshot = Snapshot::new(categories, exercises, workouts, Utc::now());
        info!(
            categories = snapshot.categories.len(),
            exercises = snapshot.exercises.len(),
            workouts = snapshot.workouts.len(),
            "Snapshot built"
        );
        Ok(BuildOutcome::Built(snapshot))
    }
}
