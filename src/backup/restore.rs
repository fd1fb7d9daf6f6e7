//! Snapshot restoration
//!
//! Replays a snapshot into the live store in dependency order:
//!
//! 1. categories, upserted by ID
//! 2. exercises, upserted by ID (their categories now exist)
//! 3. workouts, replaced wholesale: every live workout is deleted, then each
//!    snapshot workout is inserted with its exercise entries and sets
//!
//! Nothing is rolled back. A store error while upserting the catalog aborts
//! the restore and leaves earlier upserts in place. Failures inside the
//! workout phase only skip the affected workout or entry and are recorded in
//! the [`RestoreReport`].

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::IronlogResult;
use crate::models::Workout;
use crate::storage::{EntityStore, Upsert};

use super::snapshot::Snapshot;

/// Restores snapshots into an entity store
pub struct Reconciler<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler writing to `store`
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    /// Parse, validate and restore snapshot bytes
    ///
    /// Validation failures return before anything is written.
    pub fn restore(&self, bytes: &[u8]) -> IronlogResult<RestoreReport> {
        let snapshot = Snapshot::parse(bytes)?;
        self.restore_snapshot(&snapshot)
    }

    /// Restore an already parsed snapshot
    pub fn restore_snapshot(&self, snapshot: &Snapshot) -> IronlogResult<RestoreReport> {
        snapshot.check_schema_version()?;

        let mut report = RestoreReport {
            format_version: snapshot.version.clone(),
            schema_version: snapshot.schema_version.clone(),
            snapshot_timestamp: snapshot.timestamp,
            ..RestoreReport::default()
        };

        info!(
            categories = snapshot.categories.len(),
            exercises = snapshot.exercises.len(),
            workouts = snapshot.workouts.len(),
            "Starting restore"
        );

        for category in &snapshot.categories {
            let outcome = self.store.upsert_category(category)?;
            report.categories.record(outcome);
        }
        info!(
            inserted = report.categories.inserted,
            updated = report.categories.updated,
            "Categories reconciled"
        );

        for exercise in &snapshot.exercises {
            let outcome = self.store.upsert_exercise(exercise)?;
            report.exercises.record(outcome);
        }
        info!(
            inserted = report.exercises.inserted,
            updated = report.exercises.updated,
            "Exercises reconciled"
        );

        if !snapshot.workouts.is_empty() {
            report.workouts_deleted = self.store.delete_all_workouts()?;
            info!(deleted = report.workouts_deleted, "Existing workouts removed");

            for workout in &snapshot.workouts {
                self.restore_workout(workout, &mut report);
            }
            info!(
                restored = report.workouts_restored,
                entries = report.workout_exercises_restored,
                sets = report.sets_restored,
                failures = report.failures.len(),
                "Workouts restored"
            );
        }

        Ok(report)
    }

    fn restore_workout(&self, workout: &Workout, report: &mut RestoreReport) {
        if let Err(err) = self.store.insert_workout(workout) {
            warn!(workout = %workout.id, error = %err, "Skipping workout");
            report.fail(
                FailedItem::Workout,
                workout.id.as_uuid().to_string(),
                err.to_string(),
            );
            return;
        }
        report.workouts_restored += 1;

        for entry in &workout.exercises {
            if let Err(err) = self.store.insert_workout_exercise(workout.id, entry) {
                warn!(
                    workout = %workout.id,
                    entry = %entry.id,
                    error = %err,
                    "Skipping workout exercise"
                );
                report.fail(
                    FailedItem::WorkoutExercise,
                    entry.id.as_uuid().to_string(),
                    err.to_string(),
                );
                continue;
            }
            report.workout_exercises_restored += 1;

            match self.store.insert_sets(entry.id, &entry.sets) {
                Ok(inserted) => report.sets_restored += inserted,
                Err(err) => {
                    warn!(entry = %entry.id, sets = entry.sets.len(), error = %err, "Sets not restored");
                    report.fail(
                        FailedItem::Sets,
                        entry.id.as_uuid().to_string(),
                        err.to_string(),
                    );
                }
            }
        }
    }
}

/// Inserted/updated tallies for one entity type
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpsertCounts {
    pub inserted: usize,
    pub updated: usize,
}

impl UpsertCounts {
    fn record(&mut self, outcome: Upsert) {
        match outcome {
            Upsert::Inserted => self.inserted += 1,
            Upsert::Updated => self.updated += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }
}

/// What kind of item could not be restored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedItem {
    /// The workout row; its entries and sets were not attempted
    Workout,
    /// An exercise entry; its sets were not attempted
    WorkoutExercise,
    /// The sets of an exercise entry (`id` is the entry's)
    Sets,
}

impl fmt::Display for FailedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workout => write!(f, "workout"),
            Self::WorkoutExercise => write!(f, "workout exercise"),
            Self::Sets => write!(f, "sets"),
        }
    }
}

/// One item skipped during the workout phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub kind: FailedItem,
    /// Full UUID of the workout or workout exercise
    pub id: String,
    pub reason: String,
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.id, self.reason)
    }
}

/// Result of a restore operation
#[derive(Debug, Default, Clone)]
pub struct RestoreReport {
    /// Format version of the restored snapshot
    pub format_version: String,
    pub schema_version: Option<String>,
    /// When the snapshot was created
    pub snapshot_timestamp: Option<DateTime<Utc>>,
    pub categories: UpsertCounts,
    pub exercises: UpsertCounts,
    /// Live workouts removed before the snapshot's were inserted
    pub workouts_deleted: usize,
    pub workouts_restored: usize,
    pub workout_exercises_restored: usize,
    pub sets_restored: usize,
    /// Items skipped during the workout phase
    pub failures: Vec<ItemFailure>,
}

impl RestoreReport {
    fn fail(&mut self, kind: FailedItem, id: String, reason: String) {
        self.failures.push(ItemFailure { kind, id, reason });
    }

    /// True when nothing was skipped
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of skipped items of one kind
    pub fn failure_count(&self, kind: FailedItem) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }

    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Restored: {} categories ({} new, {} updated), {} exercises ({} new, {} updated), {} workouts",
            self.categories.total(),
            self.categories.inserted,
            self.categories.updated,
            self.exercises.total(),
            self.exercises.inserted,
            self.exercises.updated,
            self.workouts_restored,
        );
        if self.workouts_restored > 0 {
            summary.push_str(&format!(
                " with {} exercises and {} sets",
                self.workout_exercises_restored, self.sets_restored
            ));
        }
        if !self.is_clean() {
            summary.push_str(&format!("; {} item(s) skipped", self.failures.len()));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::builder::{BuildOutcome, SnapshotBuilder};
    use crate::backup::testing::{seeded_store, Fixture, TestStore};
    use crate::error::IronlogError;
    use crate::models::{
        Category, Exercise, ExerciseId, ExerciseSet, WorkoutExerciseId, WorkoutId,
    };
    use chrono::NaiveDate;

    fn build(store: &TestStore) -> Snapshot {
        match SnapshotBuilder::new(store).build().unwrap() {
            BuildOutcome::Built(snapshot) => snapshot,
            BuildOutcome::NothingToBackUp => panic!("store was empty"),
        }
    }

    fn snapshot_bytes(snapshot: &Snapshot) -> Vec<u8> {
        snapshot.to_json(false).unwrap()
    }

    #[test]
    fn test_round_trip_into_empty_store() {
        let (source, fixture) = seeded_store();
        let snapshot = build(&source);

        let target = TestStore::new();
        let report = Reconciler::new(&target).restore(&snapshot_bytes(&snapshot)).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.categories.inserted, fixture.categories.len());
        assert_eq!(report.exercises.inserted, fixture.exercises.len());
        assert_eq!(target.list_categories().unwrap(), source.list_categories().unwrap());
        assert_eq!(target.list_exercises().unwrap(), source.list_exercises().unwrap());
        assert_eq!(target.list_workouts().unwrap(), source.list_workouts().unwrap());
    }

    #[test]
    fn test_repeated_restore_does_not_duplicate_catalog() {
        let (source, fixture) = seeded_store();
        let bytes = snapshot_bytes(&build(&source));
        let target = TestStore::new();

        Reconciler::new(&target).restore(&bytes).unwrap();
        let second = Reconciler::new(&target).restore(&bytes).unwrap();

        assert_eq!(second.categories.updated, fixture.categories.len());
        assert_eq!(second.categories.inserted, 0);
        assert_eq!(second.exercises.updated, fixture.exercises.len());
        assert_eq!(target.list_categories().unwrap().len(), fixture.categories.len());
        assert_eq!(target.list_exercises().unwrap().len(), fixture.exercises.len());
        assert_eq!(target.list_workouts().unwrap().len(), fixture.workouts.len());
    }

    #[test]
    fn test_catalog_update_overwrites_live_fields() {
        let (source, _fixture) = seeded_store();
        let snapshot = build(&source);
        let target = TestStore::new();
        Reconciler::new(&target).restore_snapshot(&snapshot).unwrap();

        let mut edited = target.list_categories().unwrap()[0].clone();
        edited.name = "Renamed locally".into();
        target.update_category(&edited).unwrap();

        Reconciler::new(&target).restore_snapshot(&snapshot).unwrap();

        let restored = target
            .list_categories()
            .unwrap()
            .into_iter()
            .find(|c| c.id == edited.id)
            .unwrap();
        let original = snapshot.categories.iter().find(|c| c.id == edited.id).unwrap();
        assert_eq!(&restored, original);
    }

    #[test]
    fn test_workouts_not_in_snapshot_are_removed() {
        let (source, fixture) = seeded_store();
        let snapshot = build(&source);

        let target = TestStore::new();
        Reconciler::new(&target).restore_snapshot(&snapshot).unwrap();
        let stray = Workout::new("Not in backup", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        target.insert_workout(&stray).unwrap();

        let report = Reconciler::new(&target).restore_snapshot(&snapshot).unwrap();

        assert_eq!(report.workouts_deleted, fixture.workouts.len() + 1);
        let ids: Vec<_> = target.list_workouts().unwrap().into_iter().map(|w| w.id).collect();
        assert!(!ids.contains(&stray.id));
        assert_eq!(ids.len(), fixture.workouts.len());
    }

    #[test]
    fn test_catalog_only_snapshot_keeps_workouts() {
        let (source, fixture) = seeded_store();
        let mut snapshot = build(&source);
        snapshot.workouts.clear();

        let report = Reconciler::new(&source).restore_snapshot(&snapshot).unwrap();

        assert_eq!(report.workouts_deleted, 0);
        assert_eq!(source.list_workouts().unwrap().len(), fixture.workouts.len());
    }

    #[test]
    fn test_new_category_lands_before_its_exercise() {
        let category = Category::new("Mobility", "#00aa00");
        let exercise = Exercise::new("Hip Circle").in_category(category.id);
        let bytes = serde_json::to_vec(&serde_json::json!({
            "categories": [category],
            "exercises": [exercise],
        }))
        .unwrap();

        let target = TestStore::new();
        let report = Reconciler::new(&target).restore(&bytes).unwrap();

        assert_eq!(report.categories.inserted, 1);
        assert_eq!(report.exercises.inserted, 1);
        assert_eq!(target.list_exercises().unwrap()[0].category, Some(category.id));
    }

    #[test]
    fn test_missing_categories_writes_nothing() {
        let (source, _fixture) = seeded_store();
        let mut value = serde_json::to_value(build(&source)).unwrap();
        value.as_object_mut().unwrap().remove("categories");
        let bytes = serde_json::to_vec(&value).unwrap();

        let target = TestStore::new();
        let err = Reconciler::new(&target).restore(&bytes).unwrap_err();

        assert!(err.is_validation());
        assert!(target.writes().is_empty());
    }

    #[test]
    fn test_newer_schema_version_writes_nothing() {
        let (source, _fixture) = seeded_store();
        let mut snapshot = build(&source);
        snapshot.schema_version = Some("7.0.0".into());

        let target = TestStore::new();
        let err = Reconciler::new(&target).restore_snapshot(&snapshot).unwrap_err();

        assert!(err.is_validation());
        assert!(target.writes().is_empty());
    }

    #[test]
    fn test_failed_workout_is_skipped_and_counted() {
        let (source, fixture) = seeded_store();
        let snapshot = build(&source);
        let broken = fixture.workouts[0].id;

        let target = TestStore::new();
        target.fail_workout(broken);
        let report = Reconciler::new(&target).restore_snapshot(&snapshot).unwrap();

        assert_eq!(report.failure_count(FailedItem::Workout), 1);
        assert_eq!(report.failures[0].id.parse::<WorkoutId>().unwrap(), broken);
        assert_eq!(report.workouts_restored, fixture.workouts.len() - 1);

        let restored: Vec<_> = target.list_workouts().unwrap().into_iter().map(|w| w.id).collect();
        assert!(!restored.contains(&broken));
        for workout in fixture.workouts.iter().skip(1) {
            assert!(restored.contains(&workout.id));
        }
        // Entries of the broken workout were never attempted
        assert_eq!(report.failure_count(FailedItem::WorkoutExercise), 0);
    }

    #[test]
    fn test_unknown_exercise_skips_only_that_entry() {
        let (_source, Fixture { categories, exercises, .. }) = seeded_store();
        let mut workout = Workout::new("Mixed", NaiveDate::from_ymd_opt(2025, 4, 2).unwrap());
        workout.push_exercise(exercises[0].id, vec![ExerciseSet::planned(1, 10, None)]);
        workout.push_exercise(ExerciseId::new(), vec![ExerciseSet::planned(1, 10, None)]);
        workout.push_exercise(exercises[1].id, vec![ExerciseSet::planned(1, 8, Some(20.0))]);

        let snapshot = Snapshot::new(categories, exercises, vec![workout.clone()], chrono::Utc::now());
        let target = TestStore::new();
        let report = Reconciler::new(&target).restore_snapshot(&snapshot).unwrap();

        assert_eq!(report.workouts_restored, 1);
        assert_eq!(report.workout_exercises_restored, 2);
        assert_eq!(report.sets_restored, 2);
        assert_eq!(report.failure_count(FailedItem::WorkoutExercise), 1);
        assert_eq!(
            report.failures[0].id.parse::<WorkoutExerciseId>().unwrap(),
            workout.exercises[1].id
        );

        let restored = &target.list_workouts().unwrap()[0];
        assert_eq!(restored.exercises.len(), 2);
    }

    #[test]
    fn test_failed_sets_keep_their_entry() {
        let (source, fixture) = seeded_store();
        let snapshot = build(&source);
        let push = &fixture.workouts[0];
        let bench_entry = push.exercises[0].id;

        let target = TestStore::new();
        target.fail_sets(bench_entry);
        let report = Reconciler::new(&target).restore_snapshot(&snapshot).unwrap();

        let all_entries: usize = fixture.workouts.iter().map(|w| w.exercises.len()).sum();
        let all_sets: usize = fixture.workouts.iter().map(Workout::set_count).sum();
        assert_eq!(report.workout_exercises_restored, all_entries);
        assert_eq!(report.sets_restored, all_sets - push.exercises[0].sets.len());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failure_count(FailedItem::Sets), 1);
        assert_eq!(
            report.failures[0].id.parse::<WorkoutExerciseId>().unwrap(),
            bench_entry
        );

        let restored = target
            .list_workouts()
            .unwrap()
            .into_iter()
            .find(|w| w.id == push.id)
            .unwrap();
        assert!(restored.exercises[0].sets.is_empty());
        assert_eq!(restored.exercises[1].sets, push.exercises[1].sets);
    }

    #[test]
    fn test_field_shape_is_not_checked() {
        let blank = Category::new("", "");
        let unnamed = Exercise::new("  ").in_category(blank.id);
        let snapshot = Snapshot::new(
            vec![blank.clone()],
            vec![unnamed.clone()],
            Vec::new(),
            chrono::Utc::now(),
        );

        let target = TestStore::new();
        let report = Reconciler::new(&target).restore_snapshot(&snapshot).unwrap();

        assert_eq!(report.categories.inserted, 1);
        assert_eq!(report.exercises.inserted, 1);
        assert_eq!(target.list_exercises().unwrap(), vec![unnamed]);
    }

    #[test]
    fn test_catalog_store_failure_aborts_restore() {
        let (source, _fixture) = seeded_store();
        let snapshot = build(&source);

        let target = TestStore::new();
        target.fail_catalog_writes_with(|| IronlogError::Storage("connection lost".into()));
        let err = Reconciler::new(&target).restore_snapshot(&snapshot).unwrap_err();

        assert!(matches!(err, IronlogError::Storage(_)));
        assert!(target.list_workouts().unwrap().is_empty());
    }

    #[test]
    fn test_report_summary_mentions_skips() {
        let mut report = RestoreReport::default();
        report.categories.record(Upsert::Inserted);
        assert!(report.summary().contains("1 categories (1 new, 0 updated)"));

        report.fail(FailedItem::Workout, "wko-1".into(), "boom".into());
        assert!(report.summary().contains("1 item(s) skipped"));
        assert_eq!(report.failures[0].to_string(), "workout wko-1: boom");
    }
}
