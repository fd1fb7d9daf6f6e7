//! Test doubles for the backup engine

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use crate::config::paths::IronlogPaths;
use crate::error::{IronlogError, IronlogResult};
use crate::models::{
    Category, CategoryId, Exercise, ExerciseId, ExerciseSet, Workout, WorkoutExercise,
    WorkoutExerciseId, WorkoutId,
};
use crate::storage::{EntityStore, Storage};

use super::object_store::{ObjectEntry, ObjectStore};
use super::snapshot::Snapshot;

/// A real [`Storage`] in a temp dir that records writes and can be told to fail
pub struct TestStore {
    inner: Storage,
    _dir: TempDir,
    writes: RefCell<Vec<String>>,
    failing_workouts: RefCell<HashSet<WorkoutId>>,
    failing_sets: RefCell<HashSet<WorkoutExerciseId>>,
    catalog_failure: Cell<Option<fn() -> IronlogError>>,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let inner = Storage::new(IronlogPaths::with_base_dir(dir.path().to_path_buf())).unwrap();
        Self {
            inner,
            _dir: dir,
            writes: RefCell::new(Vec::new()),
            failing_workouts: RefCell::new(HashSet::new()),
            failing_sets: RefCell::new(HashSet::new()),
            catalog_failure: Cell::new(None),
        }
    }

    /// Names of the write calls made so far
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }

    /// Make inserting this workout fail
    pub fn fail_workout(&self, id: WorkoutId) {
        self.failing_workouts.borrow_mut().insert(id);
    }

    /// Make inserting the sets of this workout exercise fail
    pub fn fail_sets(&self, id: WorkoutExerciseId) {
        self.failing_sets.borrow_mut().insert(id);
    }

    /// Make every category and exercise write fail with `err`
    pub fn fail_catalog_writes_with(&self, err: fn() -> IronlogError) {
        self.catalog_failure.set(Some(err));
    }

    fn record(&self, call: &str) {
        self.writes.borrow_mut().push(call.to_string());
    }

    fn catalog_guard(&self) -> IronlogResult<()> {
        match self.catalog_failure.get() {
            Some(err) => Err(err()),
            None => Ok(()),
        }
    }
}

impl EntityStore for TestStore {
    fn list_categories(&self) -> IronlogResult<Vec<Category>> {
        self.inner.list_categories()
    }

    fn list_exercises(&self) -> IronlogResult<Vec<Exercise>> {
        self.inner.list_exercises()
    }

    fn list_workouts(&self) -> IronlogResult<Vec<Workout>> {
        self.inner.list_workouts()
    }

    fn category_exists(&self, id: CategoryId) -> IronlogResult<bool> {
        self.inner.category_exists(id)
    }

    fn insert_category(&self, category: &Category) -> IronlogResult<()> {
        self.record("insert_category");
        self.catalog_guard()?;
        self.inner.insert_category(category)
    }

    fn update_category(&self, category: &Category) -> IronlogResult<()> {
        self.record("update_category");
        self.catalog_guard()?;
        self.inner.update_category(category)
    }

    fn exercise_exists(&self, id: ExerciseId) -> IronlogResult<bool> {
        self.inner.exercise_exists(id)
    }

    fn insert_exercise(&self, exercise: &Exercise) -> IronlogResult<()> {
        self.record("insert_exercise");
        self.catalog_guard()?;
        self.inner.insert_exercise(exercise)
    }

    fn update_exercise(&self, exercise: &Exercise) -> IronlogResult<()> {
        self.record("update_exercise");
        self.catalog_guard()?;
        self.inner.update_exercise(exercise)
    }

    fn delete_all_workouts(&self) -> IronlogResult<usize> {
        self.record("delete_all_workouts");
        self.inner.delete_all_workouts()
    }

    fn insert_workout(&self, workout: &Workout) -> IronlogResult<()> {
        self.record("insert_workout");
        if self.failing_workouts.borrow().contains(&workout.id) {
            return Err(IronlogError::Storage(format!(
                "injected failure for {}",
                workout.id
            )));
        }
        self.inner.insert_workout(workout)
    }

    fn insert_workout_exercise(
        &self,
        workout_id: WorkoutId,
        entry: &WorkoutExercise,
    ) -> IronlogResult<()> {
        self.record("insert_workout_exercise");
        self.inner.insert_workout_exercise(workout_id, entry)
    }

    fn insert_sets(
        &self,
        workout_exercise_id: WorkoutExerciseId,
        sets: &[ExerciseSet],
    ) -> IronlogResult<usize> {
        self.record("insert_sets");
        if self.failing_sets.borrow().contains(&workout_exercise_id) {
            return Err(IronlogError::Storage(format!(
                "injected failure for sets of {}",
                workout_exercise_id
            )));
        }
        self.inner.insert_sets(workout_exercise_id, sets)
    }
}

/// The entities seeded into a [`TestStore`]
pub struct Fixture {
    pub categories: Vec<Category>,
    pub exercises: Vec<Exercise>,
    pub workouts: Vec<Workout>,
}

impl Fixture {
    pub fn new() -> Self {
        let chest = Category::new("Chest", "#e74c3c");
        let legs = Category::new("Legs", "#3498db");

        let bench = Exercise {
            description: Some("Flat barbell bench".into()),
            image_url: Some("https://img.example/bench.png".into()),
            ..Exercise::new("Bench Press").in_category(chest.id)
        };
        let squat = Exercise::new("Back Squat").in_category(legs.id);
        let plank = Exercise::new("Plank");

        let day = |d: u32| NaiveDate::from_ymd_opt(2025, 5, d).unwrap();

        let mut push = Workout::new("Push", day(5));
        push.completed = true;
        push.progress = Some(100.0);
        let mut first = ExerciseSet::planned(1, 8, Some(60.0));
        first.complete(8);
        let mut second = ExerciseSet::planned(2, 8, Some(62.5));
        second.complete(7);
        second.notes = Some("grindy".into());
        push.push_exercise(bench.id, vec![first, second]);
        push.push_exercise(plank.id, vec![ExerciseSet::planned(1, 1, None)]);

        let mut legs_day = Workout::new("Legs", day(7));
        legs_day.description = Some("Heavy triples".into());
        legs_day.push_exercise(
            squat.id,
            (1..=3).map(|n| ExerciseSet::planned(n, 3, Some(120.0))).collect(),
        );

        let mut rest = Workout::new("Mobility", day(9));
        rest.archived = Some(true);

        Self {
            categories: vec![chest, legs],
            exercises: vec![bench, squat, plank],
            workouts: vec![push, legs_day, rest],
        }
    }

    /// Write the fixture into `store` through the entity store API
    pub fn seed(&self, store: &dyn EntityStore) {
        for category in &self.categories {
            store.insert_category(category).unwrap();
        }
        for exercise in &self.exercises {
            store.insert_exercise(exercise).unwrap();
        }
        for workout in &self.workouts {
            store.insert_workout(workout).unwrap();
            for entry in &workout.exercises {
                store.insert_workout_exercise(workout.id, entry).unwrap();
                store.insert_sets(entry.id, &entry.sets).unwrap();
            }
        }
    }
}

/// A [`TestStore`] holding a fresh [`Fixture`], with the write log cleared
pub fn seeded_store() -> (TestStore, Fixture) {
    let store = TestStore::new();
    let fixture = Fixture::new();
    fixture.seed(&store);
    store.clear_writes();
    (store, fixture)
}

/// A snapshot of a fresh fixture with a fixed timestamp
pub fn sample_snapshot() -> Snapshot {
    let fixture = Fixture::new();
    Snapshot::new(
        fixture.categories,
        fixture.exercises,
        fixture.workouts,
        Utc.with_ymd_and_hms(2025, 5, 10, 18, 45, 3).unwrap(),
    )
}

/// In-memory object store with switchable write failures
pub struct MemoryObjectStore {
    objects: RefCell<BTreeMap<String, (Vec<u8>, DateTime<Utc>)>>,
    folders: RefCell<Vec<String>>,
    deny: Cell<bool>,
    failure: Cell<Option<fn() -> IronlogError>>,
    put_attempts: Cell<usize>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self {
            objects: RefCell::new(BTreeMap::new()),
            folders: RefCell::new(Vec::new()),
            deny: Cell::new(false),
            failure: Cell::new(None),
            put_attempts: Cell::new(0),
        }
    }

    /// Reject writes as unauthorized
    pub fn deny_writes(&self) {
        self.deny.set(true);
    }

    /// Reject writes with an arbitrary error
    pub fn fail_writes_with(&self, err: fn() -> IronlogError) {
        self.failure.set(Some(err));
    }

    pub fn put_attempts(&self) -> usize {
        self.put_attempts.get()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.borrow().contains_key(name)
    }

    pub fn list_names(&self) -> Vec<String> {
        self.objects.borrow().keys().cloned().collect()
    }

    /// Store an object with an explicit creation time
    pub fn insert_at(&self, name: &str, bytes: &[u8], created_at: DateTime<Utc>) {
        self.objects
            .borrow_mut()
            .insert(name.to_string(), (bytes.to_vec(), created_at));
    }

    pub fn add_folder(&self, name: &str) {
        self.folders.borrow_mut().push(name.to_string());
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put(&self, name: &str, bytes: &[u8]) -> IronlogResult<String> {
        self.put_attempts.set(self.put_attempts.get() + 1);
        if self.deny.get() {
            return Err(IronlogError::Unauthorized("write denied by policy".into()));
        }
        if let Some(err) = self.failure.get() {
            return Err(err());
        }
        self.insert_at(name, bytes, Utc::now());
        Ok(name.to_string())
    }

    fn list(&self) -> IronlogResult<Vec<ObjectEntry>> {
        let mut entries: Vec<ObjectEntry> = self
            .objects
            .borrow()
            .iter()
            .map(|(name, (_, created_at))| ObjectEntry {
                id: Some(name.clone()),
                name: name.clone(),
                path: name.clone(),
                created_at: *created_at,
            })
            .collect();
        entries.extend(self.folders.borrow().iter().map(|name| ObjectEntry {
            id: None,
            name: name.clone(),
            path: name.clone(),
            created_at: Utc::now(),
        }));
        Ok(entries)
    }

    fn get(&self, path: &str) -> IronlogResult<Vec<u8>> {
        self.objects
            .borrow()
            .get(path)
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| IronlogError::backup_not_found(path))
    }
}
