//! Storage layer for Ironlog
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. [`Storage`] is the live entity store the backup engine reads
//! from and restores into.

pub mod categories;
pub mod entity_store;
pub mod exercises;
pub mod file_io;
pub mod workouts;

pub use categories::CategoryRepository;
pub use entity_store::{EntityStore, Upsert};
pub use exercises::ExerciseRepository;
pub use file_io::{read_json, write_bytes_atomic, write_json_atomic};
pub use workouts::WorkoutRepository;

use tracing::warn;

use crate::config::paths::IronlogPaths;
use crate::error::{IronlogError, IronlogResult};
use crate::models::{
    Category, CategoryId, Exercise, ExerciseId, ExerciseSet, SetId, Workout, WorkoutExercise,
    WorkoutExerciseId, WorkoutId,
};

use workouts::{SetRow, WorkoutExerciseRow, WorkoutRow};

/// Main storage coordinator that provides access to all repositories
///
/// Writes through [`EntityStore`] check references across repositories and
/// persist the touched file before returning.
pub struct Storage {
    paths: IronlogPaths,
    pub categories: CategoryRepository,
    pub exercises: ExerciseRepository,
    pub workouts: WorkoutRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: IronlogPaths) -> Result<Self, IronlogError> {
        paths.ensure_directories()?;

        Ok(Self {
            categories: CategoryRepository::new(paths.categories_file()),
            exercises: ExerciseRepository::new(paths.exercises_file()),
            workouts: WorkoutRepository::new(paths.workouts_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &IronlogPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), IronlogError> {
        self.categories.load()?;
        self.exercises.load()?;
        self.workouts.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), IronlogError> {
        self.categories.save()?;
        self.exercises.save()?;
        self.workouts.save()?;
        Ok(())
    }
}

impl EntityStore for Storage {
    fn list_categories(&self) -> IronlogResult<Vec<Category>> {
        self.categories.get_all()
    }

    fn list_exercises(&self) -> IronlogResult<Vec<Exercise>> {
        self.exercises.get_all()
    }

    fn list_workouts(&self) -> IronlogResult<Vec<Workout>> {
        self.workouts.get_all()
    }

    fn category_exists(&self, id: CategoryId) -> IronlogResult<bool> {
        self.categories.contains(id)
    }

    fn insert_category(&self, category: &Category) -> IronlogResult<()> {
        self.categories.insert(category.clone())?;
        commit(|| self.categories.save(), || self.categories.load())
    }

    fn update_category(&self, category: &Category) -> IronlogResult<()> {
        self.categories.update(category)?;
        commit(|| self.categories.save(), || self.categories.load())
    }

    fn exercise_exists(&self, id: ExerciseId) -> IronlogResult<bool> {
        self.exercises.contains(id)
    }

    fn insert_exercise(&self, exercise: &Exercise) -> IronlogResult<()> {
        self.check_category_reference(exercise)?;
        self.exercises.insert(exercise.clone())?;
        commit(|| self.exercises.save(), || self.exercises.load())
    }

    fn update_exercise(&self, exercise: &Exercise) -> IronlogResult<()> {
        self.check_category_reference(exercise)?;
        self.exercises.update(exercise)?;
        commit(|| self.exercises.save(), || self.exercises.load())
    }

    fn delete_all_workouts(&self) -> IronlogResult<usize> {
        let removed = self.workouts.delete_all()?;
        self.commit_workouts()?;
        Ok(removed)
    }

    fn insert_workout(&self, workout: &Workout) -> IronlogResult<()> {
        self.workouts.insert_workout(WorkoutRow::from(workout))?;
        self.commit_workouts()
    }

    fn insert_workout_exercise(
        &self,
        workout_id: WorkoutId,
        entry: &WorkoutExercise,
    ) -> IronlogResult<()> {
        if !self.workouts.contains(workout_id)? {
            return Err(IronlogError::ForeignKey {
                entity_type: "Workout exercise",
                identifier: entry.id.to_string(),
                references: format!("workout {}", workout_id),
            });
        }
        if !self.exercises.contains(entry.exercise_id)? {
            return Err(IronlogError::ForeignKey {
                entity_type: "Workout exercise",
                identifier: entry.id.to_string(),
                references: format!("exercise {}", entry.exercise_id),
            });
        }

        self.workouts.insert_entry(WorkoutExerciseRow {
            id: entry.id,
            workout_id,
            exercise_id: entry.exercise_id,
            order: entry.order,
        })?;
        self.commit_workouts()
    }

    fn insert_sets(
        &self,
        workout_exercise_id: WorkoutExerciseId,
        sets: &[ExerciseSet],
    ) -> IronlogResult<usize> {
        if sets.is_empty() {
            return Ok(0);
        }
        if !self.workouts.contains_entry(workout_exercise_id)? {
            return Err(IronlogError::ForeignKey {
                entity_type: "Exercise set",
                identifier: workout_exercise_id.to_string(),
                references: format!("workout exercise {}", workout_exercise_id),
            });
        }

        let rows = sets
            .iter()
            .map(|set| SetRow {
                id: SetId::new(),
                workout_exercise_id,
                set: set.clone(),
            })
            .collect();
        let inserted = self.workouts.insert_sets(rows)?;
        self.commit_workouts()?;
        Ok(inserted)
    }
}

impl Storage {
    fn commit_workouts(&self) -> IronlogResult<()> {
        commit(|| self.workouts.save(), || self.workouts.load())
    }

    fn check_category_reference(&self, exercise: &Exercise) -> IronlogResult<()> {
        match exercise.category {
            Some(category) if !self.categories.contains(category)? => {
                Err(IronlogError::ForeignKey {
                    entity_type: "Exercise",
                    identifier: exercise.id.to_string(),
                    references: format!("category {}", category),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Persist a repository after an in-memory write
///
/// If the save fails the repository is reloaded from disk, dropping the
/// unsaved change, and the save error is returned.
fn commit(
    save: impl FnOnce() -> IronlogResult<()>,
    reload: impl FnOnce() -> IronlogResult<()>,
) -> IronlogResult<()> {
    let Err(err) = save() else {
        return Ok(());
    };
    if let Err(reload_err) = reload() {
        warn!(error = %reload_err, "Failed to reload after unsaved write");
    }
    Err(err)
}
