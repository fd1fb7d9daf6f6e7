//! The entity store boundary used by the backup engine
//!
//! Backup and restore never touch repositories directly; they go through
//! [`EntityStore`] so the live store can be swapped for a fake in tests or
//! for a remote database client.

use crate::error::IronlogResult;
use crate::models::{
    Category, CategoryId, Exercise, ExerciseId, ExerciseSet, Workout, WorkoutExercise,
    WorkoutExerciseId, WorkoutId,
};

/// Outcome of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// Read and write access to the structured entity store
///
/// Every call is one round-trip against the store. Callers issue them
/// sequentially; no call spans more than one entity type.
pub trait EntityStore {
    /// All categories
    fn list_categories(&self) -> IronlogResult<Vec<Category>>;

    /// All exercises
    fn list_exercises(&self) -> IronlogResult<Vec<Exercise>>;

    /// All workouts with nested exercise entries and sets
    fn list_workouts(&self) -> IronlogResult<Vec<Workout>>;

    fn category_exists(&self, id: CategoryId) -> IronlogResult<bool>;

    /// Insert a category, keeping its ID
    fn insert_category(&self, category: &Category) -> IronlogResult<()>;

    /// Overwrite name and colour of an existing category
    fn update_category(&self, category: &Category) -> IronlogResult<()>;

    fn exercise_exists(&self, id: ExerciseId) -> IronlogResult<bool>;

    /// Insert an exercise, keeping its ID
    fn insert_exercise(&self, exercise: &Exercise) -> IronlogResult<()>;

    /// Overwrite name, description, category and image of an existing exercise
    fn update_exercise(&self, exercise: &Exercise) -> IronlogResult<()>;

    /// Remove every workout along with its exercise entries and sets
    fn delete_all_workouts(&self) -> IronlogResult<usize>;

    /// Insert the workout row only; nested entries are ignored
    fn insert_workout(&self, workout: &Workout) -> IronlogResult<()>;

    /// Insert one workout-exercise association, keeping its ID; sets are ignored
    fn insert_workout_exercise(
        &self,
        workout_id: WorkoutId,
        entry: &WorkoutExercise,
    ) -> IronlogResult<()>;

    /// Bulk insert the sets of one association
    fn insert_sets(
        &self,
        workout_exercise_id: WorkoutExerciseId,
        sets: &[ExerciseSet],
    ) -> IronlogResult<usize>;

    /// Update-if-exists, insert otherwise
    ///
    /// Stores with a native upsert should override this to drop the extra
    /// read.
    fn upsert_category(&self, category: &Category) -> IronlogResult<Upsert> {
        if self.category_exists(category.id)? {
            self.update_category(category)?;
            Ok(Upsert::Updated)
        } else {
            self.insert_category(category)?;
            Ok(Upsert::Inserted)
        }
    }

    /// Update-if-exists, insert otherwise
    fn upsert_exercise(&self, exercise: &Exercise) -> IronlogResult<Upsert> {
        if self.exercise_exists(exercise.id)? {
            self.update_exercise(exercise)?;
            Ok(Upsert::Updated)
        } else {
            self.insert_exercise(exercise)?;
            Ok(Upsert::Inserted)
        }
    }
}
