//! Workout repository for JSON storage
//!
//! Workouts are stored relationally in workouts.json: one table of workout
//! rows, one of workout-exercise association rows and one of set rows. The
//! nested [`Workout`] shape is assembled on read.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::IronlogError;
use crate::models::{
    ExerciseId, ExerciseSet, SetId, Workout, WorkoutExercise, WorkoutExerciseId, WorkoutId,
};

use super::file_io::{read_json, write_json_atomic};

/// A workout without its nested entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRow {
    pub id: WorkoutId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub archived: Option<bool>,
}

impl From<&Workout> for WorkoutRow {
    fn from(workout: &Workout) -> Self {
        Self {
            id: workout.id,
            name: workout.name.clone(),
            description: workout.description.clone(),
            date: workout.date,
            completed: workout.completed,
            progress: workout.progress,
            archived: workout.archived,
        }
    }
}

/// Association between a workout and a catalog exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExerciseRow {
    pub id: WorkoutExerciseId,
    pub workout_id: WorkoutId,
    pub exercise_id: ExerciseId,
    pub order: u32,
}

/// A set owned by a workout-exercise association
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRow {
    pub id: SetId,
    pub workout_exercise_id: WorkoutExerciseId,
    #[serde(flatten)]
    pub set: ExerciseSet,
}

/// Serializable workout tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutData {
    pub workouts: Vec<WorkoutRow>,
    pub workout_exercises: Vec<WorkoutExerciseRow>,
    pub sets: Vec<SetRow>,
}

#[derive(Default)]
struct Tables {
    workouts: HashMap<WorkoutId, WorkoutRow>,
    entries: HashMap<WorkoutExerciseId, WorkoutExerciseRow>,
    sets: Vec<SetRow>,
}

/// Repository for workout persistence
pub struct WorkoutRepository {
    path: PathBuf,
    tables: RwLock<Tables>,
}

impl WorkoutRepository {
    /// Create a new workout repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Load workouts from disk
    pub fn load(&self) -> Result<(), IronlogError> {
        let file_data: WorkoutData = read_json(&self.path)?;

        let mut tables = self
            .tables
            .write()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        tables.workouts = file_data.workouts.into_iter().map(|w| (w.id, w)).collect();
        tables.entries = file_data
            .workout_exercises
            .into_iter()
            .map(|e| (e.id, e))
            .collect();
        tables.sets = file_data.sets;

        Ok(())
    }

    /// Save workouts to disk
    pub fn save(&self) -> Result<(), IronlogError> {
        let tables = self
            .tables
            .read()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut workouts: Vec<_> = tables.workouts.values().cloned().collect();
        workouts.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        let mut workout_exercises: Vec<_> = tables.entries.values().cloned().collect();
        workout_exercises.sort_by_key(|e| (e.workout_id, e.order));

        let file_data = WorkoutData {
            workouts,
            workout_exercises,
            sets: tables.sets.clone(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get all workouts with their exercise entries and sets, newest first
    pub fn get_all(&self) -> Result<Vec<Workout>, IronlogError> {
        let tables = self
            .tables
            .read()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut sets_by_entry: HashMap<WorkoutExerciseId, Vec<ExerciseSet>> = HashMap::new();
        for row in &tables.sets {
            sets_by_entry
                .entry(row.workout_exercise_id)
                .or_default()
                .push(row.set.clone());
        }

        let mut entries_by_workout: HashMap<WorkoutId, Vec<WorkoutExercise>> = HashMap::new();
        for row in tables.entries.values() {
            let mut sets = sets_by_entry.remove(&row.id).unwrap_or_default();
            sets.sort_by_key(|s| s.set_number);
            entries_by_workout
                .entry(row.workout_id)
                .or_default()
                .push(WorkoutExercise {
                    id: row.id,
                    exercise_id: row.exercise_id,
                    order: row.order,
                    sets,
                });
        }

        let mut list: Vec<Workout> = tables
            .workouts
            .values()
            .map(|row| {
                let mut exercises = entries_by_workout.remove(&row.id).unwrap_or_default();
                exercises.sort_by_key(|e| (e.order, e.id));
                Workout {
                    id: row.id,
                    name: row.name.clone(),
                    description: row.description.clone(),
                    date: row.date,
                    completed: row.completed,
                    progress: row.progress,
                    archived: row.archived,
                    exercises,
                }
            })
            .collect();

        list.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    /// Check whether a workout with this ID exists
    pub fn contains(&self, id: WorkoutId) -> Result<bool, IronlogError> {
        let tables = self
            .tables
            .read()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(tables.workouts.contains_key(&id))
    }

    /// Check whether a workout-exercise association exists
    pub fn contains_entry(&self, id: WorkoutExerciseId) -> Result<bool, IronlogError> {
        let tables = self
            .tables
            .read()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(tables.entries.contains_key(&id))
    }

    /// Insert a workout row
    pub fn insert_workout(&self, row: WorkoutRow) -> Result<(), IronlogError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if tables.workouts.contains_key(&row.id) {
            return Err(IronlogError::Duplicate {
                entity_type: "Workout",
                identifier: row.id.to_string(),
            });
        }

        tables.workouts.insert(row.id, row);
        Ok(())
    }

    /// Insert a workout-exercise association row
    pub fn insert_entry(&self, row: WorkoutExerciseRow) -> Result<(), IronlogError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if tables.entries.contains_key(&row.id) {
            return Err(IronlogError::Duplicate {
                entity_type: "Workout exercise",
                identifier: row.id.to_string(),
            });
        }

        tables.entries.insert(row.id, row);
        Ok(())
    }

    /// Append set rows
    pub fn insert_sets(&self, rows: Vec<SetRow>) -> Result<usize, IronlogError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let count = rows.len();
        tables.sets.extend(rows);
        Ok(count)
    }

    /// Delete every workout together with its associations and sets
    ///
    /// Returns the number of workouts removed.
    pub fn delete_all(&self) -> Result<usize, IronlogError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let removed = tables.workouts.len();
        *tables = Tables::default();
        Ok(removed)
    }

    /// Count workouts
    pub fn count(&self) -> Result<usize, IronlogError> {
        let tables = self
            .tables
            .read()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(tables.workouts.len())
    }
}
