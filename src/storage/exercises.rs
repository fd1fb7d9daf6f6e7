//! Exercise repository for JSON storage
//!
//! Manages loading and saving the exercise catalog to exercises.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::IronlogError;
use crate::models::{Exercise, ExerciseId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable exercise data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ExerciseData {
    pub exercises: Vec<Exercise>,
}

/// Repository for exercise persistence
pub struct ExerciseRepository {
    path: PathBuf,
    exercises: RwLock<HashMap<ExerciseId, Exercise>>,
}

impl ExerciseRepository {
    /// Create a new exercise repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            exercises: RwLock::new(HashMap::new()),
        }
    }

    /// Load exercises from disk
    pub fn load(&self) -> Result<(), IronlogError> {
        let file_data: ExerciseData = read_json(&self.path)?;

        let mut exercises = self
            .exercises
            .write()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        exercises.clear();
        for exercise in file_data.exercises {
            exercises.insert(exercise.id, exercise);
        }

        Ok(())
    }

    /// Save exercises to disk
    pub fn save(&self) -> Result<(), IronlogError> {
        let file_data = ExerciseData {
            exercises: self.get_all()?,
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get an exercise by ID
    pub fn get(&self, id: ExerciseId) -> Result<Option<Exercise>, IronlogError> {
        let exercises = self
            .exercises
            .read()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(exercises.get(&id).cloned())
    }

    /// Get all exercises sorted by name
    pub fn get_all(&self) -> Result<Vec<Exercise>, IronlogError> {
        let exercises = self
            .exercises
            .read()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = exercises.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    /// Check whether an exercise with this ID exists
    pub fn contains(&self, id: ExerciseId) -> Result<bool, IronlogError> {
        let exercises = self
            .exercises
            .read()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(exercises.contains_key(&id))
    }

    /// Insert a new exercise, failing if the ID is already taken
    pub fn insert(&self, exercise: Exercise) -> Result<(), IronlogError> {
        let mut exercises = self
            .exercises
            .write()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if exercises.contains_key(&exercise.id) {
            return Err(IronlogError::Duplicate {
                entity_type: "Exercise",
                identifier: exercise.id.to_string(),
            });
        }

        exercises.insert(exercise.id, exercise);
        Ok(())
    }

    /// Overwrite the mutable fields of an existing exercise
    pub fn update(&self, exercise: &Exercise) -> Result<(), IronlogError> {
        let mut exercises = self
            .exercises
            .write()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let existing = exercises
            .get_mut(&exercise.id)
            .ok_or_else(|| IronlogError::exercise_not_found(exercise.id.to_string()))?;
        existing.apply(exercise);
        Ok(())
    }

    /// Count exercises
    pub fn count(&self) -> Result<usize, IronlogError> {
        let exercises = self
            .exercises
            .read()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(exercises.len())
    }
}
