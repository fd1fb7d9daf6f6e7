//! Workouts, their exercise entries and the sets performed
//!
//! A workout owns an ordered list of exercise entries; each entry owns its
//! sets positionally. Sets have no identity of their own outside the entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExerciseId, WorkoutExerciseId, WorkoutId};

/// A scheduled or completed workout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Stable identifier
    pub id: WorkoutId,

    /// Workout name
    pub name: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Day the workout is scheduled for
    pub date: NaiveDate,

    /// Whether the session was finished
    #[serde(default)]
    pub completed: bool,

    /// Completion percentage (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,

    /// Hidden from the active schedule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,

    /// Exercises performed in this workout, in display order
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
}

impl Workout {
    /// Create an empty workout for a date
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: WorkoutId::new(),
            name: name.into(),
            description: None,
            date,
            completed: false,
            progress: None,
            archived: None,
            exercises: Vec::new(),
        }
    }

    /// Total number of sets across all exercise entries
    pub fn set_count(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    /// Append an exercise entry, assigning it the next order slot
    pub fn push_exercise(&mut self, exercise_id: ExerciseId, sets: Vec<ExerciseSet>) -> WorkoutExerciseId {
        let entry = WorkoutExercise {
            id: WorkoutExerciseId::new(),
            exercise_id,
            order: self.exercises.len() as u32,
            sets,
        };
        let id = entry.id;
        self.exercises.push(entry);
        id
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.date)
    }
}

/// One exercise within a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    /// Identifier of the association row
    pub id: WorkoutExerciseId,

    /// The catalog exercise being performed
    pub exercise_id: ExerciseId,

    /// Position within the workout
    #[serde(default)]
    pub order: u32,

    /// Sets, ordered by set number
    #[serde(default)]
    pub sets: Vec<ExerciseSet>,
}

/// A single set of an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    /// 1-based position within the exercise entry
    pub set_number: u32,

    /// Load used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Planned repetitions
    pub target_reps: u32,

    /// Repetitions actually performed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_reps: Option<u32>,

    /// Whether the set was done
    #[serde(default)]
    pub completed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExerciseSet {
    /// A planned, not yet performed set
    pub fn planned(set_number: u32, target_reps: u32, weight: Option<f64>) -> Self {
        Self {
            set_number,
            weight,
            target_reps,
            actual_reps: None,
            completed: false,
            notes: None,
        }
    }

    /// Record the set as done with the given reps
    pub fn complete(&mut self, actual_reps: u32) {
        self.actual_reps = Some(actual_reps);
        self.completed = true;
    }
}
