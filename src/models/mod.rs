//! Core data models for Ironlog
//!
//! This module contains the data structures that make up a user's training
//! history: the exercise catalog (categories and exercises) and the workout
//! log (workouts, exercise entries and sets).

pub mod category;
pub mod exercise;
pub mod ids;
pub mod workout;

pub use category::Category;
pub use exercise::Exercise;
pub use ids::{CategoryId, ExerciseId, SetId, WorkoutExerciseId, WorkoutId};
pub use workout::{ExerciseSet, Workout, WorkoutExercise};
