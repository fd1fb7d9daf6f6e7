//! Exercise catalog entries

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, ExerciseId};

/// An exercise in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Stable identifier
    pub id: ExerciseId,

    /// Exercise name
    pub name: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Category this exercise belongs to
    #[serde(default)]
    pub category: Option<CategoryId>,

    /// Public URL of the exercise illustration
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Exercise {
    /// Create a new uncategorised exercise with a fresh ID
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ExerciseId::new(),
            name: name.into(),
            description: None,
            category: None,
            image_url: None,
        }
    }

    /// Builder-style category assignment
    pub fn in_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    /// Copy the mutable fields of `other` onto this exercise
    pub fn apply(&mut self, other: &Exercise) {
        self.name = other.name.clone();
        self.description = other.description.clone();
        self.category = other.category;
        self.image_url = other.image_url.clone();
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
