//! Exercise categories
//!
//! A category groups exercises for browsing (e.g. "Chest", "Cardio") and
//! carries the colour used to tag them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// An exercise category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier
    pub id: CategoryId,

    /// Display name
    pub name: String,

    /// Colour tag, usually a hex string like `#ff8800`
    pub color: String,
}

impl Category {
    /// Create a new category with a fresh ID
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            color: color.into(),
        }
    }

    /// Copy the mutable fields of `other` onto this category
    pub fn apply(&mut self, other: &Category) {
        self.name = other.name.clone();
        self.color = other.color.clone();
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
