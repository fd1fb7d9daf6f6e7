//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::IronlogError;
use crate::models::{Category, CategoryId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), IronlogError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = self
            .categories
            .write()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.clear();
        for category in file_data.categories {
            categories.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), IronlogError> {
        let file_data = CategoryData {
            categories: self.get_all()?,
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, IronlogError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.get(&id).cloned())
    }

    /// Get all categories sorted by name
    pub fn get_all(&self) -> Result<Vec<Category>, IronlogError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    /// Check whether a category with this ID exists
    pub fn contains(&self, id: CategoryId) -> Result<bool, IronlogError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.contains_key(&id))
    }

    /// Insert a new category, failing if the ID is already taken
    pub fn insert(&self, category: Category) -> Result<(), IronlogError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if categories.contains_key(&category.id) {
            return Err(IronlogError::Duplicate {
                entity_type: "Category",
                identifier: category.id.to_string(),
            });
        }

        categories.insert(category.id, category);
        Ok(())
    }

    /// Overwrite the mutable fields of an existing category
    pub fn update(&self, category: &Category) -> Result<(), IronlogError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let existing = categories
            .get_mut(&category.id)
            .ok_or_else(|| IronlogError::category_not_found(category.id.to_string()))?;
        existing.apply(category);
        Ok(())
    }

    /// Count categories
    pub fn count(&self) -> Result<usize, IronlogError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| IronlogError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(categories.len())
    }
}
