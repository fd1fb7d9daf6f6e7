//! Path management for Ironlog
//!
//! Provides XDG-compliant path resolution for configuration, data, and backups.
//!
//! ## Path Resolution Order
//!
//! 1. `IRONLOG_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/ironlog` or `~/.config/ironlog`
//! 3. Windows: `%APPDATA%\ironlog`

use std::path::PathBuf;

use crate::error::IronlogError;

/// Manages all paths used by Ironlog
#[derive(Debug, Clone)]
pub struct IronlogPaths {
    /// Base directory for all Ironlog data
    base_dir: PathBuf,
}

impl IronlogPaths {
    /// Create a new IronlogPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, IronlogError> {
        let base_dir = if let Ok(custom) = std::env::var("IRONLOG_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create IronlogPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/ironlog/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/ironlog/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default root of the durable backup store (~/.config/ironlog/backups/)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Where local fallback backups and downloads land (~/.config/ironlog/exports/)
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to categories.json
    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// Get the path to exercises.json
    pub fn exercises_file(&self) -> PathBuf {
        self.data_dir().join("exercises.json")
    }

    /// Get the path to workouts.json (workouts, their exercise entries and sets)
    pub fn workouts_file(&self) -> PathBuf {
        self.data_dir().join("workouts.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), IronlogError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| IronlogError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| IronlogError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| IronlogError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if Ironlog has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, IronlogError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("ironlog"));
    }

    let base = directories::BaseDirs::new()
        .ok_or_else(|| IronlogError::Config("Could not determine home directory".into()))?;
    Ok(base.home_dir().join(".config").join("ironlog"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, IronlogError> {
    // Windows: roaming APPDATA
    let base = directories::BaseDirs::new()
        .ok_or_else(|| IronlogError::Config("Could not determine APPDATA directory".into()))?;
    Ok(base.config_dir().join("ironlog"))
}
