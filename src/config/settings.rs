//! User settings for Ironlog
//!
//! Manages user preferences including display units and where backups are
//! stored.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::IronlogPaths;
use crate::error::IronlogError;

/// Unit used when printing set weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

/// Backup location and format settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSettings {
    /// Root of the durable backup store (defaults to `<base>/backups`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,

    /// Treat the backup store as read-only for this user
    #[serde(default)]
    pub read_only: bool,

    /// Where local fallback files and downloads are written (defaults to `<base>/exports`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_dir: Option<PathBuf>,

    /// Pretty-print snapshot JSON
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            store_dir: None,
            read_only: false,
            fallback_dir: None,
            pretty_json: default_pretty_json(),
        }
    }
}

impl BackupSettings {
    /// Resolve the durable store root
    pub fn store_dir(&self, paths: &IronlogPaths) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(|| paths.backup_dir())
    }

    /// Resolve the local fallback directory
    pub fn fallback_dir(&self, paths: &IronlogPaths) -> PathBuf {
        self.fallback_dir
            .clone()
            .unwrap_or_else(|| paths.export_dir())
    }
}

/// User settings for Ironlog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Unit for displaying weights
    #[serde(default)]
    pub weight_unit: WeightUnit,

    /// Backup settings
    #[serde(default)]
    pub backup: BackupSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_pretty_json() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            weight_unit: WeightUnit::default(),
            backup: BackupSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &IronlogPaths) -> Result<Self, IronlogError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| IronlogError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                IronlogError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &IronlogPaths) -> Result<(), IronlogError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| IronlogError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| IronlogError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
