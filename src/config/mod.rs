//! Configuration module for Ironlog
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::IronlogPaths;
pub use settings::{BackupSettings, Settings, WeightUnit};
