//! Ironlog - workout tracker data with portable backups
//!
//! This library holds the data model and local store for an exercise
//! catalog and workout log, plus the engine that snapshots that data to a
//! durable backup store and restores it again.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `logging`: Tracing subscriber setup
//! - `models`: Categories, exercises, workouts and sets
//! - `storage`: JSON file storage and the [`storage::EntityStore`] seam
//! - `backup`: Snapshot build, persist, catalog and restore
//! - `cli`: Command handlers for the `ironlog` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use ironlog::config::{IronlogPaths, Settings};
//!
//! let paths = IronlogPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;

pub use error::IronlogError;
