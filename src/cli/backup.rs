//! Backup CLI commands
//!
//! Implements CLI commands for creating, browsing and restoring snapshots.

use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::backup::{
    export_schema, BuildOutcome, LocalObjectStore, PersistOutcome, Reconciler, Snapshot,
    SnapshotBuilder, SnapshotCatalog, SnapshotSink,
};
use crate::config::paths::IronlogPaths;
use crate::config::settings::Settings;
use crate::error::{IronlogError, IronlogResult};
use crate::storage::{EntityStore, Storage};

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot the catalog and workout log into the backup store
    Create,

    /// List snapshots in the backup store, newest first
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Copy a stored snapshot to a local file
    Download {
        /// Path of the snapshot inside the store (use 'latest' for most recent)
        backup: String,

        /// Destination file or directory (defaults to the exports directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show what a snapshot contains
    Info {
        /// Local file, store path, or 'latest'
        backup: String,
    },

    /// Restore from a snapshot, replacing all workouts
    Restore {
        /// Local file, store path, or 'latest'
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Write the storage schema descriptor
    Schema {
        /// Destination file or directory (defaults to the exports directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &IronlogPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> IronlogResult<()> {
    let store = open_store(paths, settings);
    let catalog = SnapshotCatalog::new(&store);

    match cmd {
        BackupCommands::Create => {
            let storage = open_storage(paths)?;
            println!("Creating backup...");
            create_backup(&storage, &store, paths, settings)?;
        }

        BackupCommands::List { verbose } => {
            let backups = catalog.list()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: ironlog backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at);

                if verbose {
                    println!(
                        "{}. {}\n   Path: {}\n   Created: {}\n   Age: {}\n",
                        i + 1,
                        backup.name,
                        backup.path,
                        backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_duration(age),
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago)",
                        i + 1,
                        backup.name,
                        format_duration(age)
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Download { backup, output } => {
            let path = resolve_store_path(&catalog, &backup)?;
            let dest = match output {
                Some(dest) => dest,
                None => {
                    let dir = settings.backup.fallback_dir(paths);
                    std::fs::create_dir_all(&dir)?;
                    dir
                }
            };

            let saved = catalog.download_to(&path, &dest)?;
            println!("Downloaded {} to {}", path, saved.display());
        }

        BackupCommands::Info { backup } => {
            let (source, bytes) = load_backup(&catalog, &backup)?;
            let summary = Snapshot::parse(&bytes)?.inspect();

            println!("Backup Details");
            println!("==============");
            println!("Source: {}", source);
            println!("Size: {}", format_size(bytes.len() as u64));
            match summary.timestamp {
                Some(ts) => println!("Created: {}", ts.format("%Y-%m-%d %H:%M:%S UTC")),
                None => println!("Created: unknown"),
            }
            println!("Format version: {}", display_or_unknown(&summary.version));
            println!(
                "Schema version: {}",
                summary.schema_version.as_deref().unwrap_or("unknown")
            );
            println!();
            println!("Contents:");
            println!("  Categories: {}", summary.category_count);
            println!("  Exercises:  {}", summary.exercise_count);
            println!("  Workouts:   {}", summary.workout_count);
            println!("  Sets:       {}", summary.set_count);
            println!();
            println!(
                "Status: {}",
                if summary.restorable {
                    "Restorable"
                } else {
                    "Newer than this version of ironlog"
                }
            );
        }

        BackupCommands::Restore { backup, force } => {
            let (source, bytes) = load_backup(&catalog, &backup)?;
            let snapshot = Snapshot::parse(&bytes)?;
            let summary = snapshot.inspect();

            println!("Backup Information");
            println!("==================");
            println!("Source: {}", source);
            if let Some(ts) = summary.timestamp {
                println!("Created: {}", ts.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            println!("Contents: {}", summary.summary());
            println!();

            if !force {
                if summary.workout_count > 0 {
                    println!("WARNING: This will replace ALL current workouts!");
                } else {
                    println!("WARNING: This will overwrite matching categories and exercises!");
                }
                println!("To proceed, run again with --force flag:");
                println!("  ironlog backup restore {} --force", backup);
                return Ok(());
            }

            let storage = open_storage(paths)?;

            println!("Creating backup of current data before restore...");
            create_backup(&storage, &store, paths, settings)?;
            println!();

            println!("Restoring from backup...");
            let report = Reconciler::new(&storage).restore_snapshot(&snapshot)?;

            println!("Restore complete!");
            println!("{}", report.summary());

            if report.is_clean() {
                println!("\nAll data has been restored successfully.");
            } else {
                println!(
                    "\n{} item(s) could not be restored:",
                    report.failures.len()
                );
                for failure in &report.failures {
                    println!("  - {}", failure);
                }
            }
        }

        BackupCommands::Schema { output } => {
            let dest = output.unwrap_or_else(|| settings.backup.fallback_dir(paths));
            if output_is_dir(&dest) {
                std::fs::create_dir_all(&dest)?;
            }
            let written = export_schema(&dest)?;
            println!("Schema written to {}", written.display());
        }
    }

    Ok(())
}

/// Open the durable backup store named by the settings
fn open_store(paths: &IronlogPaths, settings: &Settings) -> LocalObjectStore {
    let root = settings.backup.store_dir(paths);
    if settings.backup.read_only {
        LocalObjectStore::read_only(root)
    } else {
        LocalObjectStore::new(root)
    }
}

fn open_storage(paths: &IronlogPaths) -> IronlogResult<Storage> {
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    Ok(storage)
}

/// Build a snapshot and persist it, saving locally if the store refuses
fn create_backup(
    entities: &dyn EntityStore,
    store: &LocalObjectStore,
    paths: &IronlogPaths,
    settings: &Settings,
) -> IronlogResult<()> {
    let snapshot = match SnapshotBuilder::new(entities).build()? {
        BuildOutcome::Built(snapshot) => snapshot,
        BuildOutcome::NothingToBackUp => {
            println!("Nothing to back up: no categories, exercises or workouts yet.");
            return Ok(());
        }
    };

    let pretty = settings.backup.pretty_json;
    let outcome = SnapshotSink::new(store).pretty(pretty).persist(snapshot)?;

    match &outcome {
        PersistOutcome::Stored { path } => {
            println!("Backup created: {}", path);
            println!("Location: {}", store.root().join(path).display());
        }
        PersistOutcome::LocalFallback { .. } => {
            let dir = settings.backup.fallback_dir(paths);
            if let Some(saved) = outcome.save_fallback(&dir, pretty)? {
                println!("Backup store refused the write; saved locally instead.");
                println!("Location: {}", saved.display());
            }
        }
    }

    Ok(())
}

/// Fetch backup bytes from a local file, the store, or the newest stored snapshot
///
/// Returns a label for the source along with the bytes.
fn load_backup(catalog: &SnapshotCatalog<'_>, backup: &str) -> IronlogResult<(String, Vec<u8>)> {
    let local = Path::new(backup);
    if local.is_file() {
        require_json(backup)?;
        let bytes = std::fs::read(local)?;
        return Ok((local.display().to_string(), bytes));
    }

    let path = resolve_store_path(catalog, backup)?;
    require_json(&path)?;
    let bytes = catalog.download(&path)?;
    Ok((format!("store:{}", path), bytes))
}

/// Resolve 'latest' to the newest stored snapshot path
fn resolve_store_path(catalog: &SnapshotCatalog<'_>, backup: &str) -> IronlogResult<String> {
    if backup.eq_ignore_ascii_case("latest") {
        return catalog
            .latest()?
            .map(|entry| entry.path)
            .ok_or_else(|| IronlogError::backup_not_found("latest"));
    }
    Ok(backup.to_string())
}

/// Reject anything that is not a `.json` file before it reaches the engine
fn require_json(name: &str) -> IronlogResult<()> {
    let is_json = Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(())
    } else {
        Err(IronlogError::Validation(format!(
            "Backup must be a .json file: {}",
            name
        )))
    }
}

fn output_is_dir(dest: &Path) -> bool {
    dest.is_dir() || dest.extension().is_none()
}

fn display_or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "unknown"
    } else {
        value
    }
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
