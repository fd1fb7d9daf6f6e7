//! Status command
//!
//! Prints what the local store holds and the newest stored backup.

use crate::backup::{LocalObjectStore, ObjectStore, SnapshotCatalog};
use crate::config::paths::IronlogPaths;
use crate::config::settings::Settings;
use crate::error::IronlogResult;
use crate::models::Workout;
use crate::storage::{EntityStore, Storage};

/// Entity counts for the local store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreCounts {
    pub categories: usize,
    pub exercises: usize,
    pub workouts: usize,
    pub sets: usize,
}

impl StoreCounts {
    pub fn collect(store: &dyn EntityStore) -> IronlogResult<Self> {
        let workouts = store.list_workouts()?;
        Ok(Self {
            categories: store.list_categories()?.len(),
            exercises: store.list_exercises()?.len(),
            sets: workouts.iter().map(Workout::set_count).sum(),
            workouts: workouts.len(),
        })
    }
}

/// Handle the status command
pub fn handle_status_command(
    paths: &IronlogPaths,
    settings: &Settings,
    storage: &Storage,
) -> IronlogResult<()> {
    let counts = StoreCounts::collect(storage)?;

    println!("Ironlog Status");
    println!("==============");
    println!("Categories: {}", counts.categories);
    println!("Exercises:  {}", counts.exercises);
    println!("Workouts:   {}", counts.workouts);
    println!("Sets:       {}", counts.sets);
    println!();

    let store = LocalObjectStore::new(settings.backup.store_dir(paths));
    print_latest_backup(&store)?;

    Ok(())
}

fn print_latest_backup(store: &dyn ObjectStore) -> IronlogResult<()> {
    match SnapshotCatalog::new(store).latest()? {
        Some(entry) => println!(
            "Latest backup: {} ({})",
            entry.name,
            entry.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => println!("Latest backup: none"),
    }
    Ok(())
}
