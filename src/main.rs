use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use ironlog::cli::{handle_backup_command, handle_status_command, BackupCommands};
use ironlog::config::{IronlogPaths, Settings};
use ironlog::logging::init_logging;
use ironlog::storage::Storage;

#[derive(Parser)]
#[command(
    name = "ironlog",
    version,
    about = "Workout log with portable backups",
    long_about = "Ironlog keeps an exercise catalog and workout log on disk and \
                  snapshots them to a backup store you can restore from."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, env = "IRONLOG_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Backup and restore commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Show what is stored locally and the newest backup
    Status,

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet, cli.log_json);

    let paths = IronlogPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&paths, &settings, cmd)?;
        }
        Some(Commands::Status) => {
            let mut storage = Storage::new(paths.clone())?;
            storage.load_all()?;
            handle_status_command(&paths, &settings, &storage)?;
        }
        Some(Commands::Init) => {
            println!("Initializing Ironlog at: {}", paths.base_dir().display());
            let storage = Storage::new(paths.clone())?;
            storage.save_all()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'ironlog backup create' to take your first backup.");
        }
        Some(Commands::Config) => {
            println!("Ironlog Configuration");
            println!("=====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!(
                "Backup store:     {}",
                settings.backup.store_dir(&paths).display()
            );
            println!(
                "Local fallback:   {}",
                settings.backup.fallback_dir(&paths).display()
            );
            println!();
            println!("Settings:");
            println!("  Weight unit:      {:?}", settings.weight_unit);
            println!("  Store read-only:  {}", settings.backup.read_only);
            println!("  Pretty JSON:      {}", settings.backup.pretty_json);
            println!("  Initialized:      {}", paths.is_initialized());
        }
        None => {
            println!("Ironlog - workout log with portable backups");
            println!();
            println!("Run 'ironlog --help' for usage information.");
        }
    }

    Ok(())
}
