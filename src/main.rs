//! library-manager: interactive catalogue and lending manager
//!
//! Loads the library from the data directory, asks a librarian to log in, runs
//! the menu and saves everything on exit.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use library_manager::config;
use library_manager::shell::{SessionEnd, Shell};
use library_manager::store::DataManager;

/// Catalogue, membership and lending manager for a small library.
///
/// Data is kept in books.json, members.json and librarians.json inside the
/// data directory. On first run a default librarian (LIB001 / admin123) is
/// created.
#[derive(Parser, Debug)]
#[command(name = "library-manager")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the JSON data files [default: config's data_dir, else .]
    #[arg(short, long, value_name = "DIR", env = "LIBRARY_MANAGER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for library-manager.
fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    let data_dir = args
        .data_dir
        .or(cfg.data_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %data_dir.display(),
        "Starting library-manager"
    );

    let store = DataManager::new(data_dir);
    let mut library = store
        .load(&cfg.library_name)
        .with_borrow_limit(cfg.lending.max_books_per_member);

    for issue in library.check_consistency() {
        warn!(%issue, "Inconsistent lending data");
    }

    if library.seed_default_librarian() {
        if let Err(e) = store.save(&library) {
            error!(error = %e, "Failed to persist default librarian");
        }
    }

    let stdin = io::stdin();
    let mut shell = Shell::new(&mut library, &store, stdin.lock(), io::stdout());

    match shell.run() {
        Ok(SessionEnd::Exited { saved: true }) => {
            info!("Session ended");
            ExitCode::SUCCESS
        }
        Ok(SessionEnd::Exited { saved: false }) => ExitCode::FAILURE,
        Ok(SessionEnd::NotLoggedIn) => {
            info!("Session ended without login");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "Terminal I/O failed");
            ExitCode::FAILURE
        }
    }
}
