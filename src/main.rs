//! SmartGlance - CLI entry point
//!
//! This binary hosts the dashboard core: it loads configuration, builds the
//! layout and settings stores, and runs the persistence synchronizer until
//! interrupted.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use smartglance::config::schema::{BackendKind, Config};
use smartglance::config::{default, loader::ConfigLoader, xdg};
use smartglance::service::DashboardService;
use smartglance::sync::{DashboardBackend, FileBackend, MemoryBackend, Synchronizer};
use smartglance::{logging, SyncError};

/// SmartGlance personal dashboard
#[derive(Parser)]
#[command(name = "smartglance")]
#[command(version, about = "SmartGlance personal dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the smartglance CLI
#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard with background persistence
    Run {
        /// Path to a configuration file (defaults to the XDG location)
        #[arg(long)]
        config: Option<PathBuf>,

        /// User id to sync (overrides `sync.user_id` from the config)
        #[arg(long)]
        user: Option<String>,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, user } => {
            let config = match load_config(config.as_deref()) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Config error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            logging::init(&config.logging);
            run_command(config, user)
        }
        Commands::Config { action } => {
            let result = match action {
                ConfigAction::Init { force } => match default::create_default_config(force) {
                    Ok(path) => {
                        println!("Created configuration at {}", path.display());
                        Ok(())
                    }
                    Err(e) => Err(e),
                },
                ConfigAction::Path => {
                    println!("{}", xdg::config_path().display());
                    Ok(())
                }
                ConfigAction::Validate => match ConfigLoader::load_default() {
                    Ok(config) => {
                        println!("Configuration is valid");
                        println!("{config:#?}");
                        Ok(())
                    }
                    Err(e) => Err(e),
                },
            };
            if let Err(e) = result {
                eprintln!("Config error: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
    }
}

/// Loads configuration from an explicit path or the default XDG location.
fn load_config(path: Option<&std::path::Path>) -> Result<Config, smartglance::config::error::ConfigError> {
    match path {
        Some(p) => ConfigLoader::load_from_path(p),
        None => ConfigLoader::load_default(),
    }
}

/// Builds the runtime, selects the backend, and runs until Ctrl-C.
fn run_command(config: Config, user_override: Option<String>) -> ExitCode {
    let debounce = match config.sync.debounce_duration() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let user_id = user_override.unwrap_or_else(|| config.sync.user_id.clone());

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = rt.block_on(async {
        match config.sync.backend {
            BackendKind::File => {
                let data_dir = if config.sync.data_dir.is_empty() {
                    xdg::data_dir()
                } else {
                    xdg::expand_tilde(&config.sync.data_dir)
                };
                tracing::info!("Using file backend at {}", data_dir.display());
                run_until_shutdown(FileBackend::new(data_dir), debounce, user_id).await
            }
            BackendKind::Memory => {
                tracing::warn!("Using memory backend; dashboard will not persist across restarts");
                run_until_shutdown(MemoryBackend::new(), debounce, user_id).await
            }
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Starts the dashboard service and synchronizer, then waits for Ctrl-C.
///
/// On shutdown, stops the synchronizer so any pending edits are flushed
/// before the process exits.
async fn run_until_shutdown<B: DashboardBackend>(
    backend: B,
    debounce: std::time::Duration,
    user_id: String,
) -> Result<(), SyncError> {
    let service = DashboardService::with_default_layout();
    let mut sync = Synchronizer::with_debounce(
        backend,
        service.layout().clone(),
        service.settings().clone(),
        debounce,
    );
    sync.start(&user_id);
    tracing::info!(user_id = %user_id, "Dashboard running, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await.map_err(|e| SyncError::Io {
        path: PathBuf::from("<signal>"),
        source: e,
    })?;

    tracing::info!("Shutting down");
    sync.stop().await;
    Ok(())
}
