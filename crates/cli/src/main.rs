//! Sentinel CLI - sentinel command

use anyhow::Result;
use clap::{Parser, Subcommand};
use sentinel_cli::{logging, Config};
use std::path::PathBuf;
use std::time::Duration;

mod cmd;

/// Sentinel - directory activity and host resource monitor
#[derive(Parser)]
#[command(name = "sentinel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ./sentinel.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the working directories and a default config file
    Init,
    /// Monitor the directory and the host until Ctrl+C
    Start,
    /// Summarize both logs into the report file
    Report,
    /// Create, modify and delete a file in the watched directory
    Trigger {
        /// File name inside the watched directory
        #[arg(long, default_value = cmd::trigger::DEFAULT_TRIGGER_FILE)]
        file: String,
        /// Seconds to wait between steps
        #[arg(long, default_value = "3")]
        delay_secs: u64,
    },
    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    List,
    /// Show which config file is used
    Path,
    /// Print a commented example config
    Example,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    // These work even when the config file is broken
    match cli.command {
        Commands::Config(ConfigCommands::Path) => return cmd::config::run_path(config_path),
        Commands::Config(ConfigCommands::Example) => return cmd::config::run_example(),
        _ => {}
    }

    let config = Config::load(config_path)?;

    // Only long-running monitoring also logs to a file
    let file_log_dir = matches!(cli.command, Commands::Start).then(|| config.paths.log_dir.clone());
    let _guard = logging::init(file_log_dir.as_deref())?;

    match cli.command {
        Commands::Init => cmd::init::run(&config, config_path),
        Commands::Start => cmd::start::run(config).await,
        Commands::Report => cmd::report::run(&config),
        Commands::Trigger { file, delay_secs } => {
            cmd::trigger::run(&config, &file, Duration::from_secs(delay_secs)).await
        }
        Commands::Config(ConfigCommands::List) => cmd::config::run_list(&config, config_path),
        Commands::Config(_) => Ok(()),
    }
}
