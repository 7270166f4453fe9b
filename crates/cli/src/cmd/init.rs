//! Prepare a working directory for monitoring

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use sentinel_cli::config::{self, Config, DEFAULT_CONFIG_FILE};
use std::path::{Path, PathBuf};

pub fn run(config: &Config, config_path: Option<&Path>) -> Result<()> {
    let paths = &config.paths;

    // 1. Create the watch, log and report directories
    paths.bootstrap()?;

    // 2. Write a default config file unless one is already there
    let target = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let wrote_config = if target.exists() {
        false
    } else {
        std::fs::write(&target, config::example_config())
            .with_context(|| format!("Failed to write {}", target.display()))?;
        true
    };

    println!("{}", "Initialized Sentinel".bold());
    println!();
    println!("  {:<12} {}", "Watching".cyan(), paths.watch_dir.display());
    println!("  {:<12} {}", "Logs".cyan(), paths.log_dir.display());
    println!("  {:<12} {}", "Report".cyan(), paths.report_file.display());
    if wrote_config {
        println!("  {:<12} {} {}", "Config".cyan(), target.display(), "(created)".dimmed());
    } else {
        println!("  {:<12} {} {}", "Config".cyan(), target.display(), "(kept)".dimmed());
    }
    println!();
    println!("Next steps:");
    println!("  - Run 'sentinel start' to begin monitoring");
    println!("  - Run 'sentinel trigger' in another terminal to generate activity");
    println!("  - Run 'sentinel report' to summarize the logs");

    Ok(())
}
