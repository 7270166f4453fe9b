//! Configuration inspection command

use anyhow::Result;
use owo_colors::OwoColorize;
use sentinel_cli::config::{self, Config, DEFAULT_CONFIG_FILE};
use std::path::Path;

/// Print the effective configuration
pub fn run_list(config: &Config, config_path: Option<&Path>) -> Result<()> {
    println!("{}", "Effective Configuration".bold());
    match config::resolve_path(config_path) {
        Some(path) => println!("{}: {}\n", "Source".dimmed(), path.display().dimmed()),
        None => println!("{}: {}\n", "Source".dimmed(), "built-in defaults".dimmed()),
    }

    println!("{}", "[paths]".yellow());
    println!("  {} = {}", "watch_dir".cyan(), config.paths.watch_dir.display());
    println!("  {} = {}", "log_dir".cyan(), config.paths.log_dir.display());
    println!("  {} = {}", "report_file".cyan(), config.paths.report_file.display());

    println!("\n{}", "[intervals]".yellow());
    println!(
        "  {} = {} {}",
        "directory_ms".cyan(),
        config.intervals.directory_ms,
        format!("({:?})", config.intervals.directory()).dimmed()
    );
    println!(
        "  {} = {} {}",
        "metrics_ms".cyan(),
        config.intervals.metrics_ms,
        format!("({:?})", config.intervals.metrics()).dimmed()
    );

    println!("\n{}", "[sampler]".yellow());
    println!("  {} = {}", "cpu_window_ms".cyan(), config.sampler.cpu_window_ms);
    println!("  {} = {}", "top_processes".cyan(), config.sampler.top_processes);
    println!("  {} = {}", "disk_mount".cyan(), config.sampler.disk_mount.display());

    println!("\n{}", "[journal]".yellow());
    println!("  {} = {}", "on_write_error".cyan(), config.journal.on_write_error.as_str());

    println!("\n{}", "Valid Ranges:".bold());
    println!("  directory_ms, metrics_ms: 10-3,600,000");
    println!("  cpu_window_ms: 0-60,000 (and below metrics_ms)");
    println!("  top_processes: 0-50");
    println!("  on_write_error: skip | abort");

    Ok(())
}

/// Show which config file would be loaded
pub fn run_path(config_path: Option<&Path>) -> Result<()> {
    match config::resolve_path(config_path) {
        Some(path) if path.exists() => println!("{}", path.display()),
        Some(path) => {
            println!("{}", path.display());
            println!("{}", "File does not exist.".yellow());
        }
        None => {
            println!("{}", DEFAULT_CONFIG_FILE);
            println!(
                "{}",
                "File does not exist; using built-in defaults. Run 'sentinel init' to create it."
                    .yellow()
            );
        }
    }

    Ok(())
}

/// Show example configuration
pub fn run_example() -> Result<()> {
    println!("{}", config::example_config());
    Ok(())
}
