//! Run both monitors in the foreground

use anyhow::Result;
use owo_colors::OwoColorize;
use sentinel_cli::{Config, Runner};

pub async fn run(config: Config) -> Result<()> {
    let paths = &config.paths;

    println!("{}", "Sentinel monitoring started".green().bold());
    println!("  {:<14} {}", "Directory".cyan(), paths.watch_dir.display());
    println!("  {:<14} {}", "Event log".cyan(), paths.dir_events_log().display());
    println!("  {:<14} {}", "Metrics log".cyan(), paths.metrics_log().display());
    println!("  {:<14} {}", "App log".cyan(), paths.app_log().display());
    println!("{}", "Press Ctrl+C to stop".dimmed());

    Runner::new(config).run_until_ctrl_c().await?;

    println!("{}", "Monitoring stopped. Run 'sentinel report' for a summary.".yellow());
    Ok(())
}
