//! Generate synthetic activity in the watched directory
//!
//! Creates a file, appends to it and deletes it, pausing between steps so a
//! running monitor observes CREATED, MODIFIED and DELETED in turn.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use sentinel_cli::util::format_metadata_size;
use sentinel_cli::Config;
use sentinel_core::describe;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// File created when no name is given
pub const DEFAULT_TRIGGER_FILE: &str = "sentinel_trigger.txt";

pub async fn run(config: &Config, file: &str, delay: Duration) -> Result<()> {
    let watch_dir = &config.paths.watch_dir;
    tokio::fs::create_dir_all(watch_dir)
        .await
        .with_context(|| format!("Failed to create {}", watch_dir.display()))?;
    let path = watch_dir.join(file);

    // 1. Create
    tokio::fs::write(&path, b"Initial content.\n")
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;
    println!("{} Created {} ({})", "+".green(), path.display(), format_metadata_size(&describe(&path)));
    pause(delay).await;

    // 2. Modify
    let mut handle = tokio::fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    handle.write_all(b"Modified content.\n").await?;
    handle.flush().await?;
    drop(handle);
    println!("{} Modified {} ({})", "~".yellow(), path.display(), format_metadata_size(&describe(&path)));
    pause(delay).await;

    // 3. Delete
    tokio::fs::remove_file(&path)
        .await
        .with_context(|| format!("Failed to delete {}", path.display()))?;
    println!("{} Deleted {}", "-".red(), path.display());

    Ok(())
}

async fn pause(delay: Duration) {
    if delay.is_zero() {
        return;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Waiting {}s for the monitor...", delay.as_secs()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    tokio::time::sleep(delay).await;
    spinner.finish_and_clear();
}
