//! Summarize both logs into the report file

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use sentinel_cli::util::format_size;
use sentinel_cli::Config;
use sentinel_journal::Report;

pub fn run(config: &Config) -> Result<()> {
    let paths = &config.paths;

    // 1. Aggregate (missing logs count as empty)
    let report = Report::from_logs(&paths.metrics_log(), &paths.dir_events_log())?;
    let text = report.render();

    // 2. Overwrite the report artifact
    if let Some(parent) = paths.report_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&paths.report_file, &text)
        .with_context(|| format!("Failed to write {}", paths.report_file.display()))?;

    // 3. Echo
    println!("{}", text);
    println!(
        "{} Report saved to {} {}",
        "✓".green(),
        paths.report_file.display(),
        format!("({})", format_size(text.len() as u64)).dimmed()
    );

    Ok(())
}
