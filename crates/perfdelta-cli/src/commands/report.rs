use super::{load_metrics, write_artifact};
use anyhow::Result;
use perfdelta_core::report::{MarkdownOptions, single_run_markdown};
use perfdelta_core::thresholds::Thresholds;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Render the single-run Markdown report for a summary file
pub fn render(file: &Path, thresholds: &Thresholds, options: &MarkdownOptions) -> Result<String> {
    let metrics = load_metrics(file)?;
    let checks = thresholds.evaluate(&metrics);
    Ok(single_run_markdown(&metrics, &checks, options))
}

pub fn execute(
    file: &Path,
    output: Option<PathBuf>,
    title: Option<String>,
    notes: Vec<String>,
    thresholds: &Thresholds,
) -> Result<()> {
    tracing::info!("Building run report for: {}", file.display());

    let mut options = MarkdownOptions {
        run_at: Some(chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()),
        source: Some(file.display().to_string()),
        notes,
        ..MarkdownOptions::single_run()
    };
    if let Some(title) = title {
        options.title = title;
    }

    let markdown = render(file, thresholds, &options)?;

    if let Some(output_path) = output {
        write_artifact(&output_path, &markdown)?;
    } else {
        tracing::debug!("Writing report to stdout");
        io::stdout().write_all(markdown.as_bytes())?;
    }

    Ok(())
}
