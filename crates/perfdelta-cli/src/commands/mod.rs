pub mod compare;
pub mod report;
pub mod summary;

use anyhow::{Context, Result};
use perfdelta_core::metrics::{MetricsExtractor, NormalizedMetrics};
use perfdelta_core::summary::SummaryReader;
use std::fs;
use std::path::Path;

/// Read a summary file and normalize it
pub fn load_metrics(file: &Path) -> Result<NormalizedMetrics> {
    let summary = SummaryReader::from_file(file)
        .with_context(|| format!("Failed to load summary {}", file.display()))?;
    Ok(MetricsExtractor::new().extract(&summary))
}

/// Write a report artifact, creating missing parent directories
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}
