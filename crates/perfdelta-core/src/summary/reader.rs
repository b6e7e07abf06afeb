use super::RawSummary;
use crate::Result;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct SummaryReader;

impl SummaryReader {
    /// Read and parse a summary file from the given path
    pub fn from_file(path: &Path) -> Result<RawSummary> {
        tracing::debug!("Reading summary file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let value: Value = serde_json::from_reader(reader)?;
        let summary = RawSummary::from_value(value)?;

        tracing::info!("Successfully parsed summary file {}", path.display());

        Ok(summary)
    }

    /// Parse a summary from a JSON string
    pub fn from_str(content: &str) -> Result<RawSummary> {
        tracing::debug!("Parsing summary from string");

        let value: Value = serde_json::from_str(content)?;
        RawSummary::from_value(value)
    }
}
