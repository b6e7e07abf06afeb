use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid summary structure: {0}")]
    InvalidStructure(String),

    #[error("Unknown metric: {0}")]
    InvalidMetric(String),

    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),
}

pub type Result<T> = std::result::Result<T, Error>;
