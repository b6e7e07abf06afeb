use anyhow::{Context, Result};
use clap::Args;
use perfdelta_core::thresholds::Thresholds;
use std::path::PathBuf;

/// Target configuration shared by every command that checks thresholds.
///
/// Layers, later wins: built-in defaults, `--thresholds` file, individual
/// flags (or their environment variables).
#[derive(Debug, Clone, Default, Args)]
pub struct ThresholdArgs {
    /// JSON file with targets (min_rps, max_p95_ms, max_error_rate_pct)
    #[arg(long = "thresholds", value_name = "FILE")]
    pub thresholds_file: Option<PathBuf>,

    /// Minimum throughput in requests per second
    #[arg(long, env = "PERFDELTA_TARGET_RPS", value_name = "RPS")]
    pub target_rps: Option<f64>,

    /// Maximum p95 latency in milliseconds
    #[arg(long, env = "PERFDELTA_TARGET_P95_MS", value_name = "MS")]
    pub target_p95_ms: Option<f64>,

    /// Error rate must stay below this percentage
    #[arg(long, env = "PERFDELTA_TARGET_ERROR_PCT", value_name = "PCT")]
    pub target_error_pct: Option<f64>,

    /// Do not check any targets
    #[arg(long)]
    pub no_targets: bool,
}

impl ThresholdArgs {
    pub fn resolve(&self) -> Result<Thresholds> {
        if self.no_targets {
            tracing::debug!("Target checks disabled");
            return Ok(Thresholds::none());
        }

        let mut thresholds = match &self.thresholds_file {
            Some(path) => Thresholds::from_file(path)
                .with_context(|| format!("Failed to load thresholds from {}", path.display()))?,
            None => Thresholds::default(),
        };

        if let Some(rps) = self.target_rps {
            thresholds.min_rps = Some(rps);
        }
        if let Some(p95) = self.target_p95_ms {
            thresholds.max_p95_ms = Some(p95);
        }
        if let Some(error) = self.target_error_pct {
            thresholds.max_error_rate_pct = Some(error);
        }

        thresholds.validate()?;
        tracing::debug!("Resolved thresholds: {:?}", thresholds);

        Ok(thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_defaults() {
        let thresholds = ThresholdArgs::default().resolve().unwrap();
        assert_eq!(thresholds, Thresholds::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_rps": 500, "max_p95_ms": 80}}"#).unwrap();

        let args = ThresholdArgs {
            thresholds_file: Some(file.path().to_path_buf()),
            target_p95_ms: Some(120.0),
            ..Default::default()
        };
        let thresholds = args.resolve().unwrap();

        assert_eq!(thresholds.min_rps, Some(500.0));
        assert_eq!(thresholds.max_p95_ms, Some(120.0));
        assert_eq!(thresholds.max_error_rate_pct, Some(0.1));
    }

    #[test]
    fn test_no_targets() {
        let args = ThresholdArgs {
            no_targets: true,
            target_rps: Some(10.0),
            ..Default::default()
        };
        assert_eq!(args.resolve().unwrap(), Thresholds::none());
    }

    #[test]
    fn test_negative_flag_rejected() {
        let args = ThresholdArgs {
            target_error_pct: Some(-1.0),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_missing_file_has_context() {
        let args = ThresholdArgs {
            thresholds_file: Some(PathBuf::from("/nonexistent/targets.json")),
            ..Default::default()
        };
        let err = args.resolve().unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load thresholds"));
    }
}
