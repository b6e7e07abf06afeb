use crate::metrics::NormalizedMetrics;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Performance targets a run is checked against.
///
/// A `None` target disables that check. Missing keys in a thresholds file
/// keep their default; an explicit `null` disables the check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    /// Throughput must be at least this many requests per second
    pub min_rps: Option<f64>,
    /// p95 latency must be at most this many milliseconds
    pub max_p95_ms: Option<f64>,
    /// Error rate must stay below this percentage
    pub max_error_rate_pct: Option<f64>,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_rps: Some(150.0),
            max_p95_ms: Some(200.0),
            max_error_rate_pct: Some(0.1),
        }
    }
}

impl Thresholds {
    /// Thresholds with every check disabled
    pub fn none() -> Self {
        Self {
            min_rps: None,
            max_p95_ms: None,
            max_error_rate_pct: None,
        }
    }

    /// Load thresholds from a JSON file, layered over the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading thresholds from: {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let thresholds: Thresholds = serde_json::from_str(content)?;
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Every configured target must be a finite, non-negative number
    pub fn validate(&self) -> Result<()> {
        let targets = [
            ("min_rps", self.min_rps),
            ("max_p95_ms", self.max_p95_ms),
            ("max_error_rate_pct", self.max_error_rate_pct),
        ];

        for (name, target) in targets {
            if let Some(value) = target
                && (!value.is_finite() || value < 0.0)
            {
                return Err(Error::InvalidThresholds(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Check `metrics` against every configured target.
    pub fn evaluate(&self, metrics: &NormalizedMetrics) -> Vec<ThresholdCheck> {
        let mut checks = Vec::new();

        if let Some(target) = self.min_rps {
            checks.push(ThresholdCheck::new(
                ThresholdKind::Throughput,
                target,
                metrics.throughput,
            ));
        }
        if let Some(target) = self.max_p95_ms {
            checks.push(ThresholdCheck::new(
                ThresholdKind::P95Latency,
                target,
                metrics.latency_p95,
            ));
        }
        if let Some(target) = self.max_error_rate_pct {
            checks.push(ThresholdCheck::new(
                ThresholdKind::ErrorRate,
                target,
                Some(metrics.error_rate_pct),
            ));
        }

        checks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKind {
    /// actual ≥ target
    Throughput,
    /// actual ≤ target
    P95Latency,
    /// actual < target
    ErrorRate,
}

impl ThresholdKind {
    pub fn label(&self) -> &'static str {
        match self {
            ThresholdKind::Throughput => "Throughput",
            ThresholdKind::P95Latency => "Latency",
            ThresholdKind::ErrorRate => "Error rate",
        }
    }

    pub fn comparator(&self) -> &'static str {
        match self {
            ThresholdKind::Throughput => "≥",
            ThresholdKind::P95Latency => "≤",
            ThresholdKind::ErrorRate => "<",
        }
    }

    fn passes(&self, actual: f64, target: f64) -> bool {
        match self {
            ThresholdKind::Throughput => actual >= target,
            ThresholdKind::P95Latency => actual <= target,
            ThresholdKind::ErrorRate => actual < target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
    /// The run did not report the value
    NotAvailable,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => f.write_str("PASS"),
            Outcome::Fail => f.write_str("FAIL"),
            Outcome::NotAvailable => f.write_str("n/a"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdCheck {
    pub kind: ThresholdKind,
    pub target: f64,
    pub actual: Option<f64>,
    pub outcome: Outcome,
}

impl ThresholdCheck {
    fn new(kind: ThresholdKind, target: f64, actual: Option<f64>) -> Self {
        let outcome = match actual {
            Some(value) if kind.passes(value, target) => Outcome::Pass,
            Some(_) => Outcome::Fail,
            None => Outcome::NotAvailable,
        };
        Self {
            kind,
            target,
            actual,
            outcome,
        }
    }
}

/// True when no check failed. Unavailable values do not count as failures.
pub fn all_passed(checks: &[ThresholdCheck]) -> bool {
    checks.iter().all(|check| check.outcome != Outcome::Fail)
}
