mod extractor;

pub use extractor::MetricsExtractor;

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Flat, fixed-schema view of one load-test run.
///
/// Optional fields stay `None` when the summary does not report them; they
/// are never filled with zero. `error_rate_pct` and `total_requests` always
/// resolve to a value (0 when unreported).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetrics {
    /// Requests per second
    pub throughput: Option<f64>,
    pub latency_p50: Option<f64>,
    pub latency_p90: Option<f64>,
    pub latency_p95: Option<f64>,
    pub latency_p99: Option<f64>,
    /// Failed request share, 0-100
    pub error_rate_pct: f64,
    pub total_requests: u64,
    pub data_sent_kb: Option<f64>,
    pub data_received_kb: Option<f64>,
}

impl NormalizedMetrics {
    /// Value of a comparable metric, `None` when the run did not report it.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Rps => self.throughput,
            Metric::P50Ms => self.latency_p50,
            Metric::P90Ms => self.latency_p90,
            Metric::P95Ms => self.latency_p95,
            Metric::P99Ms => self.latency_p99,
            Metric::ErrorRatePct => Some(self.error_rate_pct),
            Metric::TotalRequests => Some(self.total_requests as f64),
        }
    }
}

/// Metrics that can be compared between two runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "rps")]
    Rps,
    #[serde(rename = "p50_ms")]
    P50Ms,
    #[serde(rename = "p90_ms")]
    P90Ms,
    #[serde(rename = "p95_ms")]
    P95Ms,
    #[serde(rename = "p99_ms")]
    P99Ms,
    #[serde(rename = "error_rate_pct")]
    ErrorRatePct,
    #[serde(rename = "total_requests")]
    TotalRequests,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Rps,
        Metric::P50Ms,
        Metric::P90Ms,
        Metric::P95Ms,
        Metric::P99Ms,
        Metric::ErrorRatePct,
        Metric::TotalRequests,
    ];

    /// Metrics compared when the caller does not choose any.
    pub const DEFAULT_COMPARISON: [Metric; 4] = [
        Metric::Rps,
        Metric::P95Ms,
        Metric::P99Ms,
        Metric::ErrorRatePct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Rps => "rps",
            Metric::P50Ms => "p50_ms",
            Metric::P90Ms => "p90_ms",
            Metric::P95Ms => "p95_ms",
            Metric::P99Ms => "p99_ms",
            Metric::ErrorRatePct => "error_rate_pct",
            Metric::TotalRequests => "total_requests",
        }
    }

    /// Human-readable row label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Rps => "Throughput (RPS)",
            Metric::P50Ms => "p50 Latency",
            Metric::P90Ms => "p90 Latency",
            Metric::P95Ms => "p95 Latency",
            Metric::P99Ms => "p99 Latency",
            Metric::ErrorRatePct => "Error Rate",
            Metric::TotalRequests => "Requests (total)",
        }
    }

    /// Whether an increase is an improvement
    pub fn higher_is_better(&self) -> bool {
        matches!(self, Metric::Rps | Metric::TotalRequests)
    }

    pub fn is_latency(&self) -> bool {
        matches!(
            self,
            Metric::P50Ms | Metric::P90Ms | Metric::P95Ms | Metric::P99Ms
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Metric::ALL
            .into_iter()
            .find(|metric| metric.as_str() == wanted)
            .ok_or_else(|| {
                Error::InvalidMetric(format!(
                    "'{}' (expected one of: {})",
                    s,
                    Metric::ALL.map(|m| m.as_str()).join(", ")
                ))
            })
    }
}
