mod csv;
mod markdown;

pub use csv::{COMPARISON_HEADER, comparison_csv, metrics_csv};
pub use markdown::{MarkdownOptions, comparison_markdown, single_run_markdown};

use crate::Result;
use crate::delta::{Delta, DeltaCalculator, DeltaRecord};
use crate::metrics::{Metric, NormalizedMetrics};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Placeholder for absent values and undefined deltas.
pub const NOT_AVAILABLE: &str = "n/a";

/// Machine-readable result of comparing two runs.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub generated_at: String,
    pub baseline: NormalizedMetrics,
    #[serde(rename = "cached")]
    pub candidate: NormalizedMetrics,
    pub delta_pct: DeltaRecord,
}

impl ComparisonReport {
    pub fn new(
        baseline: NormalizedMetrics,
        candidate: NormalizedMetrics,
        calculator: &DeltaCalculator,
    ) -> Self {
        let delta_pct = calculator.compare(&baseline, &candidate);
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            baseline,
            candidate,
            delta_pct,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Structured record for a single run
pub fn metrics_json(metrics: &NormalizedMetrics) -> Result<String> {
    Ok(serde_json::to_string_pretty(metrics)?)
}

/// Two decimals, or the placeholder.
pub fn fmt_num(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.2}", v))
}

pub fn fmt_ms(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.1} ms", v))
}

/// One decimal with a `%` suffix, or the placeholder.
pub fn fmt_delta(delta: Delta) -> String {
    delta
        .percent()
        .map_or_else(|| NOT_AVAILABLE.to_string(), |pct| format!("{:.1}%", pct))
}

/// Report cell for a metric value, with units where they help.
pub(crate) fn fmt_metric(metric: Metric, value: Option<f64>) -> String {
    match metric {
        m if m.is_latency() => fmt_ms(value),
        Metric::ErrorRatePct => {
            value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.2}%", v))
        }
        Metric::TotalRequests => value.map_or_else(
            || NOT_AVAILABLE.to_string(),
            |v| group_thousands(v.max(0.0) as u64),
        ),
        _ => fmt_num(value),
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
