use super::NormalizedMetrics;
use crate::summary::RawSummary;

const TOTAL_REQUESTS: &[&str] = &["metrics.http_reqs.values.count", "metrics.http_reqs.count"];
const REQUEST_RATE: &[&str] = &["metrics.http_reqs.values.rate", "metrics.http_reqs.rate"];
const FAILURE_RATE: &[&str] = &[
    "metrics.http_req_failed.values.rate",
    "metrics.http_req_failed.value",
];
const DURATION_MS: &[&str] = &["state.testRunDurationMs"];
const DURATION_SECS: &[&str] = &["state.testRunDuration"];
const DATA_SENT: &[&str] = &[
    "metrics.data_sent.values.sum",
    "metrics.data_sent.values.count",
    "metrics.data_sent.count",
];
const DATA_RECEIVED: &[&str] = &[
    "metrics.data_received.values.sum",
    "metrics.data_received.values.count",
    "metrics.data_received.count",
];
/// k6 reports the median as `med` in addition to (or instead of) `p(50)`.
const MEDIAN: &[&str] = &[
    "metrics.http_req_duration.values.med",
    "metrics.http_req_duration.med",
];

const LATENCY: &str = "metrics.http_req_duration";

/// Relative gap between derived and reported throughput worth a warning.
const RATE_MISMATCH_TOLERANCE: f64 = 0.01;

/// Turns a [`RawSummary`] into [`NormalizedMetrics`].
///
/// Every field is resolved from an ordered list of candidate paths, so
/// summaries written by `handleSummary()`, by `--summary-export` and by
/// tools that emit a `percentiles` object all normalize the same way.
#[derive(Debug, Default)]
pub struct MetricsExtractor;

impl MetricsExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, summary: &RawSummary) -> NormalizedMetrics {
        tracing::debug!("Extracting normalized metrics from summary");

        let reported_total = summary.first_count(TOTAL_REQUESTS);
        let throughput = resolve_throughput(summary, reported_total);

        let mut median_paths = percentile_paths(50);
        median_paths.extend(MEDIAN.iter().map(|path| path.to_string()));

        let metrics = NormalizedMetrics {
            throughput,
            latency_p50: summary.first_number(&median_paths),
            latency_p90: summary.first_number(&percentile_paths(90)),
            latency_p95: summary.first_number(&percentile_paths(95)),
            latency_p99: summary.first_number(&percentile_paths(99)),
            error_rate_pct: summary.number_or(FAILURE_RATE, 0.0) * 100.0,
            total_requests: reported_total.unwrap_or(0),
            data_sent_kb: summary.first_number(DATA_SENT).map(|bytes| bytes / 1024.0),
            data_received_kb: summary.first_number(DATA_RECEIVED).map(|bytes| bytes / 1024.0),
        };

        tracing::debug!(
            "Extraction complete: total={}, rps={:?}, p95={:?}, errors={:.3}%",
            metrics.total_requests,
            metrics.throughput,
            metrics.latency_p95,
            metrics.error_rate_pct
        );

        metrics
    }
}

/// Candidate paths for a latency percentile, highest priority first.
fn percentile_paths(rank: u8) -> Vec<String> {
    vec![
        format!("{LATENCY}.values.p({rank})"),
        format!("{LATENCY}.percentiles.{rank}"),
        format!("{LATENCY}.p({rank})"),
    ]
}

/// Run duration in milliseconds. Non-positive durations are ignored.
fn resolve_duration_ms(summary: &RawSummary) -> Option<f64> {
    summary
        .first_number(DURATION_MS)
        .filter(|ms| *ms > 0.0)
        .or_else(|| {
            summary
                .first_number(DURATION_SECS)
                .filter(|secs| *secs > 0.0)
                .map(|secs| secs * 1000.0)
        })
}

/// Derived throughput (total / duration) wins over the reported rate.
fn resolve_throughput(summary: &RawSummary, total: Option<u64>) -> Option<f64> {
    let reported = summary.first_number(REQUEST_RATE);

    let (Some(total), Some(duration_ms)) = (total, resolve_duration_ms(summary)) else {
        return reported;
    };

    let derived = total as f64 / (duration_ms / 1000.0);
    if let Some(rate) = reported
        && (derived - rate).abs() > rate.abs() * RATE_MISMATCH_TOLERANCE
    {
        tracing::warn!(
            "Reported request rate {:.2}/s disagrees with {} requests over {:.0} ms ({:.2}/s), using the derived value",
            rate,
            total,
            duration_ms,
            derived
        );
    }

    Some(derived)
}
