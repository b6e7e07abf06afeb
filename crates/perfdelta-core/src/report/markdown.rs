use super::{ComparisonReport, NOT_AVAILABLE, fmt_delta, fmt_metric, group_thousands};
use crate::metrics::{Metric, NormalizedMetrics};
use crate::thresholds::{ThresholdCheck, ThresholdKind};

/// Rows every comparison table shows, whether or not they were compared.
const COMPARISON_ROWS: [Metric; 5] = [
    Metric::Rps,
    Metric::P50Ms,
    Metric::P95Ms,
    Metric::P99Ms,
    Metric::ErrorRatePct,
];

/// Free-form parts of a Markdown report.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    pub title: String,
    pub scope: Option<String>,
    pub baseline_label: String,
    pub candidate_label: String,
    /// Shown as the run time of a single-run report
    pub run_at: Option<String>,
    /// Summary file or script the report was built from
    pub source: Option<String>,
    pub notes: Vec<String>,
    pub artifacts: Vec<String>,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            title: "Performance Report".to_string(),
            scope: None,
            baseline_label: "Baseline".to_string(),
            candidate_label: "Cached".to_string(),
            run_at: None,
            source: None,
            notes: Vec::new(),
            artifacts: Vec::new(),
        }
    }
}

impl MarkdownOptions {
    /// Defaults for a report about a single run
    pub fn single_run() -> Self {
        Self {
            title: "Baseline Performance (k6)".to_string(),
            ..Self::default()
        }
    }
}

/// Baseline vs candidate table, targets checked on the candidate, notes.
pub fn comparison_markdown(
    report: &ComparisonReport,
    checks: &[ThresholdCheck],
    options: &MarkdownOptions,
) -> String {
    let mut md = format!("# {}\n\n", options.title);

    md.push_str(&format!("**Generated:** {}  \n", report.generated_at));
    if let Some(scope) = &options.scope {
        md.push_str(&format!("**Scope:** {}  \n", scope));
    }
    md.push('\n');

    md.push_str(&format!(
        "| Metric | {} | {} | Δ % |\n",
        options.baseline_label, options.candidate_label
    ));
    md.push_str("|---|---:|---:|---:|\n");

    let extra = report
        .delta_pct
        .metrics()
        .filter(|metric| !COMPARISON_ROWS.contains(metric));
    for metric in COMPARISON_ROWS.into_iter().chain(extra) {
        let delta = report
            .delta_pct
            .get(metric)
            .map_or_else(|| "—".to_string(), fmt_delta);
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            metric.label(),
            fmt_metric(metric, report.baseline.get(metric)),
            fmt_metric(metric, report.candidate.get(metric)),
            delta
        ));
    }

    if !checks.is_empty() {
        md.push_str(&format!(
            "\n## Targets vs. Actuals ({})\n\n",
            options.candidate_label
        ));
        push_checks(&mut md, checks);
    }

    push_footer(&mut md, options);
    md
}

/// Summary table for one run plus its targets.
pub fn single_run_markdown(
    metrics: &NormalizedMetrics,
    checks: &[ThresholdCheck],
    options: &MarkdownOptions,
) -> String {
    let mut md = format!("# {}\n\n", options.title);

    if let Some(run_at) = &options.run_at {
        md.push_str(&format!("**Run:** {}  \n", run_at));
    }
    if let Some(source) = &options.source {
        md.push_str(&format!("**Source:** `{}`  \n", source));
    }
    if let Some(scope) = &options.scope {
        md.push_str(&format!("**Scope:** {}  \n", scope));
    }

    md.push_str("\n## Summary\n\n");
    md.push_str("| Metric | Value |\n|--|--:|\n");

    let rows = [
        (
            "Requests (total)",
            group_thousands(metrics.total_requests),
        ),
        ("Requests per second (RPS)", fixed(metrics.throughput, 1)),
        ("Error rate (%)", fixed(Some(metrics.error_rate_pct), 3)),
        ("p50 latency (ms)", fixed(metrics.latency_p50, 1)),
        ("p90 latency (ms)", fixed(metrics.latency_p90, 1)),
        ("p95 latency (ms)", fixed(metrics.latency_p95, 1)),
        ("p99 latency (ms)", fixed(metrics.latency_p99, 1)),
        ("Data sent (KB)", fixed(metrics.data_sent_kb, 1)),
        ("Data received (KB)", fixed(metrics.data_received_kb, 1)),
    ];
    for (label, value) in rows {
        md.push_str(&format!("| {} | {} |\n", label, value));
    }

    if !checks.is_empty() {
        md.push_str("\n## Targets vs. Actuals\n\n");
        push_checks(&mut md, checks);
    }

    push_footer(&mut md, options);
    md
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |v| format!("{:.*}", decimals, v),
    )
}

fn push_checks(md: &mut String, checks: &[ThresholdCheck]) {
    for check in checks {
        md.push_str(&threshold_line(check));
        md.push('\n');
    }
}

/// `- **Latency target:** p95 ≤ 200 ms → *actual* **180.7 ms** (PASS)`
fn threshold_line(check: &ThresholdCheck) -> String {
    let (subject, unit, decimals) = match check.kind {
        ThresholdKind::Throughput => ("", " RPS", 1),
        ThresholdKind::P95Latency => ("p95 ", " ms", 1),
        ThresholdKind::ErrorRate => ("", "%", 3),
    };
    let actual = match check.actual {
        Some(value) => format!("{:.*}{}", decimals, value, unit),
        None => NOT_AVAILABLE.to_string(),
    };

    format!(
        "- **{} target:** {}{} {}{} → *actual* **{}** ({})",
        check.kind.label(),
        subject,
        check.kind.comparator(),
        check.target,
        unit,
        actual,
        check.outcome
    )
}

fn push_footer(md: &mut String, options: &MarkdownOptions) {
    if !options.notes.is_empty() {
        md.push_str("\n**Notes**\n");
        for note in &options.notes {
            md.push_str(&format!("- {}\n", note));
        }
    }

    if !options.artifacts.is_empty() {
        md.push_str("\n**Artifacts**\n");
        for artifact in &options.artifacts {
            md.push_str(&format!("- `{}`\n", artifact));
        }
    }
}
