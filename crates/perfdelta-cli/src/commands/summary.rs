use super::load_metrics;
use crate::OutputFormat;
use anyhow::Result;
use console::style;
use perfdelta_core::metrics::NormalizedMetrics;
use perfdelta_core::report::{
    self, MarkdownOptions, fmt_ms, fmt_num, group_thousands, metrics_csv, single_run_markdown,
};
use perfdelta_core::thresholds::{Outcome, ThresholdCheck, Thresholds};
use std::path::Path;

/// Normalize one load-test summary file
pub fn summarize(file: &Path) -> Result<NormalizedMetrics> {
    tracing::debug!("Summarizing run from: {}", file.display());
    load_metrics(file)
}

pub fn execute(file: &Path, thresholds: &Thresholds, format: OutputFormat) -> Result<()> {
    tracing::info!("Summarizing load-test run: {}", file.display());

    let metrics = summarize(file)?;
    let checks = thresholds.evaluate(&metrics);

    match format {
        OutputFormat::Json => output_json(&metrics)?,
        OutputFormat::Table => print!("{}", metrics_csv(&metrics)),
        OutputFormat::Markdown => {
            let options = MarkdownOptions {
                source: Some(file.display().to_string()),
                ..MarkdownOptions::single_run()
            };
            print!("{}", single_run_markdown(&metrics, &checks, &options));
        }
        OutputFormat::Pretty => output_pretty(file, &metrics, &checks),
    }

    Ok(())
}

fn output_json(metrics: &NormalizedMetrics) -> Result<()> {
    println!("{}", report::metrics_json(metrics)?);
    Ok(())
}

fn output_pretty(file: &Path, metrics: &NormalizedMetrics, checks: &[ThresholdCheck]) {
    println!("\n{}", style("Load Test Summary").bold().cyan());
    println!("{}", style("=================").cyan());
    println!("  File: {}", file.display());

    println!("\n{}", style("Traffic:").bold());
    println!(
        "  Requests:           {}",
        group_thousands(metrics.total_requests)
    );
    println!("  Throughput:         {} req/s", fmt_num(metrics.throughput));
    println!("  Error Rate:         {:.3}%", metrics.error_rate_pct);

    println!("\n{}", style("Latency:").bold());
    println!("  p50:                {}", fmt_ms(metrics.latency_p50));
    println!("  p90:                {}", fmt_ms(metrics.latency_p90));
    println!("  p95:                {}", fmt_ms(metrics.latency_p95));
    println!("  p99:                {}", fmt_ms(metrics.latency_p99));

    if metrics.data_sent_kb.is_some() || metrics.data_received_kb.is_some() {
        println!("\n{}", style("Data:").bold());
        println!("  Sent:               {} KB", fmt_num(metrics.data_sent_kb));
        println!("  Received:           {} KB", fmt_num(metrics.data_received_kb));
    }

    print_checks(checks);
    println!();
}

/// Styled target results, shared with `compare`
pub(crate) fn print_checks(checks: &[ThresholdCheck]) {
    if checks.is_empty() {
        return;
    }

    println!("\n{}", style("Targets:").bold());
    for check in checks {
        let outcome = match check.outcome {
            Outcome::Pass => style(check.outcome.to_string()).green(),
            Outcome::Fail => style(check.outcome.to_string()).red().bold(),
            Outcome::NotAvailable => style(check.outcome.to_string()).dim(),
        };
        let actual = check
            .actual
            .map_or_else(|| report::NOT_AVAILABLE.to_string(), |v| format!("{:.3}", v));
        println!(
            "  [{}] {} {} {} (actual {})",
            outcome,
            check.kind.label(),
            check.kind.comparator(),
            check.target,
            actual
        );
    }
}
