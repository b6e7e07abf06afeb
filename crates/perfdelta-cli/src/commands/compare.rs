use super::summary::print_checks;
use super::{load_metrics, write_artifact};
use crate::OutputFormat;
use anyhow::{Result, bail};
use console::style;
use perfdelta_core::delta::{Delta, DeltaCalculator};
use perfdelta_core::metrics::Metric;
use perfdelta_core::report::{
    ComparisonReport, MarkdownOptions, comparison_csv, comparison_markdown, fmt_delta, fmt_num,
};
use perfdelta_core::thresholds::{Outcome, ThresholdCheck, Thresholds, all_passed};
use std::path::{Path, PathBuf};

/// What to compare and which artifacts to produce
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// Metrics to compare; empty means the default set
    pub metrics: Vec<Metric>,
    pub markdown: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub title: Option<String>,
    pub scope: Option<String>,
    pub notes: Vec<String>,
    /// Error out when the candidate misses a target
    pub fail_on_regression: bool,
}

/// clap value parser for `--metric`
pub fn parse_metric(value: &str) -> std::result::Result<Metric, String> {
    value.parse::<Metric>().map_err(|e| e.to_string())
}

/// Load both runs and compute their deltas
pub fn compare_runs(
    baseline: &Path,
    candidate: &Path,
    metrics: &[Metric],
) -> Result<ComparisonReport> {
    tracing::debug!(
        "Comparing {} against {}",
        candidate.display(),
        baseline.display()
    );

    let calculator = if metrics.is_empty() {
        DeltaCalculator::default()
    } else {
        DeltaCalculator::new(metrics.iter().copied())
    };

    let baseline_metrics = load_metrics(baseline)?;
    let candidate_metrics = load_metrics(candidate)?;

    Ok(ComparisonReport::new(
        baseline_metrics,
        candidate_metrics,
        &calculator,
    ))
}

pub fn execute(
    baseline: &Path,
    candidate: &Path,
    options: &CompareOptions,
    thresholds: &Thresholds,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!(
        "Comparing runs: {} vs {}",
        baseline.display(),
        candidate.display()
    );

    let report = compare_runs(baseline, candidate, &options.metrics)?;
    let checks = thresholds.evaluate(&report.candidate);
    let markdown_options = markdown_options(baseline, candidate, options);

    if let Some(path) = &options.json {
        write_artifact(path, &report.to_json()?)?;
    }
    if let Some(path) = &options.csv {
        write_artifact(path, &comparison_csv(&report))?;
    }
    if let Some(path) = &options.markdown {
        write_artifact(
            path,
            &comparison_markdown(&report, &checks, &markdown_options),
        )?;
    }

    match format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Table => print!("{}", comparison_csv(&report)),
        OutputFormat::Markdown => {
            print!(
                "{}",
                comparison_markdown(&report, &checks, &markdown_options)
            )
        }
        OutputFormat::Pretty => output_pretty(baseline, candidate, &report, &checks),
    }

    if options.fail_on_regression && !all_passed(&checks) {
        let failed = checks
            .iter()
            .filter(|c| c.outcome == Outcome::Fail)
            .count();
        bail!("Candidate run missed {} of {} targets", failed, checks.len());
    }

    Ok(())
}

fn markdown_options(
    baseline: &Path,
    candidate: &Path,
    options: &CompareOptions,
) -> MarkdownOptions {
    let mut artifacts = vec![
        baseline.display().to_string(),
        candidate.display().to_string(),
    ];
    artifacts.extend(
        [&options.json, &options.csv]
            .into_iter()
            .flatten()
            .map(|path| path.display().to_string()),
    );

    let defaults = MarkdownOptions::default();
    MarkdownOptions {
        title: options.title.clone().unwrap_or(defaults.title),
        scope: options.scope.clone(),
        notes: options.notes.clone(),
        artifacts,
        ..defaults
    }
}

fn output_pretty(
    baseline: &Path,
    candidate: &Path,
    report: &ComparisonReport,
    checks: &[ThresholdCheck],
) {
    println!("\n{}", style("Run Comparison").bold().cyan());
    println!("{}", style("==============").cyan());
    println!("  Baseline:  {}", baseline.display());
    println!("  Candidate: {}", candidate.display());

    println!(
        "\n  {:<16} {:>12} {:>12} {:>10}",
        style("Metric").bold(),
        style("Baseline").bold(),
        style("Candidate").bold(),
        style("Δ %").bold()
    );
    for (metric, delta) in report.delta_pct.iter() {
        let change = fmt_delta(delta);
        let change = match delta {
            Delta::Change(pct) if pct == 0.0 => style(change),
            Delta::Change(pct) if (pct > 0.0) == metric.higher_is_better() => {
                style(change).green()
            }
            Delta::Change(_) => style(change).red(),
            Delta::NotComputable => style(change).dim(),
        };
        println!(
            "  {:<16} {:>12} {:>12} {:>10}",
            metric.as_str(),
            fmt_num(report.baseline.get(metric)),
            fmt_num(report.candidate.get(metric)),
            change
        );
    }

    print_checks(checks);
    println!();
}
