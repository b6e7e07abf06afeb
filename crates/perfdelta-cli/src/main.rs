use anyhow::Result;
use clap::{Parser, Subcommand};
use perfdelta_cli::commands::{self, compare::CompareOptions};
use perfdelta_cli::config::ThresholdArgs;
use perfdelta_cli::OutputFormat;
use perfdelta_core::metrics::Metric;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "perfdelta")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Summarize k6 load-test results and compare runs",
    long_about = "perfdelta normalizes k6 summary JSON (handleSummary or --summary-export output), \
                  checks runs against throughput, latency and error-rate targets, and renders \
                  Markdown, CSV and JSON comparison reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the normalized metrics of one run
    Summary {
        /// Path to the summary JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Write a Markdown report for one run, with targets vs. actuals
    Report {
        /// Path to the summary JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report title
        #[arg(long)]
        title: Option<String>,

        /// Add a line to the Notes section (repeatable)
        #[arg(long = "note", value_name = "TEXT")]
        notes: Vec<String>,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Compare a candidate run against a baseline run
    Compare {
        /// Baseline summary JSON file
        #[arg(value_name = "BASELINE")]
        baseline: PathBuf,

        /// Candidate summary JSON file
        #[arg(value_name = "CANDIDATE")]
        candidate: PathBuf,

        /// Metric to compare (repeatable or comma-separated; default: rps,p95_ms,p99_ms,error_rate_pct)
        #[arg(
            long = "metric",
            value_name = "METRIC",
            value_delimiter = ',',
            value_parser = commands::compare::parse_metric
        )]
        metrics: Vec<Metric>,

        /// Write the Markdown report to this file
        #[arg(long, value_name = "FILE")]
        markdown: Option<PathBuf>,

        /// Write the JSON results to this file
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,

        /// Write the CSV results to this file
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,

        /// Report title
        #[arg(long)]
        title: Option<String>,

        /// Scope line for the report (what differs between the runs)
        #[arg(long)]
        scope: Option<String>,

        /// Add a line to the Notes section (repeatable)
        #[arg(long = "note", value_name = "TEXT")]
        notes: Vec<String>,

        /// Exit with an error when the candidate misses a target
        #[arg(long)]
        fail_on_regression: bool,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);
    tracing::debug!("Output format: {}", cli.format.as_str());

    match cli.command {
        Commands::Summary { file, thresholds } => {
            commands::summary::execute(&file, &thresholds.resolve()?, cli.format)
        }
        Commands::Report {
            file,
            output,
            title,
            notes,
            thresholds,
        } => commands::report::execute(&file, output, title, notes, &thresholds.resolve()?),
        Commands::Compare {
            baseline,
            candidate,
            metrics,
            markdown,
            json,
            csv,
            title,
            scope,
            notes,
            fail_on_regression,
            thresholds,
        } => {
            let options = CompareOptions {
                metrics,
                markdown,
                json,
                csv,
                title,
                scope,
                notes,
                fail_on_regression,
            };
            commands::compare::execute(
                &baseline,
                &candidate,
                &options,
                &thresholds.resolve()?,
                cli.format,
            )
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("perfdelta=debug,perfdelta_cli=debug,perfdelta_core=debug")
    } else {
        EnvFilter::new("perfdelta=info,perfdelta_cli=info,perfdelta_core=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
