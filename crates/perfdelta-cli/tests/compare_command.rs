use perfdelta_cli::OutputFormat;
use perfdelta_cli::commands::compare::{self, CompareOptions};
use perfdelta_core::delta::Delta;
use perfdelta_core::metrics::Metric;
use perfdelta_core::thresholds::Thresholds;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

/// Baseline and cached fixtures use different percentile layouts but compare cleanly
#[test]
fn test_compare_runs_computes_deltas() {
    // Arrange
    let baseline = fixture_path("baseline_summary.json");
    let candidate = fixture_path("cached_summary.json");

    // Act
    let report = compare::compare_runs(&baseline, &candidate, &[]).unwrap();

    // Assert
    assert_eq!(report.baseline.throughput, Some(150.0));
    assert_eq!(report.candidate.throughput, Some(300.0));
    assert_eq!(report.delta_pct.get(Metric::P95Ms), Some(Delta::Change(-50.0)));
    assert_eq!(report.delta_pct.get(Metric::P99Ms), Some(Delta::Change(-50.0)));
    assert_eq!(
        report.delta_pct.get(Metric::ErrorRatePct),
        Some(Delta::Change(-100.0))
    );
    assert_eq!(report.delta_pct.get(Metric::Rps), Some(Delta::Change(100.0)));
}

/// Only the requested metrics are compared, in the requested order
#[test]
fn test_compare_runs_with_selected_metrics() {
    let baseline = fixture_path("baseline_summary.json");
    let candidate = fixture_path("cached_summary.json");

    let report =
        compare::compare_runs(&baseline, &candidate, &[Metric::P50Ms, Metric::P90Ms]).unwrap();

    let metrics: Vec<Metric> = report.delta_pct.metrics().collect();
    assert_eq!(metrics, vec![Metric::P50Ms, Metric::P90Ms]);
    assert_eq!(report.delta_pct.get(Metric::P90Ms), Some(Delta::Change(-50.0)));
}

/// Missing p99 in one run makes that delta not computable
#[test]
fn test_compare_runs_missing_percentile() {
    let baseline = fixture_path("export_summary.json");
    let candidate = fixture_path("cached_summary.json");

    let report = compare::compare_runs(&baseline, &candidate, &[]).unwrap();

    assert_eq!(report.baseline.latency_p99, None);
    assert_eq!(report.delta_pct.get(Metric::P99Ms), Some(Delta::NotComputable));
}

/// Structurally invalid input is rejected with the file name in the error
#[test]
fn test_compare_runs_rejects_non_object_summary() {
    let baseline = fixture_path("not_an_object.json");
    let candidate = fixture_path("cached_summary.json");

    let err = compare::compare_runs(&baseline, &candidate, &[]).unwrap_err();
    let message = format!("{:#}", err);

    assert!(message.contains("not_an_object.json"));
    assert!(message.contains("must be a JSON object"));
}

/// All three artifacts are written, creating missing directories
#[test]
fn test_execute_writes_artifacts() {
    // Arrange
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("results");
    let options = CompareOptions {
        markdown: Some(out.join("report.md")),
        json: Some(out.join("results.json")),
        csv: Some(out.join("results.csv")),
        title: Some("Performance Report — CacheV1".to_string()),
        notes: vec!["Profile: 40 VUs, 20 s".to_string()],
        ..Default::default()
    };

    // Act
    let result = compare::execute(
        &fixture_path("baseline_summary.json"),
        &fixture_path("cached_summary.json"),
        &options,
        &Thresholds::default(),
        OutputFormat::Table,
    );

    // Assert
    assert!(result.is_ok(), "Should compare runs: {:?}", result.err());

    let csv = fs::read_to_string(out.join("results.csv")).unwrap();
    assert!(csv.starts_with("metric,baseline,cached,delta_pct\n"));
    assert!(csv.contains("p95_ms,200.00,100.00,-50.0%\n"));
    assert!(csv.contains("rps,150.00,300.00,100.0%\n"));
    assert!(csv.contains("error_rate_pct,1.00,0.00,-100.0%\n"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("results.json")).unwrap()).unwrap();
    assert_eq!(json["delta_pct"]["p99_ms"], serde_json::json!(-50.0));
    assert_eq!(json["cached"]["total_requests"], serde_json::json!(300));

    let markdown = fs::read_to_string(out.join("report.md")).unwrap();
    assert!(markdown.starts_with("# Performance Report — CacheV1\n"));
    assert!(markdown.contains("| p95 Latency | 200.0 ms | 100.0 ms | -50.0% |"));
    assert!(markdown.contains("- Profile: 40 VUs, 20 s"));
    assert!(markdown.contains("results.csv`"));
}

/// With --fail-on-regression a missed target is an error, but artifacts are still written
#[test]
fn test_execute_fail_on_regression() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("results.csv");
    let options = CompareOptions {
        csv: Some(csv_path.clone()),
        fail_on_regression: true,
        ..Default::default()
    };
    let strict = Thresholds {
        min_rps: Some(1000.0),
        ..Thresholds::default()
    };

    let result = compare::execute(
        &fixture_path("baseline_summary.json"),
        &fixture_path("cached_summary.json"),
        &options,
        &strict,
        OutputFormat::Json,
    );

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("missed 1 of 3 targets"));
    assert!(csv_path.exists());
}

#[test]
fn test_parse_metric() {
    assert_eq!(compare::parse_metric("p99_ms"), Ok(Metric::P99Ms));
    assert!(compare::parse_metric("latency").is_err());
}
