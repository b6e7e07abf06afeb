use super::{ComparisonReport, fmt_delta, fmt_num};
use crate::metrics::{Metric, NormalizedMetrics};

pub const COMPARISON_HEADER: &str = "metric,baseline,cached,delta_pct";

/// One row per compared metric, in comparison order.
pub fn comparison_csv(report: &ComparisonReport) -> String {
    let mut out = String::new();
    out.push_str(COMPARISON_HEADER);
    out.push('\n');

    for (metric, delta) in report.delta_pct.iter() {
        out.push_str(&format!(
            "{},{},{},{}\n",
            metric,
            fmt_num(report.baseline.get(metric)),
            fmt_num(report.candidate.get(metric)),
            fmt_delta(delta)
        ));
    }

    out
}

/// `metric,value` table for a single run.
pub fn metrics_csv(metrics: &NormalizedMetrics) -> String {
    let mut out = String::from("metric,value\n");

    for metric in Metric::ALL {
        let value = match metric {
            Metric::TotalRequests => metrics.total_requests.to_string(),
            _ => fmt_num(metrics.get(metric)),
        };
        out.push_str(&format!("{},{}\n", metric, value));
    }
    out.push_str(&format!("data_sent_kb,{}\n", fmt_num(metrics.data_sent_kb)));
    out.push_str(&format!(
        "data_received_kb,{}\n",
        fmt_num(metrics.data_received_kb)
    ));

    out
}
