use crate::metrics::{Metric, NormalizedMetrics};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Relative change of one metric between two runs.
///
/// `NotComputable` serializes as `null`, so consumers never mistake an
/// undefined delta for a 0% change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Delta {
    /// Signed change in percent
    Change(f64),
    NotComputable,
}

impl Delta {
    /// Percentage change from `old` to `new`.
    ///
    /// Not computable when either side is missing, `old` is exactly zero, or
    /// the ratio overflows to a non-finite value.
    pub fn between(old: Option<f64>, new: Option<f64>) -> Self {
        match (old, new) {
            (Some(old), Some(new)) if old != 0.0 => {
                let pct = (new - old) / old * 100.0;
                if pct.is_finite() {
                    Delta::Change(pct)
                } else {
                    Delta::NotComputable
                }
            }
            _ => Delta::NotComputable,
        }
    }

    pub fn percent(&self) -> Option<f64> {
        match self {
            Delta::Change(pct) => Some(*pct),
            Delta::NotComputable => None,
        }
    }

    pub fn is_computable(&self) -> bool {
        matches!(self, Delta::Change(_))
    }
}

/// Per-metric deltas, in the order the metrics were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeltaRecord {
    entries: Vec<(Metric, Delta)>,
}

impl DeltaRecord {
    pub fn get(&self, metric: Metric) -> Option<Delta> {
        self.entries
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, delta)| *delta)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, Delta)> + '_ {
        self.entries.iter().copied()
    }

    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.entries.iter().map(|(metric, _)| *metric)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for DeltaRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (metric, delta) in &self.entries {
            map.serialize_entry(metric.as_str(), delta)?;
        }
        map.end()
    }
}

/// Computes [`DeltaRecord`]s for a fixed set of metrics.
#[derive(Debug, Clone)]
pub struct DeltaCalculator {
    metrics: Vec<Metric>,
}

impl DeltaCalculator {
    /// Duplicates are dropped, first occurrence wins.
    pub fn new(metrics: impl IntoIterator<Item = Metric>) -> Self {
        let mut unique = Vec::new();
        for metric in metrics {
            if !unique.contains(&metric) {
                unique.push(metric);
            }
        }
        Self { metrics: unique }
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn compare(&self, old: &NormalizedMetrics, new: &NormalizedMetrics) -> DeltaRecord {
        let entries: Vec<_> = self
            .metrics
            .iter()
            .map(|&metric| (metric, Delta::between(old.get(metric), new.get(metric))))
            .collect();

        tracing::debug!(
            "Computed {} deltas ({} not computable)",
            entries.len(),
            entries.iter().filter(|(_, d)| !d.is_computable()).count()
        );

        DeltaRecord { entries }
    }
}

impl Default for DeltaCalculator {
    fn default() -> Self {
        Self::new(Metric::DEFAULT_COMPARISON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(p95: Option<f64>, p99: Option<f64>, error: f64, rps: Option<f64>) -> NormalizedMetrics {
        NormalizedMetrics {
            throughput: rps,
            latency_p95: p95,
            latency_p99: p99,
            error_rate_pct: error,
            ..Default::default()
        }
    }

    #[test]
    fn test_delta_between_values() {
        assert_eq!(Delta::between(Some(200.0), Some(100.0)), Delta::Change(-50.0));
        assert_eq!(Delta::between(Some(150.0), Some(300.0)), Delta::Change(100.0));
        assert_eq!(Delta::between(Some(5.0), Some(5.0)), Delta::Change(0.0));
    }

    #[test]
    fn test_zero_baseline_is_not_computable() {
        for new in [Some(0.0), Some(1.0), Some(-3.5), None] {
            assert_eq!(Delta::between(Some(0.0), new), Delta::NotComputable);
        }
    }

    #[test]
    fn test_overflowing_change_is_not_computable() {
        assert_eq!(Delta::between(Some(1e-310), Some(1.0)), Delta::NotComputable);
        assert_eq!(Delta::between(Some(-1e-310), Some(f64::MAX)), Delta::NotComputable);

        let record = DeltaCalculator::new([Metric::P95Ms]).compare(
            &run(Some(1e-310), None, 0.0, None),
            &run(Some(1.0), None, 0.0, None),
        );
        assert_eq!(record.get(Metric::P95Ms), Some(Delta::NotComputable));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({"p95_ms": null})
        );
    }

    #[test]
    fn test_missing_side_is_not_computable() {
        assert_eq!(Delta::between(None, Some(1.0)), Delta::NotComputable);
        assert_eq!(Delta::between(Some(1.0), None), Delta::NotComputable);
        assert_eq!(Delta::between(None, None), Delta::NotComputable);
    }

    #[test]
    fn test_default_calculator_metrics() {
        let calculator = DeltaCalculator::default();
        assert_eq!(
            calculator.metrics(),
            &[
                Metric::Rps,
                Metric::P95Ms,
                Metric::P99Ms,
                Metric::ErrorRatePct
            ]
        );
    }

    #[test]
    fn test_calculator_drops_duplicates() {
        let calculator = DeltaCalculator::new([Metric::P95Ms, Metric::Rps, Metric::P95Ms]);
        assert_eq!(calculator.metrics(), &[Metric::P95Ms, Metric::Rps]);
    }

    #[test]
    fn test_compare_baseline_and_candidate() {
        let baseline = run(Some(200.0), Some(300.0), 1.0, Some(150.0));
        let candidate = run(Some(100.0), Some(150.0), 0.0, Some(300.0));

        let record = DeltaCalculator::default().compare(&baseline, &candidate);

        assert_eq!(record.len(), 4);
        assert_eq!(record.get(Metric::P95Ms), Some(Delta::Change(-50.0)));
        assert_eq!(record.get(Metric::P99Ms), Some(Delta::Change(-50.0)));
        assert_eq!(record.get(Metric::ErrorRatePct), Some(Delta::Change(-100.0)));
        assert_eq!(record.get(Metric::Rps), Some(Delta::Change(100.0)));
        assert_eq!(record.get(Metric::P50Ms), None);
    }

    #[test]
    fn test_compare_zero_error_baseline() {
        let baseline = run(None, None, 0.0, None);
        let candidate = run(Some(10.0), None, 2.5, Some(10.0));

        let record = DeltaCalculator::default().compare(&baseline, &candidate);

        for (_, delta) in record.iter() {
            assert_eq!(delta, Delta::NotComputable);
        }
    }

    #[test]
    fn test_record_serializes_in_order_with_null_sentinel() {
        let baseline = run(Some(200.0), None, 0.0, Some(150.0));
        let candidate = run(Some(100.0), Some(150.0), 0.0, Some(300.0));

        let record = DeltaCalculator::default().compare(&baseline, &candidate);
        let json = serde_json::to_string(&record).unwrap();

        assert_eq!(
            json,
            r#"{"rps":100.0,"p95_ms":-50.0,"p99_ms":null,"error_rate_pct":null}"#
        );
    }

    #[test]
    fn test_delta_deserializes_null_as_not_computable() {
        let delta: Delta = serde_json::from_str("null").unwrap();
        assert_eq!(delta, Delta::NotComputable);
        let delta: Delta = serde_json::from_str("-12.5").unwrap();
        assert_eq!(delta, Delta::Change(-12.5));
    }
}
