// Caller-side views over the derived metrics table.
use crate::types::{DerivedMetrics, MetricsSummary, SeverityQuartile};
use std::cmp::Ordering;

/// Highest mismatch first; equal scores ordered by ascending ISO3.
pub fn mismatch_order(a: &DerivedMetrics, b: &DerivedMetrics) -> Ordering {
    b.mismatch_score
        .total_cmp(&a.mismatch_score)
        .then_with(|| a.iso3.cmp(&b.iso3))
}

/// The `n` most overlooked countries. Empty in, empty out.
pub fn top_mismatch(metrics: &[DerivedMetrics], n: usize) -> Vec<DerivedMetrics> {
    let mut sorted = metrics.to_vec();
    sorted.sort_by(mismatch_order);
    sorted.truncate(n);
    sorted
}

pub fn count_by_severity(metrics: &[DerivedMetrics], band: SeverityQuartile) -> usize {
    metrics
        .iter()
        .filter(|m| m.severity_quartile == band)
        .count()
}

pub fn summarize(metrics: &[DerivedMetrics]) -> MetricsSummary {
    let worst = metrics.iter().min_by(|a, b| mismatch_order(a, b));
    MetricsSummary {
        countries_analyzed: metrics.len(),
        critical_count: count_by_severity(metrics, SeverityQuartile::Critical),
        max_mismatch: worst.map(|m| m.mismatch_score),
        most_overlooked: worst.map(|m| m.country_name.clone()),
    }
}
