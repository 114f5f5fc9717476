use crate::forecast::{
    funding_category, is_high_neglect_risk, top_risk_gaps, trajectories, trajectory_countries,
};
use crate::rankings::top_mismatch;
use crate::sectors::top_sectors;
use crate::types::{
    DerivedMetrics, DropCounts, ForecastGapRow, ForecastRecord, MismatchRow, SectorCoverageRow,
    SectorRecord, SummaryStats, TrajectoryRow,
};
use crate::util::{format_int, format_number, format_opt, format_pct};
use chrono::Utc;

pub fn mismatch_leaderboard(metrics: &[DerivedMetrics], n: usize) -> Vec<MismatchRow> {
    top_mismatch(metrics, n)
        .into_iter()
        .enumerate()
        .map(|(idx, m)| MismatchRow {
            rank: idx + 1,
            country: m.country_name,
            iso3: m.iso3,
            mismatch_score: format_number(m.mismatch_score, 3),
            need_prevalence: format_pct(m.need_prevalence),
            budget_per_pin: format_number(m.budget_per_pin, 2),
            severity: m.severity_quartile.to_string(),
            targeting_efficiency: format_opt(m.targeting_efficiency, format_pct),
            untargeted: format_opt(m.untargeted, format_int),
        })
        .collect()
}

pub fn sector_coverage(sectors: &[SectorRecord], n: usize) -> Vec<SectorCoverageRow> {
    top_sectors(sectors, n)
        .into_iter()
        .enumerate()
        .map(|(idx, s)| SectorCoverageRow {
            rank: idx + 1,
            cluster: s.cluster_code,
            sector: s.sector_name,
            in_need: format_int(s.in_need),
            targeted: format_opt(s.targeted, format_int),
            coverage: format_opt(s.coverage, format_pct),
        })
        .collect()
}

pub fn forecast_gaps(
    forecasts: &[ForecastRecord],
    year: i32,
    n_collapse: usize,
    n_underfunded: usize,
) -> Vec<ForecastGapRow> {
    top_risk_gaps(forecasts, year, n_collapse, n_underfunded)
        .into_iter()
        .enumerate()
        .map(|(idx, f)| ForecastGapRow {
            rank: idx + 1,
            category: funding_category(&f).to_string(),
            high_neglect_risk: if is_high_neglect_risk(&f) { "Yes" } else { "No" }.to_string(),
            country: f.country_name,
            year: f.year,
            predicted_requirements: format_number(f.predicted_requirements, 0),
            predicted_funding: format_number(f.predicted_funding, 0),
            funding_gap: format_number(f.funding_gap, 0),
        })
        .collect()
}

pub fn funding_trajectories(forecasts: &[ForecastRecord]) -> Vec<TrajectoryRow> {
    let selected = trajectory_countries(forecasts);
    trajectories(forecasts, &selected)
        .into_iter()
        .map(|f| TrajectoryRow {
            category: funding_category(&f).to_string(),
            country: f.country_name,
            iso3: f.iso3,
            year: f.year,
            predicted_funding: format_number(f.predicted_funding, 0),
            predicted_requirements: format_number(f.predicted_requirements, 0),
        })
        .collect()
}

pub fn generate_summary(
    metrics: &[DerivedMetrics],
    dropped: &DropCounts,
    sectors: &[SectorRecord],
    forecasts: Option<&[ForecastRecord]>,
) -> SummaryStats {
    SummaryStats {
        generated_at: Utc::now(),
        metrics: crate::rankings::summarize(metrics),
        dropped: dropped.clone(),
        sectors_ranked: sectors.len(),
        forecast: forecasts.map(crate::forecast::summarize),
    }
}
