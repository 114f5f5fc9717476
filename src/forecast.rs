// Forecast artifact handling.
//
// Predicted requirements and funding come from an external modelling run; this
// module only cleans, categorizes and ranks them.
use crate::lookup::{resolve_name, FORECAST_COUNTRY_NAMES};
use crate::types::{ForecastRecord, ForecastSummary, FundingCategory};
use crate::util::average;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::ops::RangeInclusive;

pub const HORIZON: RangeInclusive<i32> = 2026..=2030;

/// Gap share of requirements above which a country-year is high neglect risk.
pub const HIGH_RISK_GAP_SHARE: f64 = 0.15;

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastInput {
    pub iso3: String,
    pub year: Option<i32>,
    pub predicted_requirements: Option<f64>,
    pub predicted_funding: Option<f64>,
}

/// Upper-cased first three characters of a trimmed code.
pub fn clean_iso3(raw: &str) -> String {
    raw.trim().chars().take(3).collect::<String>().to_uppercase()
}

/// Clean forecast rows: normalize codes, keep the 2026-2030 horizon, require
/// both predictions, and keep the first row per (iso3, year).
///
/// `funding_gap` is always recomputed from the two predictions.
pub fn prepare_forecasts(inputs: &[ForecastInput]) -> Vec<ForecastRecord> {
    let mut seen: HashSet<(String, i32)> = HashSet::new();
    let mut out = Vec::new();
    let mut incomplete = 0usize;
    let mut out_of_horizon = 0usize;
    let mut duplicates = 0usize;

    for f in inputs {
        let iso3 = clean_iso3(&f.iso3);
        let (Some(year), Some(req), Some(fund)) =
            (f.year, f.predicted_requirements, f.predicted_funding)
        else {
            incomplete += 1;
            continue;
        };
        if iso3.is_empty() {
            incomplete += 1;
            continue;
        }
        if !HORIZON.contains(&year) {
            out_of_horizon += 1;
            continue;
        }
        if !seen.insert((iso3.clone(), year)) {
            duplicates += 1;
            continue;
        }
        out.push(ForecastRecord {
            country_name: resolve_name(&FORECAST_COUNTRY_NAMES, &iso3),
            iso3,
            year,
            predicted_requirements: req,
            predicted_funding: fund,
            funding_gap: req - fund,
        });
    }

    log::info!(
        "forecast: {} rows kept ({} incomplete, {} outside {}-{}, {} duplicate)",
        out.len(),
        incomplete,
        out_of_horizon,
        HORIZON.start(),
        HORIZON.end(),
        duplicates
    );
    out
}

pub fn funding_category(r: &ForecastRecord) -> FundingCategory {
    if r.predicted_funding < 0.0 {
        FundingCategory::FundingCollapse
    } else if r.predicted_funding == 0.0 {
        FundingCategory::NoCoverageData
    } else {
        FundingCategory::Underfunded
    }
}

pub fn is_high_neglect_risk(r: &ForecastRecord) -> bool {
    r.predicted_requirements > 0.0
        && r.funding_gap / r.predicted_requirements > HIGH_RISK_GAP_SHARE
}

/// Collapse and underfunded slots in the risk ranking.
pub const RISK_COLLAPSE_SLOTS: usize = 8;
pub const RISK_UNDERFUNDED_SLOTS: usize = 7;

/// Collapse and positive-funding countries followed in the trajectory report.
pub const TRAJECTORY_COLLAPSE_SLOTS: usize = 5;
pub const TRAJECTORY_FUNDED_SLOTS: usize = 4;

/// Only years funded above this count toward a funded trajectory's mean.
pub const TRAJECTORY_FUNDING_FLOOR: f64 = 100e6;

fn gap_order(a: &ForecastRecord, b: &ForecastRecord) -> Ordering {
    b.funding_gap
        .total_cmp(&a.funding_gap)
        .then_with(|| a.iso3.cmp(&b.iso3))
}

/// High-neglect-risk rows for `year`: the `n_collapse` largest gaps with
/// negative funding plus the `n_underfunded` largest with positive funding.
/// Zero-funding rows carry no coverage data and are left out. The combined
/// list is ordered by gap, largest first, ties by ascending ISO3.
pub fn top_risk_gaps(
    records: &[ForecastRecord],
    year: i32,
    n_collapse: usize,
    n_underfunded: usize,
) -> Vec<ForecastRecord> {
    let mut risky: Vec<&ForecastRecord> = records
        .iter()
        .filter(|r| r.year == year && is_high_neglect_risk(r))
        .collect();
    risky.sort_by(|a, b| gap_order(a, b));

    let collapse = risky
        .iter()
        .filter(|r| funding_category(r) == FundingCategory::FundingCollapse)
        .take(n_collapse);
    let underfunded = risky
        .iter()
        .filter(|r| funding_category(r) == FundingCategory::Underfunded)
        .take(n_underfunded);
    let mut out: Vec<ForecastRecord> = collapse.chain(underfunded).map(|r| (*r).clone()).collect();
    out.sort_by(gap_order);
    out
}

/// ISO3 codes whose 2026-2030 funding path is worth following: the countries
/// with the most negative single-year funding, then those with the highest
/// mean funding over years above `TRAJECTORY_FUNDING_FLOOR`. A country picked
/// in the first group is not repeated in the second.
pub fn trajectory_countries(records: &[ForecastRecord]) -> Vec<String> {
    let mut lowest: BTreeMap<&str, f64> = BTreeMap::new();
    let mut funded: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in records {
        if r.predicted_funding < 0.0 {
            let entry = lowest.entry(r.iso3.as_str()).or_insert(r.predicted_funding);
            *entry = entry.min(r.predicted_funding);
        } else if r.predicted_funding > TRAJECTORY_FUNDING_FLOOR {
            funded.entry(r.iso3.as_str()).or_default().push(r.predicted_funding);
        }
    }

    // BTreeMap iteration is ISO3-ordered, so the stable sorts break ties by code.
    let mut collapse: Vec<(&str, f64)> = lowest.into_iter().collect();
    collapse.sort_by(|a, b| a.1.total_cmp(&b.1));
    let mut positive: Vec<(&str, f64)> = funded
        .into_iter()
        .map(|(iso3, values)| (iso3, average(&values)))
        .collect();
    positive.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut selected: Vec<String> = collapse
        .into_iter()
        .take(TRAJECTORY_COLLAPSE_SLOTS)
        .map(|(iso3, _)| iso3.to_string())
        .collect();
    let extra: Vec<String> = positive
        .into_iter()
        .map(|(iso3, _)| iso3.to_string())
        .filter(|iso3| !selected.contains(iso3))
        .take(TRAJECTORY_FUNDED_SLOTS)
        .collect();
    selected.extend(extra);
    selected
}

/// Every row of the selected countries, in selection order then by year.
pub fn trajectories(records: &[ForecastRecord], selected: &[String]) -> Vec<ForecastRecord> {
    let mut rows: Vec<(usize, &ForecastRecord)> = records
        .iter()
        .filter_map(|r| selected.iter().position(|s| *s == r.iso3).map(|pos| (pos, r)))
        .collect();
    rows.sort_by_key(|(pos, r)| (*pos, r.year));
    rows.into_iter().map(|(_, r)| r.clone()).collect()
}

pub fn summarize(records: &[ForecastRecord]) -> ForecastSummary {
    let countries: HashSet<&str> = records.iter().map(|r| r.iso3.as_str()).collect();
    let high_risk: Vec<&ForecastRecord> =
        records.iter().filter(|r| is_high_neglect_risk(r)).collect();
    let high_risk_countries: HashSet<&str> = high_risk.iter().map(|r| r.iso3.as_str()).collect();
    let first_year_gaps: Vec<f64> = high_risk
        .iter()
        .filter(|r| r.year == *HORIZON.start() && r.predicted_funding != 0.0)
        .map(|r| r.funding_gap)
        .collect();
    ForecastSummary {
        countries_forecasted: countries.len(),
        high_risk_countries: high_risk_countries.len(),
        high_risk_instances: high_risk.len(),
        avg_high_risk_gap: if first_year_gaps.is_empty() {
            None
        } else {
            Some(average(&first_year_gaps))
        },
    }
}
