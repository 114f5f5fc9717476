// Country metrics derivation.
//
// Turns raw per-country indicators into the normalized, banded table every
// report reads from. The work is split into passes over an ordered row
// sequence:
//
// 1. `dedup_first`: one row per ISO3, first occurrence wins.
// 2. `retain_complete`: drop rows with missing or non-positive inputs.
// 3. `compute_ratios`: need prevalence and budget per person in need.
// 4. `RatioBounds` and `QuartileCuts`: global statistics of the retained set.
// 5. `classify`: normalize, score and band each row.
//
// Bounds and cut points depend on the whole retained set, so a change to any
// single input row can move every output row. Results are never patched in
// place; callers recompute from the full table.
use crate::lookup::{resolve_name, ISO3_TO_NAME};
use crate::types::{CountryRecord, DerivedMetrics, DropCounts, Quadrant, SeverityQuartile};
use crate::util::{min_max, min_max_scale, quantile_sorted, sort_f64};
use std::collections::HashSet;

/// Output of [`derive`]: the metrics table plus how many input rows were set
/// aside and why.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derivation {
    pub metrics: Vec<DerivedMetrics>,
    pub dropped: DropCounts,
}

/// A row whose required inputs are all present and positive.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteRow {
    pub iso3: String,
    pub population: i64,
    pub in_need: i64,
    pub targeted: Option<i64>,
    pub revised_requirements: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatioRow {
    pub row: CompleteRow,
    pub need_prevalence: f64,
    pub budget_per_pin: f64,
}

/// Why a row was excluded by [`retain_complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingField,
    InvalidValue,
}

pub fn derive(records: &[CountryRecord]) -> Derivation {
    let (unique, duplicates) = dedup_first(records);
    let (complete, rejected) = retain_complete(unique);

    let mut dropped = DropCounts {
        duplicates,
        ..DropCounts::default()
    };
    for r in &rejected {
        match r {
            Rejection::MissingField => dropped.missing_field += 1,
            Rejection::InvalidValue => dropped.invalid_value += 1,
        }
    }

    let ratios = compute_ratios(complete);
    let bounds = RatioBounds::from_rows(&ratios);
    let cuts = QuartileCuts::from_rows(&ratios);
    if let Some(b) = &bounds {
        if b.need_is_degenerate() || b.budget_is_degenerate() {
            log::debug!(
                "derive: zero-width normalization range (need={}, budget={}), using midpoint",
                b.need_is_degenerate(),
                b.budget_is_degenerate()
            );
        }
    }

    let metrics: Vec<DerivedMetrics> = match (bounds, cuts) {
        (Some(bounds), Some(cuts)) => ratios
            .into_iter()
            .map(|r| classify(r, &bounds, &cuts))
            .collect(),
        _ => Vec::new(),
    };

    log::info!(
        "derive: {} rows in, {} retained, {} dropped ({} duplicate, {} missing field, {} invalid value)",
        records.len(),
        metrics.len(),
        dropped.total(),
        dropped.duplicates,
        dropped.missing_field,
        dropped.invalid_value
    );
    Derivation { metrics, dropped }
}

/// Keep the first row seen for each ISO3 code, preserving input order.
/// Returns the surviving rows and the number of later duplicates discarded.
pub fn dedup_first(records: &[CountryRecord]) -> (Vec<&CountryRecord>, usize) {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(records.len());
    let mut duplicates = 0usize;
    for r in records {
        if seen.insert(r.iso3.as_str()) {
            out.push(r);
        } else {
            duplicates += 1;
        }
    }
    (out, duplicates)
}

/// Split rows into complete ones and the reasons the rest were rejected.
/// Rows are dropped outright, never defaulted.
pub fn retain_complete(records: Vec<&CountryRecord>) -> (Vec<CompleteRow>, Vec<Rejection>) {
    let mut kept = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();
    for r in records {
        match check_row(r) {
            Ok(row) => kept.push(row),
            Err(why) => {
                log::debug!("derive: dropping {} ({:?})", r.iso3, why);
                rejected.push(why);
            }
        }
    }
    (kept, rejected)
}

fn check_row(r: &CountryRecord) -> Result<CompleteRow, Rejection> {
    let (Some(population), Some(in_need), Some(revised_requirements)) =
        (r.population, r.in_need, r.revised_requirements)
    else {
        return Err(Rejection::MissingField);
    };
    if population <= 0 || in_need <= 0 || revised_requirements < 0.0 {
        return Err(Rejection::InvalidValue);
    }
    // A negative commitment is unusable, not disqualifying: the row keeps its
    // need and budget metrics and reports targeting as unknown.
    let targeted = match r.targeted {
        Some(t) if t < 0 => {
            log::warn!("{}: negative Targeted {} treated as unknown", r.iso3, t);
            None
        }
        other => other,
    };
    Ok(CompleteRow {
        iso3: r.iso3.clone(),
        population,
        in_need,
        targeted,
        revised_requirements,
    })
}

pub fn compute_ratios(rows: Vec<CompleteRow>) -> Vec<RatioRow> {
    rows.into_iter()
        .map(|row| {
            let need_prevalence = row.in_need as f64 / row.population as f64;
            let budget_per_pin = row.revised_requirements / row.in_need as f64;
            RatioRow {
                row,
                need_prevalence,
                budget_per_pin,
            }
        })
        .collect()
}

/// Min and max of both ratios over the retained set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioBounds {
    pub need: (f64, f64),
    pub budget: (f64, f64),
}

impl RatioBounds {
    pub fn from_rows(rows: &[RatioRow]) -> Option<Self> {
        let need: Vec<f64> = rows.iter().map(|r| r.need_prevalence).collect();
        let budget: Vec<f64> = rows.iter().map(|r| r.budget_per_pin).collect();
        Some(Self {
            need: min_max(&need)?,
            budget: min_max(&budget)?,
        })
    }

    pub fn need_is_degenerate(&self) -> bool {
        self.need.0 == self.need.1
    }

    pub fn budget_is_degenerate(&self) -> bool {
        self.budget.0 == self.budget.1
    }

    pub fn normalize_need(&self, x: f64) -> f64 {
        min_max_scale(x, self.need.0, self.need.1)
    }

    pub fn normalize_budget(&self, x: f64) -> f64 {
        min_max_scale(x, self.budget.0, self.budget.1)
    }
}

/// 25th/50th/75th percentile of need prevalence (linear interpolation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuartileCuts {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

impl QuartileCuts {
    pub fn from_rows(rows: &[RatioRow]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let mut v: Vec<f64> = rows.iter().map(|r| r.need_prevalence).collect();
        sort_f64(&mut v);
        Some(Self {
            q1: quantile_sorted(&v, 0.25),
            q2: quantile_sorted(&v, 0.50),
            q3: quantile_sorted(&v, 0.75),
        })
    }

    /// Inclusive upper bounds, checked from the lowest band up, so coinciding
    /// cut points resolve to the less severe band.
    pub fn band(&self, need_prevalence: f64) -> SeverityQuartile {
        if need_prevalence <= self.q1 {
            SeverityQuartile::Low
        } else if need_prevalence <= self.q2 {
            SeverityQuartile::Medium
        } else if need_prevalence <= self.q3 {
            SeverityQuartile::High
        } else {
            SeverityQuartile::Critical
        }
    }
}

pub fn quadrant(normalized_need: f64, normalized_budget: f64) -> Quadrant {
    match (normalized_need > 0.5, normalized_budget > 0.5) {
        (true, false) => Quadrant::Overlooked,
        (true, true) => Quadrant::HighNeedHighBudget,
        (false, true) => Quadrant::WellResourced,
        (false, false) => Quadrant::LowNeedLowBudget,
    }
}

pub fn classify(r: RatioRow, bounds: &RatioBounds, cuts: &QuartileCuts) -> DerivedMetrics {
    let normalized_need_prevalence = bounds.normalize_need(r.need_prevalence);
    let normalized_budget_per_pin = bounds.normalize_budget(r.budget_per_pin);
    let targeting_efficiency = r.row.targeted.map(|t| t as f64 / r.row.in_need as f64);
    let untargeted = r.row.targeted.map(|t| (r.row.in_need - t).max(0));
    DerivedMetrics {
        country_name: resolve_name(&ISO3_TO_NAME, &r.row.iso3),
        iso3: r.row.iso3,
        population: r.row.population,
        in_need: r.row.in_need,
        targeted: r.row.targeted,
        revised_requirements: r.row.revised_requirements,
        need_prevalence: r.need_prevalence,
        budget_per_pin: r.budget_per_pin,
        normalized_need_prevalence,
        normalized_budget_per_pin,
        mismatch_score: normalized_need_prevalence - normalized_budget_per_pin,
        severity_quartile: cuts.band(r.need_prevalence),
        quadrant: quadrant(normalized_need_prevalence, normalized_budget_per_pin),
        targeting_efficiency,
        untargeted,
    }
}
