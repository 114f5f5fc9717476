use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

#[derive(Debug, Deserialize)]
pub struct RawCountryRow {
    #[serde(rename = "Country ISO3")]
    pub iso3: Option<String>,
    #[serde(rename = "Population")]
    pub population: Option<String>,
    #[serde(rename = "In Need")]
    pub in_need: Option<String>,
    #[serde(rename = "Targeted", default)]
    pub targeted: Option<String>,
    #[serde(rename = "revisedRequirements")]
    pub revised_requirements: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSectorRow {
    #[serde(rename = "Cluster")]
    pub cluster: Option<String>,
    #[serde(rename = "In Need")]
    pub in_need: Option<String>,
    #[serde(rename = "Targeted", default)]
    pub targeted: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawForecastRow {
    #[serde(rename = "iso3")]
    pub iso3: Option<String>,
    #[serde(rename = "year")]
    pub year: Option<String>,
    #[serde(rename = "Predicted_Requirements")]
    pub predicted_requirements: Option<String>,
    #[serde(rename = "Predicted_Funding")]
    pub predicted_funding: Option<String>,
}

/// One country row as read from the summary table. Every numeric field may be
/// absent; completeness is enforced by the deriver, not the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    pub iso3: String,
    pub population: Option<i64>,
    pub in_need: Option<i64>,
    pub targeted: Option<i64>,
    pub revised_requirements: Option<f64>,
}

impl CountryRecord {
    pub fn new(iso3: impl Into<String>) -> Self {
        Self {
            iso3: iso3.into(),
            population: None,
            in_need: None,
            targeted: None,
            revised_requirements: None,
        }
    }
}

/// Need-prevalence band. Variant order is severity order, so `Ord` ranks
/// Low < Medium < High < Critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SeverityQuartile {
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityQuartile {
    pub const ALL: [SeverityQuartile; 4] = [
        SeverityQuartile::Low,
        SeverityQuartile::Medium,
        SeverityQuartile::High,
        SeverityQuartile::Critical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SeverityQuartile::Low => "Low",
            SeverityQuartile::Medium => "Medium",
            SeverityQuartile::High => "High",
            SeverityQuartile::Critical => "Critical",
        }
    }
}

impl fmt::Display for SeverityQuartile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position on the need-vs-budget plane, split at 0.5 on both normalized axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quadrant {
    Overlooked,
    HighNeedHighBudget,
    WellResourced,
    LowNeedLowBudget,
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Quadrant::Overlooked => "Overlooked",
            Quadrant::HighNeedHighBudget => "High Need & High Budget",
            Quadrant::WellResourced => "Well Resourced",
            Quadrant::LowNeedLowBudget => "Low Need & Low Budget",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    #[serde(rename = "Country ISO3")]
    pub iso3: String,
    #[serde(rename = "Country Name")]
    pub country_name: String,
    #[serde(rename = "Population")]
    pub population: i64,
    #[serde(rename = "In Need")]
    pub in_need: i64,
    #[serde(rename = "Targeted")]
    pub targeted: Option<i64>,
    #[serde(rename = "revisedRequirements")]
    pub revised_requirements: f64,
    #[serde(rename = "Need Prevalence")]
    pub need_prevalence: f64,
    #[serde(rename = "Budget per PIN")]
    pub budget_per_pin: f64,
    #[serde(rename = "Normalized Need Prevalence")]
    pub normalized_need_prevalence: f64,
    #[serde(rename = "Normalized Budget per PIN")]
    pub normalized_budget_per_pin: f64,
    #[serde(rename = "Mismatch Score")]
    pub mismatch_score: f64,
    #[serde(rename = "Severity Quartile")]
    pub severity_quartile: SeverityQuartile,
    #[serde(rename = "Quadrant")]
    pub quadrant: Quadrant,
    #[serde(rename = "Targeting Efficiency")]
    pub targeting_efficiency: Option<f64>,
    /// People in need not covered by a targeting commitment, floored at 0.
    /// `None` when the targeted figure is unknown.
    #[serde(rename = "Untargeted")]
    pub untargeted: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectorRecord {
    pub cluster_code: String,
    pub sector_name: String,
    pub in_need: i64,
    pub targeted: Option<i64>,
    pub coverage: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FundingCategory {
    FundingCollapse,
    NoCoverageData,
    Underfunded,
}

impl fmt::Display for FundingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FundingCategory::FundingCollapse => "Funding Collapse",
            FundingCategory::NoCoverageData => "No Coverage Data",
            FundingCategory::Underfunded => "Underfunded",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRecord {
    pub iso3: String,
    pub country_name: String,
    pub year: i32,
    pub predicted_requirements: f64,
    pub predicted_funding: f64,
    pub funding_gap: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MismatchRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "ISO3")]
    #[tabled(rename = "ISO3")]
    pub iso3: String,
    #[serde(rename = "MismatchScore")]
    #[tabled(rename = "MismatchScore")]
    pub mismatch_score: String,
    #[serde(rename = "NeedPrevalence")]
    #[tabled(rename = "NeedPrevalence")]
    pub need_prevalence: String,
    #[serde(rename = "BudgetPerPIN")]
    #[tabled(rename = "BudgetPerPIN")]
    pub budget_per_pin: String,
    #[serde(rename = "Severity")]
    #[tabled(rename = "Severity")]
    pub severity: String,
    #[serde(rename = "TargetingEfficiency")]
    #[tabled(rename = "TargetingEfficiency")]
    pub targeting_efficiency: String,
    #[serde(rename = "Untargeted")]
    #[tabled(rename = "Untargeted")]
    pub untargeted: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SectorCoverageRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Cluster")]
    #[tabled(rename = "Cluster")]
    pub cluster: String,
    #[serde(rename = "Sector")]
    #[tabled(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "InNeed")]
    #[tabled(rename = "InNeed")]
    pub in_need: String,
    #[serde(rename = "Targeted")]
    #[tabled(rename = "Targeted")]
    pub targeted: String,
    #[serde(rename = "Coverage")]
    #[tabled(rename = "Coverage")]
    pub coverage: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ForecastGapRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "PredictedRequirements")]
    #[tabled(rename = "PredictedRequirements")]
    pub predicted_requirements: String,
    #[serde(rename = "PredictedFunding")]
    #[tabled(rename = "PredictedFunding")]
    pub predicted_funding: String,
    #[serde(rename = "FundingGap")]
    #[tabled(rename = "FundingGap")]
    pub funding_gap: String,
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "HighNeglectRisk")]
    #[tabled(rename = "HighNeglectRisk")]
    pub high_neglect_risk: String,
}

/// One country-year of a selected funding trajectory.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TrajectoryRow {
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "ISO3")]
    #[tabled(rename = "ISO3")]
    pub iso3: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "PredictedFunding")]
    #[tabled(rename = "PredictedFunding")]
    pub predicted_funding: String,
    #[serde(rename = "PredictedRequirements")]
    #[tabled(rename = "PredictedRequirements")]
    pub predicted_requirements: String,
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DropCounts {
    pub duplicates: usize,
    pub missing_field: usize,
    pub invalid_value: usize,
}

impl DropCounts {
    pub fn total(&self) -> usize {
        self.duplicates + self.missing_field + self.invalid_value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub countries_analyzed: usize,
    pub critical_count: usize,
    pub max_mismatch: Option<f64>,
    pub most_overlooked: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub countries_forecasted: usize,
    pub high_risk_countries: usize,
    pub high_risk_instances: usize,
    pub avg_high_risk_gap: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub generated_at: DateTime<Utc>,
    pub metrics: MetricsSummary,
    pub dropped: DropCounts,
    pub sectors_ranked: usize,
    pub forecast: Option<ForecastSummary>,
}
