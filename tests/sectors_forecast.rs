use aidgap_report::aggregate_sectors;
use aidgap_report::forecast::{
    clean_iso3, funding_category, is_high_neglect_risk, prepare_forecasts, summarize,
    top_risk_gaps, trajectories, trajectory_countries, ForecastInput, RISK_COLLAPSE_SLOTS,
    RISK_UNDERFUNDED_SLOTS,
};
use aidgap_report::reports::{forecast_gaps, funding_trajectories};
use aidgap_report::sectors::{top_sectors, SectorInput};
use aidgap_report::types::FundingCategory;

fn sector(code: &str, in_need: Option<i64>, targeted: Option<i64>) -> SectorInput {
    SectorInput {
        cluster_code: code.to_string(),
        in_need,
        targeted,
    }
}

fn fc(iso3: &str, year: i32, req: f64, fund: f64) -> ForecastInput {
    ForecastInput {
        iso3: iso3.to_string(),
        year: Some(year),
        predicted_requirements: Some(req),
        predicted_funding: Some(fund),
    }
}

#[test]
fn sectors_get_names_and_coverage() {
    let out = aggregate_sectors(&[
        sector("FSC", Some(1_000), Some(250)),
        sector("XYZ", Some(400), None),
    ]);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].sector_name, "Food Security");
    assert_eq!(out[0].coverage, Some(0.25));
    assert_eq!(out[1].sector_name, "XYZ");
    assert_eq!(out[1].coverage, None);
}

#[test]
fn sectors_without_positive_need_are_dropped() {
    let out = aggregate_sectors(&[
        sector("HEA", Some(0), Some(10)),
        sector("EDU", None, Some(10)),
        sector("NUT", Some(5), Some(10)),
    ]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].cluster_code, "NUT");
    assert_eq!(out[0].coverage, Some(2.0));
}

#[test]
fn negative_sector_targeted_is_unknown() {
    let out = aggregate_sectors(&[sector("WSH", Some(1_000), Some(-40))]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].targeted, None);
    assert_eq!(out[0].coverage, None);
}

#[test]
fn top_sectors_breaks_ties_by_cluster_code() {
    let records = aggregate_sectors(&[
        sector("WSH", Some(500), None),
        sector("EDU", Some(900), None),
        sector("HEA", Some(500), None),
        sector("CCM", Some(500), None),
        sector("LOG", Some(10), None),
    ]);
    let top = top_sectors(&records, 4);
    let codes: Vec<&str> = top.iter().map(|s| s.cluster_code.as_str()).collect();
    assert_eq!(codes, vec!["EDU", "CCM", "HEA", "WSH"]);
    assert!(top_sectors(&[], 10).is_empty());
    assert_eq!(top_sectors(&records, 50).len(), 5);
}

#[test]
fn iso3_codes_are_trimmed_and_truncated() {
    assert_eq!(clean_iso3("  ago_2026 "), "AGO");
    assert_eq!(clean_iso3("cod"), "COD");
    assert_eq!(clean_iso3(""), "");
}

#[test]
fn forecasts_keep_horizon_and_first_duplicate() {
    let out = prepare_forecasts(&[
        fc("AGO ", 2026, 100.0, 40.0),
        fc("AGOx", 2026, 999.0, 1.0),
        fc("AGO", 2025, 100.0, 40.0),
        fc("AGO", 2031, 100.0, 40.0),
        fc("SSD", 2030, 50.0, 60.0),
        ForecastInput {
            predicted_funding: None,
            ..fc("SOM", 2027, 10.0, 1.0)
        },
    ]);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].iso3, "AGO");
    assert_eq!(out[0].country_name, "Angola");
    assert_eq!(out[0].funding_gap, 60.0);
    assert_eq!(out[1].iso3, "SSD");
    assert_eq!(out[1].funding_gap, -10.0);
}

#[test]
fn funding_categories_and_risk() {
    let out = prepare_forecasts(&[
        fc("AAA", 2026, 100.0, -20.0),
        fc("BBB", 2026, 100.0, 0.0),
        fc("CCC", 2026, 100.0, 90.0),
        fc("DDD", 2026, 100.0, 80.0),
        fc("EEE", 2026, 0.0, -5.0),
    ]);
    assert_eq!(funding_category(&out[0]), FundingCategory::FundingCollapse);
    assert_eq!(funding_category(&out[1]), FundingCategory::NoCoverageData);
    assert_eq!(funding_category(&out[2]), FundingCategory::Underfunded);

    assert!(is_high_neglect_risk(&out[0]));
    assert!(is_high_neglect_risk(&out[1]));
    assert!(!is_high_neglect_risk(&out[2]));
    assert!(is_high_neglect_risk(&out[3]));
    assert!(!is_high_neglect_risk(&out[4]));
}

fn risk_fixture() -> Vec<ForecastInput> {
    let mut inputs = Vec::new();
    // Ten collapses, gaps 110..=200.
    for i in 0..10 {
        inputs.push(fc(&format!("N{i:02}"), 2026, 100.0, -10.0 * (i + 1) as f64));
    }
    // Nine underfunded at 20%+ of requirements, gaps 200..=280.
    for i in 0..9 {
        inputs.push(fc(&format!("P{i:02}"), 2026, 1_000.0, 800.0 - 10.0 * i as f64));
    }
    // Largest gaps of all, but no coverage data or a low gap share.
    inputs.push(fc("ZER", 2026, 5_000.0, 0.0));
    inputs.push(fc("LOW", 2026, 1_000_000.0, 900_000.0));
    inputs.push(fc("N00", 2027, 9_000.0, -9_000.0));
    inputs
}

#[test]
fn risk_ranking_splits_collapse_and_underfunded_slots() {
    let out = prepare_forecasts(&risk_fixture());
    let top = top_risk_gaps(&out, 2026, RISK_COLLAPSE_SLOTS, RISK_UNDERFUNDED_SLOTS);
    assert_eq!(top.len(), 15);

    let collapse: Vec<&str> = top
        .iter()
        .filter(|r| funding_category(r) == FundingCategory::FundingCollapse)
        .map(|r| r.iso3.as_str())
        .collect();
    assert_eq!(collapse, vec!["N09", "N08", "N07", "N06", "N05", "N04", "N03", "N02"]);
    let underfunded = top
        .iter()
        .filter(|r| funding_category(r) == FundingCategory::Underfunded)
        .count();
    assert_eq!(underfunded, 7);

    assert!(top.iter().all(|r| r.year == 2026 && is_high_neglect_risk(r)));
    assert!(top.iter().all(|r| r.iso3 != "ZER" && r.iso3 != "LOW"));
    assert_eq!(top[0].iso3, "P08");
    assert!(top.windows(2).all(|w| w[0].funding_gap >= w[1].funding_gap));
}

#[test]
fn risk_ranking_respects_slot_counts_and_year() {
    let out = prepare_forecasts(&risk_fixture());
    let codes: Vec<String> = top_risk_gaps(&out, 2026, 1, 0)
        .into_iter()
        .map(|r| r.iso3)
        .collect();
    assert_eq!(codes, vec!["N09"]);
    assert_eq!(top_risk_gaps(&out, 2027, 8, 7).len(), 1);
    assert!(top_risk_gaps(&out, 2029, 8, 7).is_empty());

    let rows = forecast_gaps(&out, 2026, RISK_COLLAPSE_SLOTS, RISK_UNDERFUNDED_SLOTS);
    assert_eq!(rows.len(), 15);
    assert_eq!(rows[14].rank, 15);
    assert!(rows.iter().all(|r| r.high_neglect_risk == "Yes"));
    assert!(rows.iter().all(|r| r.category != "No Coverage Data"));
}

fn trajectory_fixture() -> Vec<ForecastInput> {
    vec![
        fc("A1", 2026, 100.0, -50.0),
        // A1 would also top the funded group; it is listed once.
        fc("A1", 2027, 100.0, 900e6),
        fc("A2", 2026, 100.0, -300.0),
        fc("A2", 2027, 100.0, -20.0),
        fc("A3", 2026, 100.0, -10.0),
        fc("A4", 2028, 100.0, -200.0),
        fc("A5", 2026, 100.0, -100.0),
        fc("A6", 2026, 100.0, -5.0),
        fc("F1", 2026, 100.0, 150e6),
        fc("F1", 2027, 100.0, 50e6),
        fc("F2", 2026, 100.0, 200e6),
        fc("F2", 2027, 100.0, 200e6),
        fc("F3", 2026, 100.0, 120e6),
        fc("F4", 2030, 100.0, 500e6),
        fc("F5", 2026, 100.0, 110e6),
        fc("F6", 2026, 100.0, 90e6),
    ]
}

#[test]
fn trajectory_picks_deepest_collapses_then_best_funded() {
    let out = prepare_forecasts(&trajectory_fixture());
    assert_eq!(
        trajectory_countries(&out),
        vec!["A2", "A4", "A5", "A1", "A3", "F4", "F2", "F1", "F3"]
    );
    assert!(trajectory_countries(&[]).is_empty());
}

#[test]
fn trajectory_rows_follow_selection_then_year() {
    let out = prepare_forecasts(&trajectory_fixture());
    let rows = trajectories(&out, &["F1".to_string(), "A2".to_string()]);
    let keys: Vec<(&str, i32)> = rows.iter().map(|r| (r.iso3.as_str(), r.year)).collect();
    assert_eq!(keys, vec![("F1", 2026), ("F1", 2027), ("A2", 2026), ("A2", 2027)]);

    let report = funding_trajectories(&out);
    // Nine countries, four of them with two years.
    assert_eq!(report.len(), 13);
    assert_eq!(report[0].iso3, "A2");
    assert_eq!(report[0].category, "Funding Collapse");
}

#[test]
fn forecast_summary_counts_high_risk() {
    let out = prepare_forecasts(&[
        fc("AAA", 2026, 100.0, 50.0),
        fc("AAA", 2027, 100.0, 50.0),
        fc("BBB", 2026, 100.0, 0.0),
        fc("CCC", 2026, 100.0, 95.0),
        fc("DDD", 2026, 100.0, 70.0),
    ]);
    let s = summarize(&out);
    assert_eq!(s.countries_forecasted, 4);
    assert_eq!(s.high_risk_countries, 3);
    assert_eq!(s.high_risk_instances, 4);
    // 2026 high-risk rows with non-zero funding: AAA (50) and DDD (30).
    assert_eq!(s.avg_high_risk_gap, Some(40.0));

    assert_eq!(summarize(&[]).avg_high_risk_gap, None);
}
