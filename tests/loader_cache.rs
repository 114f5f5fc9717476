use aidgap_report::cache::{content_key, MetricsCache};
use aidgap_report::config::{Config, COUNTRY_FILE, SECTOR_FILE};
use aidgap_report::loader::{
    load_country_records, read_country_records, read_forecast_inputs, read_sector_inputs,
};
use aidgap_report::output::{render_preview, write_csv, write_json};
use aidgap_report::reports::{generate_summary, mismatch_leaderboard, sector_coverage};
use aidgap_report::session::Session;
use aidgap_report::{aggregate_sectors, derive, ReportError};
use std::fs;

const COUNTRY_CSV: &str = "\
Country ISO3,Population,In Need,Targeted,revisedRequirements
#country+code,#population,#inneed,#targeted,#value+usd
SSD,\"12,000,000\",9000000,5000000,1800000000
YEM,35000000,30000000,,2500000000
SSD,1,1,1,1
HTI,11700000,5500000,3900000,
";

#[test]
fn country_table_skips_tag_rows_and_keeps_blanks_as_missing() {
    let (records, report) = read_country_records(COUNTRY_CSV.as_bytes(), "inline").expect("read");
    assert_eq!(report.total_rows, 5);
    assert_eq!(report.tag_rows, 1);
    assert_eq!(report.parse_errors, 0);
    assert_eq!(records.len(), 4);

    assert_eq!(records[0].iso3, "SSD");
    assert_eq!(records[0].population, Some(12_000_000));
    assert_eq!(records[1].targeted, None);
    assert_eq!(records[3].revised_requirements, None);

    let result = derive(&records);
    let codes: Vec<&str> = result.metrics.iter().map(|m| m.iso3.as_str()).collect();
    assert_eq!(codes, vec!["SSD", "YEM"]);
    assert_eq!(result.dropped.duplicates, 1);
    assert_eq!(result.dropped.missing_field, 1);
}

#[test]
fn missing_required_column_is_an_error() {
    let csv = "Country ISO3,Population,Targeted\nSSD,10,5\n";
    match read_country_records(csv.as_bytes(), "broken.csv") {
        Err(ReportError::MissingColumns { file, columns }) => {
            assert_eq!(file, "broken.csv");
            assert_eq!(columns, vec!["In Need".to_string(), "revisedRequirements".to_string()]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn targeted_column_is_optional() {
    let csv = "Country ISO3,Population,In Need,revisedRequirements\nSSD,10,5,100\n";
    let (records, _) = read_country_records(csv.as_bytes(), "inline").expect("read");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].targeted, None);
}

#[test]
fn headers_are_trimmed_and_rows_without_key_count_as_errors() {
    let csv = " Cluster , In Need ,Targeted\nFSC,1000,400\n,50,5\n";
    let (inputs, report) = read_sector_inputs(csv.as_bytes(), "sectors").expect("read");
    assert_eq!(inputs.len(), 1);
    assert_eq!(report.parse_errors, 1);
    let sectors = aggregate_sectors(&inputs);
    assert_eq!(sectors[0].coverage, Some(0.4));
}

#[test]
fn forecast_table_parses_scientific_notation() {
    let csv = "iso3,year,Predicted_Requirements,Predicted_Funding,Funding_Gap\n\
               AGO,2026,5.6e8,-1.2e8,0\n\
               AGO,2027.0,6e8,1e8,0\n";
    let (inputs, report) = read_forecast_inputs(csv.as_bytes(), "forecast").expect("read");
    assert_eq!(report.loaded_rows, 2);
    assert_eq!(inputs[0].predicted_requirements, Some(5.6e8));
    assert_eq!(inputs[0].predicted_funding, Some(-1.2e8));
    assert_eq!(inputs[1].year, Some(2027));
}

#[test]
fn load_from_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_country_records(&dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, ReportError::Io(_)));
}

#[test]
fn cache_reuses_result_until_content_changes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("country_metrics.csv");
    fs::write(&path, COUNTRY_CSV).expect("write");

    let mut cache = MetricsCache::new();
    let first_key = cache.get_or_derive(&path).expect("derive").key.clone();
    assert_eq!(first_key, content_key(COUNTRY_CSV.as_bytes()));
    assert_eq!(cache.get_or_derive(&path).expect("derive").derivation.metrics.len(), 2);
    assert_eq!((cache.hits(), cache.misses()), (1, 1));

    // Adding one country changes every normalized value, so the entry must go.
    let updated = format!("{COUNTRY_CSV}NGA,220000000,8000000,6000000,1300000000\n");
    fs::write(&path, updated).expect("write");
    let cached = cache.get_or_derive(&path).expect("derive");
    assert_ne!(cached.key, first_key);
    assert_eq!(cached.derivation.metrics.len(), 3);
    assert_eq!((cache.hits(), cache.misses()), (1, 2));

    cache.invalidate();
    assert!(cache.current().is_none());
}

#[test]
fn cache_drops_entry_when_reload_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("country_metrics.csv");
    fs::write(&path, COUNTRY_CSV).expect("write");

    let mut cache = MetricsCache::new();
    cache.get_or_derive(&path).expect("derive");
    fs::write(&path, "Country ISO3\nSSD\n").expect("write");
    assert!(cache.get_or_derive(&path).is_err());
    assert!(cache.current().is_none());
}

const SECTOR_CSV: &str = "Cluster,In Need,Targeted\nFSC,1000,400\n";

#[test]
fn failed_reload_discards_previous_datasets() {
    let dir = tempfile::tempdir().expect("tempdir");
    let country_path = dir.path().join(COUNTRY_FILE);
    let sector_path = dir.path().join(SECTOR_FILE);
    fs::write(&country_path, COUNTRY_CSV).expect("write");
    fs::write(&sector_path, SECTOR_CSV).expect("write");
    let cfg = Config {
        data_dir: dir.path().to_path_buf(),
        out_dir: dir.path().to_path_buf(),
        ..Config::default()
    };

    let mut session = Session::new();
    assert!(matches!(session.data(), Err(ReportError::NoData)));
    let data = session.reload(&cfg).expect("reload");
    assert_eq!(data.derivation.metrics.len(), 2);
    assert_eq!(data.sectors.len(), 1);
    assert!(data.forecasts.is_none());

    // Country table unchanged, sector table broken.
    fs::write(&sector_path, "Sector,Count\nFSC,1\n").expect("write");
    assert!(matches!(session.reload(&cfg), Err(ReportError::MissingColumns { .. })));
    assert!(matches!(session.data(), Err(ReportError::NoData)));
    assert_eq!(session.cache().hits(), 1);

    fs::write(&sector_path, SECTOR_CSV).expect("write");
    session.reload(&cfg).expect("reload");
    assert!(session.data().is_ok());

    fs::write(&country_path, "Country ISO3\nSSD\n").expect("write");
    assert!(session.reload(&cfg).is_err());
    assert!(matches!(session.data(), Err(ReportError::NoData)));
    assert!(session.cache().current().is_none());
}

#[test]
fn reports_render_and_write() {
    let (records, _) = read_country_records(COUNTRY_CSV.as_bytes(), "inline").expect("read");
    let result = derive(&records);
    let board = mismatch_leaderboard(&result.metrics, 10);
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[0].country, "Yemen");
    assert_eq!(board[0].targeting_efficiency, "-");
    assert_eq!(board[0].untargeted, "-");
    assert_eq!(board[1].country, "South Sudan");
    assert_eq!(board[1].untargeted, "4,000,000");

    assert!(mismatch_leaderboard(&[], 10).is_empty());
    assert_eq!(render_preview(&sector_coverage(&[], 10), 3), "(no rows)");
    assert!(render_preview(&board, 1).contains("Yemen"));

    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("country_metrics.csv");
    write_csv(&csv_path, &result.metrics).expect("write csv");
    let written = fs::read_to_string(&csv_path).expect("read back");
    assert!(written.starts_with("Country ISO3,Country Name,"));
    assert!(written.lines().next().is_some_and(|h| h.ends_with(",Untargeted")));
    assert!(written.lines().any(|l| l.starts_with("SSD,") && l.ends_with(",4000000")));
    assert_eq!(written.lines().count(), 3);

    let summary = generate_summary(&result.metrics, &result.dropped, &[], None);
    assert_eq!(summary.metrics.countries_analyzed, 2);
    assert_eq!(summary.metrics.most_overlooked.as_deref(), Some("Yemen"));
    let json_path = dir.path().join("summary.json");
    write_json(&json_path, &summary).expect("write json");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("read back")).expect("parse");
    assert_eq!(json["dropped"]["duplicates"], 1);
    assert!(json["forecast"].is_null());
}
