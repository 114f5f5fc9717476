// CSV adapters: literal headers in, semantic records out.
//
// Loaders are lenient about individual rows (they are counted and skipped) but
// strict about structure: a table missing a required column is an error.
use crate::error::{ReportError, ReportResult};
use crate::forecast::ForecastInput;
use crate::sectors::SectorInput;
use crate::types::{CountryRecord, RawCountryRow, RawForecastRow, RawSectorRow};
use crate::util::{parse_count_safe, parse_f64_safe, parse_i32_safe};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const COUNTRY_COLUMNS: &[&str] = &["Country ISO3", "Population", "In Need", "revisedRequirements"];
pub const SECTOR_COLUMNS: &[&str] = &["Cluster", "In Need"];
pub const FORECAST_COLUMNS: &[&str] = &["iso3", "year", "Predicted_Requirements", "Predicted_Funding"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub tag_rows: usize,
    pub parse_errors: usize,
}

/// HXL exports carry a hashtag row (`#country+code`, ...) right under the
/// header. Such rows hold no data.
fn is_tag_row(record: &StringRecord) -> bool {
    record
        .iter()
        .map(str::trim)
        .find(|cell| !cell.is_empty())
        .map_or(false, |cell| cell.starts_with('#'))
}

fn check_columns(headers: &StringRecord, required: &[&str], file: &str) -> ReportResult<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReportError::MissingColumns {
            file: file.to_string(),
            columns: missing,
        })
    }
}

/// Read every data row of a CSV into `T`, then hand it to `convert`. Rows that
/// fail to deserialize or that `convert` rejects count as parse errors.
fn read_rows<R, T, U, F>(
    reader: R,
    required: &[&str],
    file: &str,
    mut convert: F,
) -> ReportResult<(Vec<U>, LoadReport)>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(T) -> Option<U>,
{
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    check_columns(&headers, required, file)?;

    let mut report = LoadReport::default();
    let mut out = Vec::new();
    for result in rdr.records() {
        report.total_rows += 1;
        let record = match result {
            Ok(r) => r,
            Err(_) => { report.parse_errors += 1; continue; }
        };
        if is_tag_row(&record) {
            report.tag_rows += 1;
            continue;
        }
        let row: T = match record.deserialize(Some(&headers)) {
            Ok(r) => r,
            Err(_) => { report.parse_errors += 1; continue; }
        };
        match convert(row) {
            Some(v) => out.push(v),
            None => report.parse_errors += 1,
        }
    }
    report.loaded_rows = out.len();
    log::info!(
        "{}: {} rows read, {} loaded, {} tag rows, {} parse errors",
        file,
        report.total_rows,
        report.loaded_rows,
        report.tag_rows,
        report.parse_errors
    );
    Ok((out, report))
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn read_country_records<R: Read>(
    reader: R,
    file: &str,
) -> ReportResult<(Vec<CountryRecord>, LoadReport)> {
    read_rows(reader, COUNTRY_COLUMNS, file, |row: RawCountryRow| {
        Some(CountryRecord {
            iso3: non_empty(row.iso3)?,
            population: parse_count_safe(row.population.as_deref()),
            in_need: parse_count_safe(row.in_need.as_deref()),
            targeted: parse_count_safe(row.targeted.as_deref()),
            revised_requirements: parse_f64_safe(row.revised_requirements.as_deref()),
        })
    })
}

pub fn read_sector_inputs<R: Read>(
    reader: R,
    file: &str,
) -> ReportResult<(Vec<SectorInput>, LoadReport)> {
    read_rows(reader, SECTOR_COLUMNS, file, |row: RawSectorRow| {
        Some(SectorInput {
            cluster_code: non_empty(row.cluster)?,
            in_need: parse_count_safe(row.in_need.as_deref()),
            targeted: parse_count_safe(row.targeted.as_deref()),
        })
    })
}

pub fn read_forecast_inputs<R: Read>(
    reader: R,
    file: &str,
) -> ReportResult<(Vec<ForecastInput>, LoadReport)> {
    read_rows(reader, FORECAST_COLUMNS, file, |row: RawForecastRow| {
        Some(ForecastInput {
            iso3: non_empty(row.iso3)?,
            year: parse_i32_safe(row.year.as_deref()),
            predicted_requirements: parse_f64_safe(row.predicted_requirements.as_deref()),
            predicted_funding: parse_f64_safe(row.predicted_funding.as_deref()),
        })
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn load_country_records(path: &Path) -> ReportResult<(Vec<CountryRecord>, LoadReport)> {
    read_country_records(File::open(path)?, &file_label(path))
}

pub fn load_sector_inputs(path: &Path) -> ReportResult<(Vec<SectorInput>, LoadReport)> {
    read_sector_inputs(File::open(path)?, &file_label(path))
}

pub fn load_forecast_inputs(path: &Path) -> ReportResult<(Vec<ForecastInput>, LoadReport)> {
    read_forecast_inputs(File::open(path)?, &file_label(path))
}
