// Datasets held between menu actions.
//
// A reload replaces everything or nothing: the previous datasets are dropped
// before any table is read, so reports can never be written from a mix of old
// and new inputs, or from inputs whose reload failed.
use crate::aggregate_sectors;
use crate::cache::MetricsCache;
use crate::config::Config;
use crate::error::{ReportError, ReportResult};
use crate::forecast::prepare_forecasts;
use crate::loader::{load_forecast_inputs, load_sector_inputs, LoadReport};
use crate::metrics::Derivation;
use crate::types::{ForecastRecord, SectorRecord};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Datasets {
    pub load_report: LoadReport,
    pub derivation: Derivation,
    pub sectors: Vec<SectorRecord>,
    /// `None` when the forecast artifact is absent.
    pub forecasts: Option<Vec<ForecastRecord>>,
}

/// Missing sector file means an empty sector report, not an error.
pub fn load_sectors(path: &Path) -> ReportResult<Vec<SectorRecord>> {
    if !path.exists() {
        log::warn!("{} not found, sector report will be empty", path.display());
        return Ok(Vec::new());
    }
    let (inputs, _) = load_sector_inputs(path)?;
    Ok(aggregate_sectors(&inputs))
}

pub fn load_forecasts(path: &Path) -> ReportResult<Option<Vec<ForecastRecord>>> {
    if !path.exists() {
        log::warn!("{} not found, skipping forecast report", path.display());
        return Ok(None);
    }
    let (inputs, _) = load_forecast_inputs(path)?;
    Ok(Some(prepare_forecasts(&inputs)))
}

#[derive(Debug, Default)]
pub struct Session {
    cache: MetricsCache,
    data: Option<Datasets>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every table under `cfg.data_dir` and derive the country metrics.
    pub fn reload(&mut self, cfg: &Config) -> ReportResult<&Datasets> {
        self.data = None;
        let cached = self.cache.get_or_derive(&cfg.country_path())?;
        let load_report = cached.load_report.clone();
        let derivation = cached.derivation.clone();
        let sectors = load_sectors(&cfg.sector_path())?;
        let forecasts = load_forecasts(&cfg.forecast_path())?;
        Ok(self.data.insert(Datasets {
            load_report,
            derivation,
            sectors,
            forecasts,
        }))
    }

    pub fn data(&self) -> ReportResult<&Datasets> {
        self.data.as_ref().ok_or(ReportError::NoData)
    }

    pub fn cache(&self) -> &MetricsCache {
        &self.cache
    }
}
