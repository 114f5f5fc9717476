use std::env;
use std::path::PathBuf;

pub const COUNTRY_FILE: &str = "country_metrics.csv";
pub const SECTOR_FILE: &str = "sector_benchmarking.csv";
pub const FORECAST_FILE: &str = "forecast_results_2026_2030.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub top_n: usize,
    pub preview_rows: usize,
    pub forecast_year: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            out_dir: PathBuf::from("."),
            top_n: 10,
            preview_rows: 3,
            forecast_year: 2026,
        }
    }
}

impl Config {
    /// Build from command-line flags, falling back to `AIDGAP_DATA_DIR` /
    /// `AIDGAP_OUT_DIR` and then to defaults.
    pub fn from_args(args: &[String]) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: flag_value(args, "--data-dir")
                .or_else(|| env::var("AIDGAP_DATA_DIR").ok())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            out_dir: flag_value(args, "--out-dir")
                .or_else(|| env::var("AIDGAP_OUT_DIR").ok())
                .map(PathBuf::from)
                .unwrap_or(defaults.out_dir),
            top_n: parse_arg(args, "--top", defaults.top_n),
            preview_rows: parse_arg(args, "--preview", defaults.preview_rows),
            forecast_year: parse_arg(args, "--year", defaults.forecast_year),
        }
    }

    pub fn country_path(&self) -> PathBuf {
        self.data_dir.join(COUNTRY_FILE)
    }

    pub fn sector_path(&self) -> PathBuf {
        self.data_dir.join(SECTOR_FILE)
    }

    pub fn forecast_path(&self) -> PathBuf {
        self.data_dir.join(FORECAST_FILE)
    }

    pub fn out_path(&self, file: &str) -> PathBuf {
        self.out_dir.join(file)
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
