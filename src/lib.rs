//! Humanitarian funding-gap metrics.
//!
//! Reads per-country needs and requirements, sector benchmarks and forecast
//! artifacts from CSV, derives normalized mismatch scores and severity bands,
//! and writes ranked report tables.
pub mod cache;
pub mod config;
pub mod error;
pub mod forecast;
pub mod loader;
pub mod lookup;
pub mod metrics;
pub mod output;
pub mod rankings;
pub mod reports;
pub mod sectors;
pub mod session;
pub mod types;
pub mod util;

pub use error::{ReportError, ReportResult};
pub use metrics::{derive, Derivation};
pub use sectors::aggregate_sectors;
