use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{file}: required columns missing: {}", .columns.join(", "))]
    MissingColumns { file: String, columns: Vec<String> },

    #[error("No data loaded")]
    NoData,
}

pub type ReportResult<T> = Result<T, ReportError>;
