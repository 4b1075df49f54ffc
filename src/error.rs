//! Error types for loading and classifying the repair log.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required columns are not in the header row.
    #[error("missing columns {missing:?}; available columns: {present:?}")]
    Schema {
        missing: Vec<String>,
        present: Vec<String>,
    },

    /// Neither the spreadsheet nor the delimited text file exists.
    #[error("no data source found (looked for {xlsx} and {csv})", xlsx = .xlsx.display(), csv = .csv.display())]
    NoSource { xlsx: PathBuf, csv: PathBuf },

    #[error("spreadsheet {path} has no worksheet")]
    EmptyWorkbook { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
