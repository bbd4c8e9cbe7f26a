// crates/salesdash-core/src/error.rs

use chrono::NaiveDate;
use salesdash_parser::{ParserError, TableKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("failed to load {table}: {source}")]
    Load {
        table: TableKind,
        #[source]
        source: ParserError,
    },

    #[error("failed to fetch {table} from {location}: {message}")]
    Fetch {
        table: TableKind,
        location: String,
        message: String,
    },

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ParserError> for DashboardError {
    fn from(source: ParserError) -> Self {
        DashboardError::Load {
            table: source.table(),
            source,
        }
    }
}

impl DashboardError {
    /// Load failures halt startup; everything else is scoped to a single pass.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DashboardError::InvalidDateRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
