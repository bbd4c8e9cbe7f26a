use thiserror::Error;

use crate::model::TableKind;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{table} header is missing required column '{column}'")]
    MissingColumn {
        table: TableKind,
        column: &'static str,
    },

    #[error("{table} CSV error: {source}")]
    Csv {
        table: TableKind,
        #[source]
        source: csv::Error,
    },

    #[error("{table} data row {line_index} invalid: {message}")]
    DataRow {
        table: TableKind,
        line_index: usize,
        message: String,
    },

    #[error("{table} validation error: {message}")]
    Validation { table: TableKind, message: String },
}

impl ParserError {
    pub fn table(&self) -> TableKind {
        match self {
            ParserError::MissingColumn { table, .. }
            | ParserError::Csv { table, .. }
            | ParserError::DataRow { table, .. }
            | ParserError::Validation { table, .. } => *table,
        }
    }
}
