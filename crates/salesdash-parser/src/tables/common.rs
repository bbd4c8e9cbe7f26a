use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use polars::prelude::*;
use serde::de::DeserializeOwned;

use crate::errors::ParserError;
use crate::model::TableKind;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses a purchase timestamp. Blank input is an undated row, not an error.
pub fn parse_timestamp(value: &str) -> Result<Option<NaiveDateTime>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Some(ts));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Some)
        .ok_or_else(|| format!("unrecognized timestamp '{trimmed}'"))
}

pub(crate) fn timestamp_micros(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_micros()
}

/// Reads every data row of `content` into `T`, after checking the header carries `required`.
pub(crate) fn read_rows<T: DeserializeOwned>(
    table: TableKind,
    content: &str,
    required: &[&'static str],
) -> Result<Vec<T>, ParserError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|source| ParserError::Csv { table, source })?
        .clone();
    for column in required {
        if !headers.iter().any(|header| header == *column) {
            return Err(ParserError::MissingColumn {
                table,
                column: *column,
            });
        }
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        let row = result.map_err(|err| ParserError::DataRow {
            table,
            line_index: err
                .position()
                .map(|pos| pos.line() as usize)
                .unwrap_or(idx + 2),
            message: err.to_string(),
        })?;
        rows.push(row);
    }

    Ok(rows)
}

pub(crate) fn str_column(name: &str, values: Vec<Option<String>>) -> Column {
    let values: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
    Series::new(name.into(), values).into()
}

pub(crate) fn datetime_column(
    table: TableKind,
    name: &str,
    micros: Vec<Option<i64>>,
) -> Result<Column, ParserError> {
    Series::new(name.into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
        .map(Column::from)
        .map_err(|err| ParserError::Validation {
            table,
            message: format!("failed to cast {name} column: {err}"),
        })
}

pub(crate) fn build_frame(table: TableKind, columns: Vec<Column>) -> Result<DataFrame, ParserError> {
    DataFrame::new(columns).map_err(|err| ParserError::Validation {
        table,
        message: format!("failed to assemble DataFrame: {err}"),
    })
}
