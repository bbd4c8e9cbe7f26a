use std::fmt;
use std::fs;
use std::path::PathBuf;

use salesdash_parser::TableKind;
use tracing::debug;

use crate::error::{DashboardError, Result};

/// Location the published dataset is served from.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/Amrasykr/dashboard_e-commerce/main/data";

/// Where the five CSV tables are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Directory(PathBuf),
    Remote { base_url: String },
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Remote {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl DataSource {
    /// Human-readable location of `table`, used in logs and errors.
    pub fn location(&self, table: TableKind) -> String {
        match self {
            DataSource::Directory(dir) => dir.join(table.file_name()).display().to_string(),
            DataSource::Remote { base_url } => {
                format!("{}/{}", base_url.trim_end_matches('/'), table.file_name())
            }
        }
    }

    /// Returns the raw CSV text for `table`.
    pub fn fetch(&self, table: TableKind) -> Result<String> {
        let location = self.location(table);
        debug!(%table, %location, "fetching table");

        let fetch_error = |message: String| DashboardError::Fetch {
            table,
            location: location.clone(),
            message,
        };

        match self {
            DataSource::Directory(dir) => fs::read_to_string(dir.join(table.file_name()))
                .map_err(|err| fetch_error(err.to_string())),
            DataSource::Remote { .. } => reqwest::blocking::get(&location)
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.text())
                .map_err(|err| fetch_error(err.to_string())),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Directory(dir) => write!(f, "directory {}", dir.display()),
            DataSource::Remote { base_url } => write!(f, "remote {base_url}"),
        }
    }
}
