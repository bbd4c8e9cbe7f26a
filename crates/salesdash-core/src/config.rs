use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::filters::ALL_CATEGORIES;
use crate::source::{DataSource, DEFAULT_BASE_URL};

pub const CONFIG_ENV: &str = "SALESDASH_CONFIG";
pub const DATA_DIR_ENV: &str = "SALESDASH_DATA_DIR";
pub const BASE_URL_ENV: &str = "SALESDASH_BASE_URL";
pub const TOP_N_ENV: &str = "SALESDASH_TOP_N";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Local directory holding the CSV files; takes precedence over `base_url`.
    pub data_dir: Option<PathBuf>,
    pub base_url: String,
    /// Rows shown in each category chart.
    pub top_n: usize,
    pub default_category: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            top_n: 10,
            default_category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Defaults, then the TOML file (`path` or `SALESDASH_CONFIG`), then environment overrides.
    /// A `.env` file in the working directory is honoured.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "reading config file");
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| DashboardError::Config(err.to_string()))
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|value| !value.is_empty()) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(TOP_N_ENV) {
            self.top_n = raw.trim().parse().map_err(|_| {
                DashboardError::Config(format!(
                    "{TOP_N_ENV} must be a positive integer, got '{raw}'"
                ))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(DashboardError::Config("top_n must be at least 1".to_string()));
        }
        if self.data_dir.is_none() && self.base_url.trim().is_empty() {
            return Err(DashboardError::Config(
                "either data_dir or base_url must be set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn data_source(&self) -> DataSource {
        match &self.data_dir {
            Some(dir) => DataSource::Directory(dir.clone()),
            None => DataSource::Remote {
                base_url: self.base_url.clone(),
            },
        }
    }
}
