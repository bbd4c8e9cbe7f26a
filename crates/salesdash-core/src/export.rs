use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::DataFrame;
use tracing::info;

use crate::error::Result;
use crate::view::DashboardView;

pub const VIEW_FILE_NAME: &str = "dashboard.json";
pub const SALES_FILE_NAME: &str = "sales.parquet";

/// Files written by [`export_view`].
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub view_json: PathBuf,
    pub sales_parquet: PathBuf,
}

/// Writes the view as pretty JSON and the filtered sales records as Parquet under `dir`.
pub fn export_view(view: &DashboardView, records: &DataFrame, dir: &Path) -> Result<ExportPaths> {
    fs::create_dir_all(dir)?;

    let view_json = dir.join(VIEW_FILE_NAME);
    fs::write(&view_json, serde_json::to_vec_pretty(view)?)?;

    let sales_parquet = dir.join(SALES_FILE_NAME);
    fs::write(&sales_parquet, create_parquet_bytes(records)?)?;

    info!(
        view = %view_json.display(),
        sales = %sales_parquet.display(),
        rows = records.height(),
        "dashboard exported"
    );

    Ok(ExportPaths {
        view_json,
        sales_parquet,
    })
}

fn create_parquet_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let mut clone = df.clone();
        ParquetWriter::new(&mut cursor)
            .with_compression(ParquetCompression::Zstd(None))
            .with_statistics(StatisticsOptions::default())
            .finish(&mut clone)?;
    }
    Ok(buffer)
}
