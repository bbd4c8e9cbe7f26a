use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use salesdash_core::config::DashboardConfig;
use salesdash_core::dataset::Dataset;
use salesdash_core::filters::DateRange;
use salesdash_core::view::DashboardFilters;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(author, version, about = "E-commerce sales dashboard", long_about = None)]
pub struct Cli {
    /// TOML configuration file (defaults to $SALESDASH_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Read the CSV tables from this directory
    #[arg(long, global = true, conflicts_with = "base_url")]
    pub data_dir: Option<PathBuf>,
    /// Fetch the CSV tables from this base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render sales and revenue by category, payment methods and monthly transactions
    Summary(SummaryArgs),
    /// List the category selector options for a purchase period
    Categories(PeriodArgs),
    /// Write the view as JSON and the filtered sales records as Parquet
    Export(ExportArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct PeriodArgs {
    /// First purchase date to include (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Last purchase date to include (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    #[command(flatten)]
    pub period: PeriodArgs,
    /// English category name, or "All"
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
    /// Categories shown per chart (defaults to the configured top_n)
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub top: Option<usize>,
    /// Print the whole view as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
    /// Output directory
    #[arg(long)]
    pub out: PathBuf,
}

impl PeriodArgs {
    /// A missing bound falls back to the dataset's purchase-date span.
    pub fn resolve(&self, dataset: &Dataset) -> Result<Option<DateRange>> {
        if self.start.is_none() && self.end.is_none() {
            return Ok(None);
        }

        let span = dataset.purchase_date_span()?;
        let start = self
            .start
            .or(span.map(|(min, _)| min))
            .unwrap_or(NaiveDate::MIN);
        let end = self
            .end
            .or(span.map(|(_, max)| max))
            .unwrap_or(NaiveDate::MAX);

        let range = DateRange::new(start, end);
        if let Err(err) = range.validate() {
            warn!(%err, "showing empty result");
        }
        Ok(Some(range))
    }
}

impl FilterArgs {
    pub fn resolve(&self, dataset: &Dataset, config: &DashboardConfig) -> Result<DashboardFilters> {
        Ok(DashboardFilters {
            date_range: self.period.resolve(dataset)?,
            category: self
                .category
                .clone()
                .unwrap_or_else(|| config.default_category.clone()),
        })
    }
}
