use anyhow::{Context, Result};
use clap::Parser;
use salesdash_core::config::DashboardConfig;
use salesdash_core::dataset::{self, Dataset};
use salesdash_core::export::export_view;
use salesdash_core::view::{build_view, DashboardFilters};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod args;
mod render;

use args::{Cli, Command, ExportArgs, PeriodArgs, SummaryArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(url) = cli.base_url {
        config.base_url = url;
        config.data_dir = None;
    }

    let source = config.data_source();
    let dataset = dataset::shared(&source)
        .with_context(|| format!("failed to load dataset from {source}"))?;

    match cli.command {
        Command::Summary(args) => handle_summary(&dataset, &config, args),
        Command::Categories(args) => handle_categories(&dataset, args),
        Command::Export(args) => handle_export(&dataset, &config, args),
    }
}

fn handle_summary(dataset: &Dataset, config: &DashboardConfig, args: SummaryArgs) -> Result<()> {
    let filters = args.filters.resolve(dataset, config)?;
    let pass = build_view(dataset, &filters)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&pass.view)?);
    } else {
        let top = args.top.unwrap_or(config.top_n);
        print!("{}", render::render_view(&pass.view, top));
    }

    Ok(())
}

fn handle_categories(dataset: &Dataset, args: PeriodArgs) -> Result<()> {
    let filters = DashboardFilters {
        date_range: args.resolve(dataset)?,
        ..Default::default()
    };
    let pass = build_view(dataset, &filters)?;

    for option in &pass.view.category_options {
        println!("{option}");
    }

    Ok(())
}

fn handle_export(dataset: &Dataset, config: &DashboardConfig, args: ExportArgs) -> Result<()> {
    let filters = args.filters.resolve(dataset, config)?;
    let pass = build_view(dataset, &filters)?;

    let paths = export_view(&pass.view, &pass.records, &args.out)
        .with_context(|| format!("failed to export to {}", args.out.display()))?;
    info!(records = pass.view.record_count, "export finished");

    println!("Wrote {}", paths.view_json.display());
    println!("Wrote {}", paths.sales_parquet.display());

    Ok(())
}
