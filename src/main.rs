//! Sales Chart Tool
//!
//! Aggregates a daily sales response document into calendar buckets, prints
//! the result and optionally renders it as a chart.

use anyhow::{Context, Result};
use chrono::{Months, NaiveDate, Utc};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use salescharts::plotting::{render_chart, ChartStyle};
use salescharts::source::JsonFileSource;
use salescharts::{AggregatedSeries, ChartSettings, Config, DateRange, Granularity, SalesChart};

#[derive(Parser)]
#[command(
    name = "salescharts",
    version,
    about = "Aggregate daily sales into day, week, month or quarter buckets"
)]
struct Cli {
    /// JSON response document holding `salesData` and `sumData`
    #[arg(long)]
    data: PathBuf,

    /// First day of the range (YYYY-MM-DD). Defaults to one month before --end
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD). Defaults to today
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Bucket size: day, week, month or quarter. Defaults to the configured one
    #[arg(long)]
    granularity: Option<Granularity>,

    /// Render a chart to this file (PNG, or SVG when the extension is .svg)
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Print the buckets as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Configuration file (defaults to $SALESCHARTS_CONFIG or the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn print_table(series: &AggregatedSeries) {
    let width = series
        .iter()
        .map(|b| b.label.len())
        .max()
        .unwrap_or(0)
        .max("Period".len());

    println!("{:<width$}  {:>12}  {:>12}", "Period", "Sales", "Sum $/K", width = width);
    for bucket in series.iter() {
        println!(
            "{:<width$}  {:>12.2}  {:>12.2}",
            bucket.label,
            bucket.sales,
            bucket.sum,
            width = width
        );
    }
    println!(
        "{:<width$}  {:>12.2}  {:>12.2}",
        "Total",
        series.total_sales(),
        series.total_sum(),
        width = width
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    let end = cli.end.unwrap_or_else(|| config.zone.date_of(Utc::now()));
    let start = match cli.start {
        Some(start) => start,
        None => end.checked_sub_months(Months::new(1)).unwrap_or(end),
    };
    if start > end {
        tracing::warn!(%start, %end, "start is after end, nothing to chart");
    }

    let range = DateRange::from_dates(start, end, config.zone)?;
    let settings = ChartSettings {
        start: range.start,
        end: range.end,
        granularity: cli.granularity.unwrap_or(config.default_granularity),
    };

    let source = JsonFileSource::new(&cli.data).with_zone(config.zone);
    let mut chart = SalesChart::new(&config).with_settings(settings);
    chart
        .load(&source)
        .await
        .with_context(|| format!("failed to load sales data from {}", source.path().display()))?;

    let series = chart.chart_data();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&series)?);
    } else {
        print_table(&series);
    }

    if let Some(path) = &cli.plot {
        render_chart(&series, path, &ChartStyle::from(&config.plot))
            .with_context(|| format!("failed to render {}", path.display()))?;
    }

    Ok(())
}
