//! Order Search - find orders by customer name
//!
//! Loads an order CSV, filters it by a partial customer name plus optional
//! status and city selections, and shows summary metrics with a CSV export.
//! Runs as a desktop window, or headless with the `search` subcommand.

mod config;
mod data;
mod export;
mod gui;
mod stats;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use data::{filter, OrderQuery, SourceCache};
use eframe::egui;
use gui::OrderSearchApp;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "order-search")]
#[command(version, about = "Search orders by customer name", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Order CSV to search (overrides the config file)
    #[arg(short, long, global = true)]
    source: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search without opening a window
    Search {
        /// Partial customer name, case-insensitive
        #[arg(short, long, default_value = "")]
        query: String,

        /// Allowed status (repeatable)
        #[arg(long = "status")]
        statuses: Vec<String>,

        /// Allowed city (repeatable)
        #[arg(long = "city")]
        cities: Vec<String>,

        /// Write the sorted results to this CSV file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(source) = cli.source {
        config.source = source;
    }

    let cache = SourceCache::new();

    match cli.command {
        Some(Commands::Search {
            query,
            statuses,
            cities,
            export,
        }) => {
            let query = OrderQuery::new(query)
                .with_statuses(statuses)
                .with_cities(cities);
            run_search(&config, cache, &query, export.as_deref())
        }
        None => run_gui(config, cache),
    }
}

fn run_gui(config: AppConfig, cache: SourceCache) -> Result<()> {
    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Order Search"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Order Search",
        options,
        Box::new(move |cc| Ok(Box::new(OrderSearchApp::new(cc, config, cache)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}

fn run_search(
    config: &AppConfig,
    mut cache: SourceCache,
    query: &OrderQuery,
    export_path: Option<&Path>,
) -> Result<()> {
    let records = cache
        .get_or_load(&config.source)
        .with_context(|| format!("Failed to load orders from {}", config.source.display()))?;

    let filtered = filter(&records, query)?;
    let summary = stats::summarize(&filtered)?;
    let presented = export::present(&filtered)?;

    println!("Matching orders:  {}", summary.count);
    println!("Unique customers: {}", summary.distinct_customers);
    println!(
        "Total value:      {}",
        stats::format_currency(summary.total_value, &config.currency_symbol)
    );

    match export_path {
        Some(path) if presented.is_empty() => {
            warn!(path = %path.display(), "no matching orders, nothing exported");
        }
        Some(path) => {
            export::write_export(&presented, path)
                .with_context(|| format!("Failed to export results to {}", path.display()))?;
        }
        None => {
            print!("{}", export::serialize(&presented)?);
        }
    }

    info!(matched = summary.count, "search complete");
    Ok(())
}
