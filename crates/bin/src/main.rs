//! Folio CLI binary.
//!
//! Provides the command-line interface for the Folio portfolio analytics
//! engine.

mod integration;

use chrono::Duration;
use clap::{Parser, Subcommand};
use folio_data::ingest::load_holdings;
use folio_engine::{FolioSelection, GroupKey, compute, filter_folio, unique_symbols};
use folio_output::export::{ExportFormat, Exporter};
use folio_output::report::Report;
use folio_output::summary::PortfolioSummary;
use folio_output::table::{
    render_group_table, render_group_table_markdown, render_holdings_table,
};
use integration::{cache_manager, quote_pipeline};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio: personal investment portfolio analytics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a holdings file against current market quotes
    Analyze {
        /// Path to the holdings CSV file
        #[arg(long)]
        file: PathBuf,

        /// Restrict the run to a single folio
        #[arg(long)]
        folio: Option<String>,

        /// Grouping field (folio, symbol, hold-time, sector, industry)
        #[arg(long, default_value = "folio")]
        group_by: String,

        /// Disable the snapshot cache (always fetch fresh quotes)
        #[arg(long)]
        no_cache: bool,

        /// Force refresh cached quotes
        #[arg(long)]
        refresh: bool,

        /// Maximum snapshot age before a refetch, in hours
        #[arg(long, default_value = "24")]
        max_age_hours: i64,

        /// Output format (text, markdown or json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Show the per-holding detail table as well
        #[arg(long)]
        detail: bool,

        /// Export the group summary to a .csv or .json file
        #[arg(long)]
        export: Option<PathBuf>,

        /// Export the enriched holdings to a .csv or .json file
        #[arg(long)]
        export_holdings: Option<PathBuf>,
    },

    /// Inspect or clear the quote snapshot cache
    Cache {
        /// Clear all cached snapshots
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            file,
            folio,
            group_by,
            no_cache,
            refresh,
            max_age_hours,
            format,
            detail,
            export,
            export_holdings,
        } => {
            analyze(AnalyzeArgs {
                file,
                folio,
                group_by,
                no_cache,
                refresh,
                max_age_hours,
                format,
                detail,
                export,
                export_holdings,
            })
            .await
        }
        Commands::Cache { clear } => cache(clear),
    }
}

struct AnalyzeArgs {
    file: PathBuf,
    folio: Option<String>,
    group_by: String,
    no_cache: bool,
    refresh: bool,
    max_age_hours: i64,
    format: String,
    detail: bool,
    export: Option<PathBuf>,
    export_holdings: Option<PathBuf>,
}

async fn analyze(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let holdings = load_holdings(&args.file)?;
    if holdings.is_empty() {
        return Err(format!("no holdings found in {}", args.file.display()).into());
    }

    let selection = args
        .folio
        .map_or(FolioSelection::All, FolioSelection::Folio);
    let working = filter_folio(&holdings, &selection);
    if working.is_empty() {
        return Err(format!("no holdings match {}", selection).into());
    }

    let group_key = GroupKey::from_str(&args.group_by)?;
    let choices = GroupKey::choices(&selection);
    if !choices.contains(&group_key) {
        let names: Vec<&str> = choices.iter().map(|key| key.name()).collect();
        return Err(format!(
            "grouping by {} is not available for {}; choose one of: {}",
            group_key,
            selection,
            names.join(", ")
        )
        .into());
    }

    let symbols = unique_symbols(&working);
    let options = quote_pipeline::QuoteOptions {
        use_cache: !args.no_cache,
        force_refresh: args.refresh,
        max_age: Duration::hours(args.max_age_hours),
    };
    let quotes = quote_pipeline::fetch_quotes(&symbols, &options).await;

    let analysis = compute(&working, &quotes, group_key)?;

    match args.format.as_str() {
        "text" => {
            let summary = PortfolioSummary::from_report(&analysis, &selection);
            print!("{}", summary.to_ascii_table());
            println!();
            print!("{}", render_group_table(&analysis.groups, group_key.name()));
            if args.detail {
                println!();
                print!("{}", render_holdings_table(&analysis.enriched));
            }
        }
        "markdown" => {
            let summary = PortfolioSummary::from_report(&analysis, &selection);
            println!("{}", summary.to_markdown());
            println!(
                "{}",
                render_group_table_markdown(&analysis.groups, group_key.name())
            );
        }
        "json" => {
            let report = Report::new(analysis.clone(), &selection);
            println!("{}", report.to_json()?);
        }
        other => return Err(format!("unknown output format: {}", other).into()),
    }

    if let Some(path) = args.export {
        let format = ExportFormat::from_path(&path)?;
        Exporter::export_groups(&analysis.groups, format, &path)?;
        eprintln!("Group summary written to {}", path.display());
    }
    if let Some(path) = args.export_holdings {
        let format = ExportFormat::from_path(&path)?;
        Exporter::export_holdings(&analysis.enriched, format, &path)?;
        eprintln!("Enriched holdings written to {}", path.display());
    }

    Ok(())
}

fn cache(clear: bool) -> Result<(), Box<dyn std::error::Error>> {
    let cache = cache_manager::open_cache()?;

    if clear {
        cache.clear_all()?;
        println!("Snapshot cache cleared");
        return Ok(());
    }

    let stats = cache.stats()?;
    println!("Cache: {}", cache_manager::cache_path().display());
    println!("  Snapshots: {}", stats.snapshots);
    println!("  Quote rows: {}", stats.quotes);
    Ok(())
}
