//! DivCmp CLI — dividend-adjusted return comparison.
//!
//! Commands:
//! - `compare` — fetch, adjust, analyze, and chart a set of securities
//! - `dividends` — print the scraped dividend-override schedule for a symbol

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use divcmp_core::data::{DividendOverrideSource, MoneyDjScraper, YahooProvider};
use divcmp_core::SecuritySpec;
use divcmp_runner::{compare, CompareFile, CompareOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "divcmp",
    about = "divcmp CLI — dividend-adjusted return comparison across securities"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare securities: annual/total/rolling return and correlation charts.
    Compare {
        /// Symbols to compare (e.g. VTI BND). Omit when using --config.
        symbols: Vec<String>,

        /// TOML watchlist with per-security remarks and dividend fixes.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Start date (YYYY-MM-DD). Defaults to 2000-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Artifact name prefix, e.g. USA -> USA_AnnualReturn.html.
        #[arg(long)]
        prefix: Option<String>,

        /// Rolling-return window in years. Defaults to 5.
        #[arg(long)]
        rolling_years: Option<u32>,

        /// Output directory for chart documents.
        #[arg(long, default_value = "images")]
        output_dir: PathBuf,

        /// Load securities in parallel. Results are identical to sequential.
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Print the scraped dividend-override schedule for a symbol.
    Dividends {
        /// Symbol of a TW-listed ETF, e.g. 0056.TW.
        symbol: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Compare {
            symbols,
            config,
            start,
            end,
            prefix,
            rolling_years,
            output_dir,
            parallel,
        } => cmd_compare(
            symbols,
            config,
            start,
            end,
            prefix,
            rolling_years,
            output_dir,
            parallel,
        ),
        Commands::Dividends { symbol } => cmd_dividends(&symbol),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_compare(
    symbols: Vec<String>,
    config: Option<PathBuf>,
    start: Option<String>,
    end: Option<String>,
    prefix: Option<String>,
    rolling_years: Option<u32>,
    output_dir: PathBuf,
    parallel: bool,
) -> Result<()> {
    let mut options = CompareOptions {
        output_dir,
        parallel,
        ..CompareOptions::default()
    };

    // Watchlist values apply first; explicit flags override them.
    let specs = match config {
        Some(path) => {
            if !symbols.is_empty() {
                bail!("give either symbols or --config, not both");
            }
            let file = CompareFile::from_path(&path)
                .with_context(|| format!("loading watchlist {}", path.display()))?;
            options.window = file.window(options.window)?;
            options.prefix = file.prefix.clone();
            if let Some(years) = file.rolling_years {
                options.rolling_years = years;
            }
            let specs = file.specs()?;
            if specs.is_empty() {
                bail!("watchlist {} lists no securities", path.display());
            }
            specs
        }
        None => {
            if symbols.is_empty() {
                bail!("provide symbols to compare, or --config with a watchlist");
            }
            symbols.into_iter().map(SecuritySpec::new).collect()
        }
    };

    if let Some(start) = start {
        options.window.start = parse_date(&start)?;
    }
    if let Some(end) = end {
        options.window.end = parse_date(&end)?;
    }
    if let Some(prefix) = prefix {
        options.prefix = prefix;
    }
    if let Some(years) = rolling_years {
        options.rolling_years = years;
    }

    let provider = YahooProvider::new();
    let scraper = MoneyDjScraper::new();
    let artifacts = compare(specs, &options, &provider, &scraper)?;

    println!("Artifacts written to {}:", options.output_dir.display());
    for path in [
        &artifacts.annual_return,
        &artifacts.total_return,
        &artifacts.rollback,
        &artifacts.rollback_violin,
        &artifacts.correlation_close,
        &artifacts.correlation_adj_close,
        &artifacts.returns_json,
    ] {
        println!("  {}", path.display());
    }
    Ok(())
}

fn cmd_dividends(symbol: &str) -> Result<()> {
    let scraper = MoneyDjScraper::new();
    let schedule = scraper.fetch_overrides(symbol);

    if schedule.is_empty() {
        println!("no override dividends found for {symbol}");
        return Ok(());
    }

    println!("{symbol}: {} payouts", schedule.len());
    for (date, amount) in &schedule {
        println!("  {}  {amount:>8.4}", date.format("%Y/%m/%d"));
    }
    Ok(())
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date {value:?} (expected YYYY-MM-DD)"))
}
