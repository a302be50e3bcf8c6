//! Comparison orchestration: load securities, assemble tables, emit charts.
//!
//! The single entry operation drives every security through fetch →
//! adjustment → analytics, outer-joins the per-security results into
//! aligned tables, and writes the chart artifacts plus a machine-readable
//! returns summary. Any security failing aborts the whole run; there is no
//! per-security isolation.

use crate::charts;
use crate::correlation::{correlation_matrix, DateSeries};
use crate::table::ReturnTable;
use chrono::{Months, NaiveDate};
use divcmp_core::data::provider::{DividendOverrideSource, HistoryProvider};
use divcmp_core::{AnalysisWindow, InvalidInput, LoadError, RollingReturn, Security, SecuritySpec, YearReturn};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_ROLLING_YEARS: u32 = 5;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("no securities to compare")]
    NoSecurities,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("computing returns for {label}: {source}")]
    Returns { label: String, source: InvalidInput },

    #[error("writing artifacts: {0}")]
    Io(#[from] std::io::Error),

    #[error("serializing returns summary: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Options shared by one comparison run.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub window: AnalysisWindow,
    /// Artifact name prefix, e.g. `TW` -> `TW_AnnualReturn.html`.
    pub prefix: String,
    pub output_dir: PathBuf,
    pub rolling_years: u32,
    /// Load securities on the rayon pool. Results are identical to the
    /// sequential path; per-security pipelines share nothing.
    pub parallel: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            window: AnalysisWindow::new(
                NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                chrono::Local::now().date_naive(),
            ),
            prefix: String::new(),
            output_dir: PathBuf::from("images"),
            rolling_years: DEFAULT_ROLLING_YEARS,
            parallel: false,
        }
    }
}

/// Paths of the artifacts written by one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct CompareArtifacts {
    pub annual_return: PathBuf,
    pub total_return: PathBuf,
    pub rollback: PathBuf,
    pub rollback_violin: PathBuf,
    pub correlation_close: PathBuf,
    pub correlation_adj_close: PathBuf,
    pub returns_json: PathBuf,
}

/// Per-security slice of the returns summary artifact.
#[derive(Debug, Serialize)]
struct SecurityReturns {
    label: String,
    total_return: f64,
    year_returns: Vec<YearReturn>,
    rolling_years: u32,
    rolling_returns: Vec<RollingReturn>,
}

/// Load every security and run the full comparison.
pub fn compare(
    specs: Vec<SecuritySpec>,
    options: &CompareOptions,
    provider: &(dyn HistoryProvider + Sync),
    overrides: &(dyn DividendOverrideSource + Sync),
) -> Result<CompareArtifacts, CompareError> {
    if specs.is_empty() {
        return Err(CompareError::NoSecurities);
    }

    let securities = load_all(specs, options, provider, overrides)?;
    compare_loaded(&securities, options)
}

fn load_all(
    specs: Vec<SecuritySpec>,
    options: &CompareOptions,
    provider: &(dyn HistoryProvider + Sync),
    overrides: &(dyn DividendOverrideSource + Sync),
) -> Result<Vec<Security>, LoadError> {
    let window = options.window;
    if options.parallel {
        specs
            .into_par_iter()
            .map(|spec| Security::load(spec, window, provider, overrides))
            .collect()
    } else {
        specs
            .into_iter()
            .map(|spec| Security::load(spec, window, provider, overrides))
            .collect()
    }
}

/// Run the comparison over securities that are already loaded.
pub fn compare_loaded(
    securities: &[Security],
    options: &CompareOptions,
) -> Result<CompareArtifacts, CompareError> {
    if securities.is_empty() {
        return Err(CompareError::NoSecurities);
    }
    std::fs::create_dir_all(&options.output_dir)?;

    let mut year_columns = Vec::with_capacity(securities.len());
    let mut total_columns = Vec::with_capacity(securities.len());
    let mut rolling_columns = Vec::with_capacity(securities.len());
    let mut summary = Vec::with_capacity(securities.len());

    for security in securities {
        let label = security.label();
        let wrap = |source| CompareError::Returns {
            label: security.label(),
            source,
        };

        let years = security.year_returns().map_err(wrap)?;
        let total = security.total_return().map_err(wrap)?;
        let rolling = security.rolling_returns(options.rolling_years).map_err(wrap)?;

        year_columns.push((
            label.clone(),
            years.iter().map(|y| (y.year, y.percent)).collect(),
        ));
        total_columns.push((label.clone(), vec![("Total Return", total)]));
        rolling_columns.push((
            label.clone(),
            rolling.iter().map(|r| (r.date, r.percent)).collect(),
        ));
        summary.push(SecurityReturns {
            label,
            total_return: total,
            year_returns: years,
            rolling_years: options.rolling_years,
            rolling_returns: rolling,
        });
    }

    let dir = options.output_dir.as_path();
    let prefix = options.prefix.as_str();

    let year_table = ReturnTable::from_columns(year_columns);
    let annual_return = charts::write_chart(
        &charts::grouped_bar(&year_table, "Annual Return"),
        dir,
        prefix,
        "AnnualReturn",
    );

    let total_table = ReturnTable::from_columns(total_columns);
    let total_return = charts::write_chart(
        &charts::grouped_bar(&total_table, "Total Return"),
        dir,
        prefix,
        "TotalReturn",
    );

    let rolling_table = ReturnTable::from_columns(rolling_columns);
    let rollback_title = format!("{} Years Roll Back", options.rolling_years);
    let rollback = charts::write_chart(
        &charts::area(&rolling_table, &rollback_title),
        dir,
        prefix,
        "RollBack",
    );

    // The distribution view only makes sense over the date intersection:
    // otherwise the longest-listed security dominates the sample.
    let complete = rolling_table.complete_rows();
    let violin_title = violin_title(&complete, options.rolling_years);
    let rollback_violin = charts::write_chart(
        &charts::distribution(&complete, &violin_title),
        dir,
        prefix,
        "RollBack_Violin",
    );

    let close_series: Vec<(String, DateSeries)> = securities
        .iter()
        .map(|s| (s.label(), to_series(s, |r| r.close)))
        .collect();
    let correlation_close = charts::write_chart(
        &charts::heatmap(&correlation_matrix(&close_series), "Correlation of Close"),
        dir,
        prefix,
        "Correlation_Close",
    );

    let adj_series: Vec<(String, DateSeries)> = securities
        .iter()
        .map(|s| (s.label(), to_series(s, |r| r.adj_close)))
        .collect();
    let correlation_adj_close = charts::write_chart(
        &charts::heatmap(
            &correlation_matrix(&adj_series),
            "Correlation of Adj Close",
        ),
        dir,
        prefix,
        "Correlation_AdjClose",
    );

    let returns_json = dir.join(format!("{prefix}_Returns.json"));
    std::fs::write(&returns_json, serde_json::to_string_pretty(&summary)?)?;

    tracing::info!(
        securities = securities.len(),
        output_dir = %dir.display(),
        "comparison artifacts written"
    );

    Ok(CompareArtifacts {
        annual_return,
        total_return,
        rollback,
        rollback_violin,
        correlation_close,
        correlation_adj_close,
        returns_json,
    })
}

/// Title for the distribution artifact, carrying the effective sample range:
/// the first complete date minus the lookback, through the last complete date.
fn violin_title(complete: &ReturnTable<NaiveDate>, years: u32) -> String {
    match (complete.first_key(), complete.last_key()) {
        (Some(first), Some(last)) => {
            let from = first
                .checked_sub_months(Months::new(years.saturating_mul(12)))
                .unwrap_or(first);
            format!(
                "{years} Years Roll Back ({} ~ {})",
                from.format("%Y/%m/%d"),
                last.format("%Y/%m/%d")
            )
        }
        _ => format!("{years} Years Roll Back"),
    }
}

/// Full-history values keyed by date; correlations deliberately ignore the
/// analysis window.
fn to_series(
    security: &Security,
    value: impl Fn(&divcmp_core::DailyRecord) -> f64,
) -> DateSeries {
    security
        .full_records()
        .iter()
        .map(|r| (r.date, value(r)))
        .collect()
}
