//! Security descriptions, daily records, and analysis windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered mapping of ex-dividend date to per-share amount.
pub type DividendSchedule = BTreeMap<NaiveDate, f64>;

/// Caller-side description of one security in a comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySpec {
    pub symbol: String,

    /// Free-form remark appended to the display label.
    #[serde(default)]
    pub remark: String,

    /// Dividends the primary provider is missing, keyed by ex-dividend date.
    /// Entries override raw history dividends on the same date.
    #[serde(default)]
    pub extra_dividends: DividendSchedule,

    /// When set, raw history dividends are discarded entirely and the
    /// scraped override schedule is used in their place.
    #[serde(default)]
    pub replace_dividends: bool,
}

impl SecuritySpec {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            remark: String::new(),
            extra_dividends: DividendSchedule::new(),
            replace_dividends: false,
        }
    }

    /// Display label: symbol with the `.TW` suffix stripped, left-padded to
    /// seven columns when a remark follows.
    pub fn label(&self) -> String {
        let symbol = self.symbol.trim_end_matches(".TW");
        if self.remark.is_empty() {
            symbol.to_string()
        } else {
            format!("{symbol:<7}{}", self.remark)
        }
    }
}

/// One daily row of a security's price history.
///
/// `adj_ratio` starts at 1.0 and is shrunk by the adjustment engine for every
/// dividend event dated after this record; `adj_close = close * adj_ratio`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// Raw per-share dividend reported by the provider, 0 if none.
    pub dividend: f64,
    pub adj_ratio: f64,
    pub adj_close: f64,
}

impl DailyRecord {
    /// Record with all price columns set to `close` and no dividend.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
            dividend: 0.0,
            adj_ratio: 1.0,
            adj_close: close,
        }
    }

    pub fn with_dividend(mut self, dividend: f64) -> Self {
        self.dividend = dividend;
        self
    }
}

/// Inclusive date range used to window a security's history for the
/// year/total return computations.
///
/// Always carried per construction; there is no process-wide default state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnalysisWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for AnalysisWindow {
    /// Full available history: 1970-01-02 through today.
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(1970, 1, 2).unwrap(),
            end: chrono::Local::now().date_naive(),
        }
    }
}
