//! Provider traits and structured error types.
//!
//! The `HistoryProvider` trait abstracts over the price-history source so
//! implementations can be swapped and mocked for tests; the
//! `DividendOverrideSource` trait does the same for the best-effort
//! dividend-override scrape.

use crate::domain::{DailyRecord, DividendSchedule};
use chrono::NaiveDate;
use thiserror::Error;

/// Structured errors for price-history retrieval.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("failed to parse provider response: {0}")]
    ParseFailure(String),
}

/// Source of full daily price history for a symbol.
pub trait HistoryProvider {
    /// Daily OHLCV rows plus raw dividend amounts, ordered ascending by
    /// date, from `start` (or the earliest available date) to now.
    ///
    /// Failures surface as typed errors, never as silently empty data.
    fn history(&self, symbol: &str, start: NaiveDate) -> Result<Vec<DailyRecord>, DataError>;
}

/// Best-effort source of replacement dividend schedules.
///
/// Contract: never fails. Any internal network or parse error degrades to an
/// empty schedule.
pub trait DividendOverrideSource {
    fn fetch_overrides(&self, symbol: &str) -> DividendSchedule;
}
