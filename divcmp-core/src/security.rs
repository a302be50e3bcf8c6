//! A loaded security: full adjusted history plus a windowed view.

use crate::adjust;
use crate::analytics::{self, RollingReturn, YearReturn};
use crate::data::provider::{DataError, DividendOverrideSource, HistoryProvider};
use crate::domain::{AnalysisWindow, DailyRecord, DividendSchedule, SecuritySpec};
use crate::error::InvalidInput;
use chrono::NaiveDate;
use thiserror::Error;

/// Failure while fetching or adjusting one security.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetching {symbol}: {source}")]
    Fetch { symbol: String, source: DataError },

    #[error("adjusting {symbol}: {source}")]
    Adjust { symbol: String, source: InvalidInput },
}

/// One security's adjusted history, ready for return analytics.
///
/// Holds two materialized copies: the full unfiltered sequence (used by the
/// rolling-return lookback and the correlation matrices) and the sequence
/// filtered to the analysis window (used by year and total return). The
/// windowed view is a copy, not an aliased slice of shared mutable state.
#[derive(Debug)]
pub struct Security {
    spec: SecuritySpec,
    window: AnalysisWindow,
    full: Vec<DailyRecord>,
    windowed: Vec<DailyRecord>,
}

impl Security {
    /// Fetch, adjust, and window one security.
    ///
    /// The override source is only consulted when the spec sets
    /// `replace_dividends`; its schedule then replaces the raw dividends
    /// entirely (which are zeroed even if the scrape came back empty).
    pub fn load(
        spec: SecuritySpec,
        window: AnalysisWindow,
        provider: &dyn HistoryProvider,
        overrides: &dyn DividendOverrideSource,
    ) -> Result<Self, LoadError> {
        let replacement = if spec.replace_dividends {
            overrides.fetch_overrides(&spec.symbol)
        } else {
            DividendSchedule::new()
        };

        let history = provider
            .history(&spec.symbol, earliest_start())
            .map_err(|source| LoadError::Fetch {
                symbol: spec.symbol.clone(),
                source,
            })?;

        let schedule = adjust::build_schedule(
            &history,
            &spec.extra_dividends,
            &replacement,
            spec.replace_dividends,
        );
        tracing::debug!(
            symbol = spec.symbol.as_str(),
            dividends = schedule.len(),
            "applying dividend schedule"
        );

        let full = adjust::apply_schedule(history, &schedule).map_err(|source| {
            LoadError::Adjust {
                symbol: spec.symbol.clone(),
                source,
            }
        })?;

        Ok(Self::from_adjusted(spec, window, full))
    }

    /// Build a security from an already-adjusted record sequence.
    ///
    /// Useful when records come from somewhere other than a live provider,
    /// and as the seam for orchestration tests.
    pub fn from_adjusted(
        spec: SecuritySpec,
        window: AnalysisWindow,
        full: Vec<DailyRecord>,
    ) -> Self {
        let windowed = full
            .iter()
            .filter(|r| window.contains(r.date))
            .cloned()
            .collect();
        Self {
            spec,
            window,
            full,
            windowed,
        }
    }

    pub fn spec(&self) -> &SecuritySpec {
        &self.spec
    }

    pub fn label(&self) -> String {
        self.spec.label()
    }

    pub fn window(&self) -> AnalysisWindow {
        self.window
    }

    /// Full adjusted history, unfiltered by the analysis window.
    pub fn full_records(&self) -> &[DailyRecord] {
        &self.full
    }

    /// Adjusted history restricted to the analysis window.
    pub fn windowed_records(&self) -> &[DailyRecord] {
        &self.windowed
    }

    /// Per-calendar-year returns over the windowed history.
    pub fn year_returns(&self) -> Result<Vec<YearReturn>, InvalidInput> {
        analytics::year_returns(&self.windowed)
    }

    /// Whole-window return.
    pub fn total_return(&self) -> Result<f64, InvalidInput> {
        analytics::total_return(&self.windowed)
    }

    /// Trailing `years`-year returns over the full unfiltered history.
    pub fn rolling_returns(&self, years: u32) -> Result<Vec<RollingReturn>, InvalidInput> {
        analytics::rolling_returns(&self.full, years)
    }
}

/// Histories are always fetched from inception so the rolling lookback and
/// correlations see data outside the analysis window.
fn earliest_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()
}
