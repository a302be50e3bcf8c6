//! Yahoo Finance price-history provider.
//!
//! Fetches daily OHLCV bars plus dividend events from Yahoo's v8 chart API
//! in a single request (`events=div`). Yahoo has no official API and is
//! subject to unannounced format changes, so every missing piece of the
//! response maps to a typed parse error.

use super::provider::{DataError, HistoryProvider};
use crate::domain::DailyRecord;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
    events: Option<Events>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct Events {
    dividends: Option<HashMap<String, DividendEvent>>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    /// Build the chart API URL for a symbol from `start` to now.
    fn chart_url(symbol: &str, start: NaiveDate) -> String {
        let period1 = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let period2 = chrono::Utc::now().timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={period1}&period2={period2}&interval=1d\
             &events=div&includeAdjustedClose=false"
        )
    }

    /// Parse the chart API response into daily records.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<DailyRecord>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::UnknownSymbol {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ParseFailure(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ParseFailure("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ParseFailure("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::ParseFailure("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ParseFailure("no quote data".into()))?;

        // Dividend events arrive keyed by epoch timestamp, independent of
        // the bar arrays; index them by calendar date first.
        let mut dividends: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        if let Some(events) = data.events {
            for event in events.dividends.unwrap_or_default().into_values() {
                if let Some(date) = timestamp_to_date(event.date) {
                    dividends.insert(date, event.amount);
                }
            }
        }

        let mut records = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = timestamp_to_date(ts)
                .ok_or_else(|| DataError::ParseFailure(format!("invalid timestamp: {ts}")))?;

            // Rows with no close are non-trading days; skip them so the
            // adjustment math never sees a NaN close.
            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };

            records.push(DailyRecord {
                date,
                // Absent price fields stay NaN rather than borrowing the
                // close; only `close` feeds the adjustment math.
                open: quote.open.get(i).copied().flatten().unwrap_or(f64::NAN),
                high: quote.high.get(i).copied().flatten().unwrap_or(f64::NAN),
                low: quote.low.get(i).copied().flatten().unwrap_or(f64::NAN),
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
                dividend: dividends.get(&date).copied().unwrap_or(0.0),
                adj_ratio: 1.0,
                adj_close: close,
            });
        }

        if records.is_empty() {
            return Err(DataError::UnknownSymbol {
                symbol: symbol.to_string(),
            });
        }

        Ok(records)
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryProvider for YahooProvider {
    fn history(&self, symbol: &str, start: NaiveDate) -> Result<Vec<DailyRecord>, DataError> {
        let url = Self::chart_url(symbol, start);
        tracing::debug!(symbol, "fetching daily history from Yahoo Finance");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkFailure(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::UnknownSymbol {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::NetworkFailure(format!(
                "HTTP {status} for {symbol}"
            )));
        }

        let chart: ChartResponse = resp
            .json()
            .map_err(|e| DataError::ParseFailure(format!("{symbol}: {e}")))?;

        let records = Self::parse_response(symbol, chart)?;
        tracing::info!(symbol, rows = records.len(), "fetched daily history");
        Ok(records)
    }
}

fn timestamp_to_date(ts: i64) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.naive_utc().date())
}
