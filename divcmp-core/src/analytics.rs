//! Return analytics over adjusted record sequences.
//!
//! All operations are pure and deterministic given identical adjusted input.
//! Record sequences are expected ascending by date, the order providers and
//! the adjustment engine deliver them in.

use crate::domain::DailyRecord;
use crate::error::InvalidInput;
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

/// Percent return of one calendar year, first to last adjusted close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearReturn {
    pub year: i32,
    pub percent: f64,
}

/// Percent return over a fixed trailing window ending at `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingReturn {
    pub date: NaiveDate,
    pub percent: f64,
}

/// Per-calendar-year returns over a (windowed) record sequence.
///
/// A year with a single record yields 0%. An empty sequence yields an empty
/// result. A year whose first adjusted close is zero is an error.
pub fn year_returns(records: &[DailyRecord]) -> Result<Vec<YearReturn>, InvalidInput> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < records.len() {
        let year = records[i].date.year();
        let mut j = i;
        while j + 1 < records.len() && records[j + 1].date.year() == year {
            j += 1;
        }

        let first = &records[i];
        let last = &records[j];
        if first.adj_close == 0.0 {
            return Err(InvalidInput::ZeroBaseline { date: first.date });
        }
        out.push(YearReturn {
            year,
            percent: (last.adj_close - first.adj_close) / first.adj_close * 100.0,
        });

        i = j + 1;
    }

    Ok(out)
}

/// Whole-window return, first to last adjusted close.
pub fn total_return(records: &[DailyRecord]) -> Result<f64, InvalidInput> {
    let first = records.first().ok_or(InvalidInput::EmptyWindow)?;
    let last = records.last().ok_or(InvalidInput::EmptyWindow)?;
    if first.adj_close == 0.0 {
        return Err(InvalidInput::ZeroBaseline { date: first.date });
    }
    Ok((last.adj_close - first.adj_close) / first.adj_close * 100.0)
}

/// Trailing `years`-year return ending at each record date, ascending.
///
/// Walks the full sequence newest to oldest, pairing each record with the
/// most recent record dated at least `years` years earlier (month-clamped,
/// so Feb 29 anchors to Feb 28). The walk stops outright at the first record
/// with no anchor; a series shorter than the window yields an empty result.
pub fn rolling_returns(
    records: &[DailyRecord],
    years: u32,
) -> Result<Vec<RollingReturn>, InvalidInput> {
    let lookback = Months::new(years.saturating_mul(12));
    let mut out = Vec::new();

    for record in records.iter().rev() {
        let Some(target) = record.date.checked_sub_months(lookback) else {
            break;
        };
        let idx = records.partition_point(|r| r.date <= target);
        if idx == 0 {
            break;
        }

        let anchor = &records[idx - 1];
        if anchor.adj_close == 0.0 {
            return Err(InvalidInput::ZeroBaseline { date: anchor.date });
        }
        out.push(RollingReturn {
            date: record.date,
            percent: (record.adj_close - anchor.adj_close) / anchor.adj_close * 100.0,
        });
    }

    out.reverse();
    Ok(out)
}
