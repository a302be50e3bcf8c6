//! Typed numeric-input errors shared by the adjustment engine and analytics.

use chrono::NaiveDate;
use thiserror::Error;

/// A computation was asked to divide by a value the inputs made zero, or to
/// operate on an empty window. Surfaced as an error instead of letting NaN
/// propagate through the result tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("analysis window contains no records")]
    EmptyWindow,

    #[error("close price is zero at {date}; no adjustment factor can be derived")]
    ZeroClose { date: NaiveDate },

    #[error("adjusted close is zero at {date}; no return can be computed against it")]
    ZeroBaseline { date: NaiveDate },
}
