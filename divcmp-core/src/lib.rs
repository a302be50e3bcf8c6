//! DivCmp Core — securities, dividend adjustment, and return analytics.
//!
//! This crate contains the data layer and the numeric core:
//! - Domain types (security specs, daily records, analysis windows)
//! - Price-history provider trait with the Yahoo Finance implementation
//! - Best-effort MoneyDJ dividend-override scraper
//! - Dividend adjustment engine (cumulative ratio math)
//! - Year, total, and rolling return analytics

pub mod adjust;
pub mod analytics;
pub mod data;
pub mod domain;
pub mod error;
pub mod security;

pub use analytics::{RollingReturn, YearReturn};
pub use domain::{AnalysisWindow, DailyRecord, DividendSchedule, SecuritySpec};
pub use error::InvalidInput;
pub use security::{LoadError, Security};
