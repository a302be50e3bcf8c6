//! Market data retrieval.

pub mod moneydj;
pub mod provider;
pub mod yahoo;

pub use moneydj::MoneyDjScraper;
pub use provider::{DataError, DividendOverrideSource, HistoryProvider};
pub use yahoo::YahooProvider;
