//! DivCmp Runner — comparison orchestration, tables, correlation, chart export.
//!
//! Builds on `divcmp-core` to provide:
//! - TOML watchlist configs
//! - Outer-joined multi-security return tables
//! - Pairwise-complete Pearson correlation matrices
//! - Plotly chart builders and artifact export
//! - The `compare` entry operation

pub mod charts;
pub mod compare;
pub mod config;
pub mod correlation;
pub mod table;

pub use compare::{
    compare, compare_loaded, CompareArtifacts, CompareError, CompareOptions,
    DEFAULT_ROLLING_YEARS,
};
pub use config::{CompareFile, ConfigError, SecurityEntry};
pub use correlation::{correlation_matrix, CorrelationMatrix, DateSeries};
pub use table::ReturnTable;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn options_and_results_are_send_sync() {
        assert_send::<CompareOptions>();
        assert_sync::<CompareOptions>();
        assert_send::<CompareArtifacts>();
        assert_sync::<CompareArtifacts>();
        assert_send::<CorrelationMatrix>();
        assert_sync::<CorrelationMatrix>();
    }
}
