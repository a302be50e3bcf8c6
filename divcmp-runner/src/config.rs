//! Serializable comparison configuration (TOML watchlists).
//!
//! A watchlist file names the securities to compare, per-security dividend
//! fixes, and optionally the shared window and artifact prefix:
//!
//! ```toml
//! start = "2000-01-01"
//! prefix = "TW"
//!
//! [[securities]]
//! symbol = "0050.TW"
//! remark = "元大台灣50"
//! replace_dividends = true
//!
//! [[securities]]
//! symbol = "0056.TW"
//! replace_dividends = true
//! [securities.extra_dividends]
//! "2013/10/24" = 0.85
//! ```

use chrono::NaiveDate;
use divcmp_core::{AnalysisWindow, DividendSchedule, SecuritySpec};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

const WINDOW_DATE_FORMAT: &str = "%Y-%m-%d";
const DIVIDEND_DATE_FORMAT: &str = "%Y/%m/%d";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("parsing config {path}: {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },

    #[error("invalid date {value:?} (expected {format})")]
    Date { value: String, format: &'static str },
}

/// One watchlist file: a shared window plus the securities to compare.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareFile {
    /// Window start, `YYYY-MM-DD`.
    pub start: Option<String>,
    /// Window end, `YYYY-MM-DD`.
    pub end: Option<String>,
    #[serde(default)]
    pub prefix: String,
    pub rolling_years: Option<u32>,
    #[serde(default)]
    pub securities: Vec<SecurityEntry>,
}

/// One security in a watchlist.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityEntry {
    pub symbol: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub replace_dividends: bool,
    /// Extra dividends keyed by `YYYY/MM/DD` date strings.
    #[serde(default)]
    pub extra_dividends: BTreeMap<String, f64>,
}

impl CompareFile {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.display().to_string(),
            source,
        })
    }

    /// The file's window, falling back to `default` for absent bounds.
    pub fn window(&self, default: AnalysisWindow) -> Result<AnalysisWindow, ConfigError> {
        let mut window = default;
        if let Some(start) = &self.start {
            window.start = parse_date(start, WINDOW_DATE_FORMAT)?;
        }
        if let Some(end) = &self.end {
            window.end = parse_date(end, WINDOW_DATE_FORMAT)?;
        }
        Ok(window)
    }

    /// Security specs with dividend dates parsed.
    pub fn specs(&self) -> Result<Vec<SecuritySpec>, ConfigError> {
        self.securities.iter().map(SecurityEntry::to_spec).collect()
    }
}

impl SecurityEntry {
    fn to_spec(&self) -> Result<SecuritySpec, ConfigError> {
        let mut extra = DividendSchedule::new();
        for (date, &amount) in &self.extra_dividends {
            extra.insert(parse_date(date, DIVIDEND_DATE_FORMAT)?, amount);
        }

        let mut spec = SecuritySpec::new(self.symbol.clone());
        spec.remark = self.remark.clone();
        spec.replace_dividends = self.replace_dividends;
        spec.extra_dividends = extra;
        Ok(spec)
    }
}

fn parse_date(value: &str, format: &'static str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value, format).map_err(|_| ConfigError::Date {
        value: value.to_string(),
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        start = "2003-06-30"
        prefix = "TW"
        rolling_years = 10

        [[securities]]
        symbol = "0050.TW"
        remark = "元大台灣50"
        replace_dividends = true

        [[securities]]
        symbol = "^TWII"

        [[securities]]
        symbol = "006208.TW"
        replace_dividends = true
        [securities.extra_dividends]
        "2013/10/24" = 0.85
        "2014/10/24" = 1.10
    "#;

    #[test]
    fn parses_watchlist_with_dividend_fixes() {
        let file: CompareFile = toml::from_str(SAMPLE).unwrap();
        assert_eq!(file.prefix, "TW");
        assert_eq!(file.rolling_years, Some(10));

        let specs = file.specs().unwrap();
        assert_eq!(specs.len(), 3);
        assert!(specs[0].replace_dividends);
        assert_eq!(specs[1].symbol, "^TWII");
        assert!(!specs[1].replace_dividends);
        assert_eq!(
            specs[2].extra_dividends[&NaiveDate::from_ymd_opt(2013, 10, 24).unwrap()],
            0.85
        );
        assert_eq!(specs[2].extra_dividends.len(), 2);
    }

    #[test]
    fn window_falls_back_to_default_bounds() {
        let file: CompareFile = toml::from_str(SAMPLE).unwrap();
        let default = AnalysisWindow::new(
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        );
        let window = file.window(default).unwrap();
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2003, 6, 30).unwrap());
        assert_eq!(window.end, default.end);
    }

    #[test]
    fn bad_dividend_date_is_a_config_error() {
        let bad = r#"
            [[securities]]
            symbol = "X"
            [securities.extra_dividends]
            "2013-10-24" = 0.85
        "#;
        let file: CompareFile = toml::from_str(bad).unwrap();
        let err = file.specs().unwrap_err();
        assert!(matches!(err, ConfigError::Date { .. }));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let bad = "starts = \"2000-01-01\"\n";
        assert!(toml::from_str::<CompareFile>(bad).is_err());
    }
}
