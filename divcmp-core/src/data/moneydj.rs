//! MoneyDJ dividend-override scraper.
//!
//! Scrapes the per-share payout table from MoneyDJ's ETF profile page.
//! Yahoo's dividend history for some TW-listed ETFs is incomplete, and this
//! page carries the authoritative schedule. The scrape is best-effort by
//! contract: any network or parse failure degrades to an empty schedule.

use super::provider::DividendOverrideSource;
use crate::domain::DividendSchedule;
use chrono::NaiveDate;
use scraper::{Html, Selector};
use std::time::Duration;

const PROFILE_URL: &str = "https://www.moneydj.com/ETF/X/Basic/Basic0005.xdjhtm?etfid=";
const DATE_FORMAT: &str = "%Y/%m/%d";

/// Dividend-override source backed by the MoneyDJ ETF profile page.
pub struct MoneyDjScraper {
    client: reqwest::blocking::Client,
}

impl MoneyDjScraper {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    fn try_fetch(&self, symbol: &str) -> Option<DividendSchedule> {
        let body = self
            .client
            .get(profile_url(symbol))
            .send()
            .ok()?
            .error_for_status()
            .ok()?
            .text()
            .ok()?;

        Some(parse_dividend_table(&body))
    }
}

impl Default for MoneyDjScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl DividendOverrideSource for MoneyDjScraper {
    fn fetch_overrides(&self, symbol: &str) -> DividendSchedule {
        match self.try_fetch(symbol) {
            Some(schedule) => {
                tracing::debug!(symbol, entries = schedule.len(), "scraped dividend overrides");
                schedule
            }
            None => {
                tracing::warn!(symbol, "dividend override scrape failed; continuing without");
                DividendSchedule::new()
            }
        }
    }
}

/// Profile page URL for a symbol. MoneyDJ keys TW-listed ETFs by the full
/// Yahoo symbol, exchange suffix included, so the symbol goes in verbatim.
fn profile_url(symbol: &str) -> String {
    format!("{PROFILE_URL}{symbol}")
}

/// Extract (ex-dividend date, per-share amount) pairs from the profile page.
///
/// Each payout is a row in the `.datalist` table with the ex-dividend date in
/// `.col02` and the per-share amount in `.col07`. Rows that do not parse are
/// skipped.
fn parse_dividend_table(html: &str) -> DividendSchedule {
    let mut schedule = DividendSchedule::new();

    let (Ok(rows), Ok(date_cell), Ok(amount_cell)) = (
        Selector::parse(".datalist tr"),
        Selector::parse(".col02"),
        Selector::parse(".col07"),
    ) else {
        return schedule;
    };

    let document = Html::parse_document(html);
    for row in document.select(&rows) {
        let Some(date_el) = row.select(&date_cell).next() else {
            continue;
        };
        let Some(amount_el) = row.select(&amount_cell).next() else {
            continue;
        };

        let date_text = date_el.text().collect::<String>();
        let amount_text = amount_el.text().collect::<String>();
        let (Ok(date), Ok(amount)) = (
            NaiveDate::parse_from_str(date_text.trim(), DATE_FORMAT),
            amount_text.trim().parse::<f64>(),
        ) else {
            continue;
        };

        schedule.insert(date, amount);
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table class="datalist">
          <tr><th class="col02">除息日</th><th class="col07">配息</th></tr>
          <tr>
            <td class="col02">2023/07/18</td><td class="col05">x</td>
            <td class="col07">1.90</td>
          </tr>
          <tr>
            <td class="col02">2023/01/30</td><td class="col05">y</td>
            <td class="col07">2.60</td>
          </tr>
          <tr>
            <td class="col02">not a date</td><td class="col07">3.00</td>
          </tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn profile_url_keeps_the_exchange_suffix() {
        // The etfid query parameter takes the full symbol; stripping the
        // suffix lands on an empty page and the scrape degrades to an empty
        // schedule with no error.
        assert_eq!(
            profile_url("0050.TW"),
            "https://www.moneydj.com/ETF/X/Basic/Basic0005.xdjhtm?etfid=0050.TW"
        );
    }

    #[test]
    fn parses_date_amount_pairs_and_skips_bad_rows() {
        let schedule = parse_dividend_table(PAGE);
        assert_eq!(schedule.len(), 2);
        assert_eq!(
            schedule[&NaiveDate::from_ymd_opt(2023, 7, 18).unwrap()],
            1.90
        );
        assert_eq!(
            schedule[&NaiveDate::from_ymd_opt(2023, 1, 30).unwrap()],
            2.60
        );
    }

    #[test]
    fn page_without_the_table_yields_an_empty_schedule() {
        assert!(parse_dividend_table("<html><body>maintenance</body></html>").is_empty());
    }

    #[test]
    fn empty_input_yields_an_empty_schedule() {
        assert!(parse_dividend_table("").is_empty());
    }
}
