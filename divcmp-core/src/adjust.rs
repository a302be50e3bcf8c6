//! Dividend adjustment engine.
//!
//! Merges raw, extra, and override dividend sources into one schedule, then
//! derives a cumulative adjustment ratio per record and a dividend-adjusted
//! close series from it. Both steps are pure functions of their inputs.

use crate::domain::{DailyRecord, DividendSchedule};
use crate::error::InvalidInput;

/// Merge the three dividend sources into one working schedule.
///
/// Precedence, lowest to highest: raw history dividends (dropped entirely
/// when `replace` is set), caller-supplied extra dividends, scraped override
/// dividends. Later sources insert or overwrite on exact date match, so an
/// override wins when all three carry the same date. Zero-valued raw entries
/// are discarded.
pub fn build_schedule(
    records: &[DailyRecord],
    extra: &DividendSchedule,
    overrides: &DividendSchedule,
    replace: bool,
) -> DividendSchedule {
    let mut schedule = DividendSchedule::new();

    if !replace {
        for record in records {
            if record.dividend != 0.0 {
                schedule.insert(record.date, record.dividend);
            }
        }
    }

    for (&date, &amount) in extra {
        schedule.insert(date, amount);
    }
    for (&date, &amount) in overrides {
        schedule.insert(date, amount);
    }

    schedule
}

/// Apply a dividend schedule to an ascending-by-date record sequence.
///
/// Each schedule entry multiplies the adjustment ratio of every record dated
/// strictly before it by `1 - amount / close`, where `close` is the close of
/// the last record before the dividend date. A dividend with no earlier
/// record contributes nothing. Entries only touch records before their own
/// date, so processing order does not affect the result.
///
/// Errors with [`InvalidInput::ZeroClose`] when the reference close of a
/// dividend event is zero.
pub fn apply_schedule(
    mut records: Vec<DailyRecord>,
    schedule: &DividendSchedule,
) -> Result<Vec<DailyRecord>, InvalidInput> {
    for (&div_date, &amount) in schedule {
        let cut = records.partition_point(|r| r.date < div_date);
        if cut == 0 {
            continue;
        }

        let reference_date = records[cut - 1].date;
        let reference_close = records[cut - 1].close;
        if reference_close == 0.0 {
            return Err(InvalidInput::ZeroClose {
                date: reference_date,
            });
        }

        let factor = 1.0 - amount / reference_close;
        for record in &mut records[..cut] {
            record.adj_ratio *= factor;
        }
    }

    for record in &mut records {
        record.adj_close = record.close * record.adj_ratio;
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn records(closes: &[(NaiveDate, f64)]) -> Vec<DailyRecord> {
        closes
            .iter()
            .map(|&(d, c)| DailyRecord::from_close(d, c))
            .collect()
    }

    #[test]
    fn empty_schedule_leaves_closes_untouched() {
        let input = records(&[
            (date(2020, 1, 2), 100.0),
            (date(2020, 1, 3), 101.5),
            (date(2020, 1, 6), 99.25),
        ]);
        let out = apply_schedule(input, &DividendSchedule::new()).unwrap();
        for record in &out {
            assert_eq!(record.adj_ratio, 1.0);
            assert_eq!(record.adj_close, record.close);
        }
    }

    #[test]
    fn single_dividend_scales_only_earlier_records() {
        let input = records(&[
            (date(2020, 1, 2), 80.0),
            (date(2020, 1, 3), 100.0),
            (date(2020, 1, 6), 95.0),
            (date(2020, 1, 7), 96.0),
        ]);
        // Dividend of 10 on 2020-01-06; reference close is 100.0 (2020-01-03).
        let mut schedule = DividendSchedule::new();
        schedule.insert(date(2020, 1, 6), 10.0);

        let out = apply_schedule(input, &schedule).unwrap();
        assert_eq!(out[0].adj_ratio, 0.9);
        assert_eq!(out[1].adj_ratio, 0.9);
        assert_eq!(out[2].adj_ratio, 1.0);
        assert_eq!(out[3].adj_ratio, 1.0);
        assert_eq!(out[0].adj_close, 80.0 * 0.9);
        assert_eq!(out[2].adj_close, 95.0);
    }

    #[test]
    fn dividend_before_all_records_is_a_no_op() {
        let input = records(&[(date(2020, 1, 2), 100.0), (date(2020, 1, 3), 101.0)]);
        let mut schedule = DividendSchedule::new();
        schedule.insert(date(2019, 12, 31), 5.0);

        let out = apply_schedule(input, &schedule).unwrap();
        assert_eq!(out[0].adj_ratio, 1.0);
        assert_eq!(out[1].adj_ratio, 1.0);
    }

    #[test]
    fn zero_reference_close_is_an_error() {
        let input = records(&[(date(2020, 1, 2), 0.0), (date(2020, 1, 3), 101.0)]);
        let mut schedule = DividendSchedule::new();
        schedule.insert(date(2020, 1, 3), 1.0);

        let err = apply_schedule(input, &schedule).unwrap_err();
        assert_eq!(
            err,
            InvalidInput::ZeroClose {
                date: date(2020, 1, 2)
            }
        );
    }

    #[test]
    fn override_beats_extra_beats_raw_on_the_same_date() {
        let mut raw = records(&[(date(2020, 1, 2), 100.0), (date(2020, 1, 3), 100.0)]);
        raw[1].dividend = 1.0;

        let mut extra = DividendSchedule::new();
        extra.insert(date(2020, 1, 3), 2.0);
        let mut overrides = DividendSchedule::new();
        overrides.insert(date(2020, 1, 3), 3.0);

        let schedule = build_schedule(&raw, &extra, &overrides, false);
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[&date(2020, 1, 3)], 3.0);
    }

    #[test]
    fn replace_flag_drops_raw_dividends_first() {
        let mut input = records(&[
            (date(2020, 1, 2), 100.0),
            (date(2020, 1, 3), 100.0),
            (date(2020, 6, 1), 100.0),
        ]);
        input[1].dividend = 1.0;
        input[2].dividend = 2.5;

        let mut overrides = DividendSchedule::new();
        overrides.insert(date(2020, 6, 1), 4.0);

        let schedule = build_schedule(&input, &DividendSchedule::new(), &overrides, true);
        // 2020-01-03 raw entry is gone, 2020-06-01 comes only from the override.
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[&date(2020, 6, 1)], 4.0);
    }

    #[test]
    fn zero_raw_dividends_never_enter_the_schedule() {
        let input = records(&[(date(2020, 1, 2), 100.0), (date(2020, 1, 3), 100.0)]);
        let schedule =
            build_schedule(&input, &DividendSchedule::new(), &DividendSchedule::new(), false);
        assert!(schedule.is_empty());
    }

    #[test]
    fn duplicate_writes_to_one_date_replace_rather_than_accumulate() {
        let mut input = records(&[(date(2020, 1, 2), 100.0), (date(2020, 1, 3), 100.0)]);
        input[1].dividend = 5.0;

        let mut extra = DividendSchedule::new();
        extra.insert(date(2020, 1, 3), 5.0);
        let mut overrides = DividendSchedule::new();
        overrides.insert(date(2020, 1, 3), 5.0);

        // Three writes of the same (date, amount) collapse to one entry, so
        // the ratio is identical to applying the event once.
        let schedule = build_schedule(&input, &extra, &overrides, false);
        let out = apply_schedule(input, &schedule).unwrap();
        assert_eq!(out[0].adj_ratio, 1.0 - 5.0 / 100.0);
    }
}
