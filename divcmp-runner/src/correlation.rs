//! Pairwise-complete Pearson correlation across securities.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One security's values keyed by date.
pub type DateSeries = BTreeMap<NaiveDate, f64>;

/// Symmetric correlation matrix with one row/column per security label.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// Correlation across all pairs of series.
///
/// Each pair is correlated only over the dates where both series have finite
/// values, the pairwise-complete convention of `DataFrame.corr`. Pairs with
/// fewer than two shared dates, or with a constant series, are NaN.
pub fn correlation_matrix(series: &[(String, DateSeries)]) -> CorrelationMatrix {
    let n = series.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        for j in i..n {
            let r = pairwise_pearson(&series[i].1, &series[j].1);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        labels: series.iter().map(|(label, _)| label.clone()).collect(),
        values,
    }
}

fn pairwise_pearson(a: &DateSeries, b: &DateSeries) -> f64 {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (date, &x) in a {
        if let Some(&y) = b.get(date) {
            if x.is_finite() && y.is_finite() {
                xs.push(x);
                ys.push(y);
            }
        }
    }
    pearson(&xs, &ys)
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 {
        return f64::NAN;
    }

    let nf = n as f64;
    let mean_x = xs.iter().sum::<f64>() / nf;
    let mean_y = ys.iter().sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(points: &[(NaiveDate, f64)]) -> DateSeries {
        points.iter().copied().collect()
    }

    fn daily(values: &[f64]) -> DateSeries {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (date(2020, 1, 1) + chrono::Days::new(i as u64), v))
            .collect()
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let input = vec![
            ("A".to_string(), daily(&[1.0, 2.0, 3.0, 4.0])),
            ("B".to_string(), daily(&[2.0, 1.5, 3.5, 3.0])),
            ("C".to_string(), daily(&[4.0, 3.0, 2.0, 1.0])),
        ];
        let matrix = correlation_matrix(&input);

        for i in 0..3 {
            assert!((matrix.values[i][i] - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
            }
        }
    }

    #[test]
    fn linear_series_correlate_to_plus_and_minus_one() {
        let input = vec![
            ("up".to_string(), daily(&[1.0, 2.0, 3.0, 4.0])),
            ("double".to_string(), daily(&[10.0, 20.0, 30.0, 40.0])),
            ("down".to_string(), daily(&[4.0, 3.0, 2.0, 1.0])),
        ];
        let matrix = correlation_matrix(&input);
        assert!((matrix.values[0][1] - 1.0).abs() < 1e-12);
        assert!((matrix.values[0][2] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn correlation_only_uses_shared_dates() {
        // "a" has an extra early date with an extreme value; a full-series
        // correlation would be far from 1, the shared-dates one is exactly 1.
        let a = series(&[
            (date(2019, 1, 1), 1000.0),
            (date(2020, 1, 1), 1.0),
            (date(2020, 1, 2), 2.0),
            (date(2020, 1, 3), 3.0),
        ]);
        let b = series(&[
            (date(2020, 1, 1), 5.0),
            (date(2020, 1, 2), 6.0),
            (date(2020, 1, 3), 7.0),
        ]);
        let matrix = correlation_matrix(&[("a".to_string(), a), ("b".to_string(), b)]);
        assert!((matrix.values[0][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_yield_nan() {
        let input = vec![
            ("flat".to_string(), daily(&[5.0, 5.0, 5.0])),
            ("moves".to_string(), daily(&[1.0, 2.0, 3.0])),
        ];
        let matrix = correlation_matrix(&input);
        assert!(matrix.values[0][1].is_nan());
    }

    #[test]
    fn disjoint_dates_yield_nan() {
        let a = series(&[(date(2020, 1, 1), 1.0), (date(2020, 1, 2), 2.0)]);
        let b = series(&[(date(2021, 1, 1), 1.0), (date(2021, 1, 2), 2.0)]);
        let matrix = correlation_matrix(&[("a".to_string(), a), ("b".to_string(), b)]);
        assert!(matrix.values[0][1].is_nan());
    }
}
