//! Aligned multi-security tables.
//!
//! Per-security result sequences rarely share keys exactly (different
//! listing dates, different payout calendars), so assembly is an outer join:
//! every key from every column appears, and cells a column has no value for
//! are NaN, never zero.

use std::collections::BTreeMap;

/// Outer-joined table keyed by a sortable row key, one column per security.
#[derive(Debug, Clone)]
pub struct ReturnTable<K: Ord + Copy> {
    labels: Vec<String>,
    rows: BTreeMap<K, Vec<f64>>,
}

impl<K: Ord + Copy> ReturnTable<K> {
    /// Outer join of `(label, cells)` columns.
    pub fn from_columns(columns: Vec<(String, Vec<(K, f64)>)>) -> Self {
        let width = columns.len();
        let mut labels = Vec::with_capacity(width);
        let mut rows: BTreeMap<K, Vec<f64>> = BTreeMap::new();

        for (i, (label, cells)) in columns.into_iter().enumerate() {
            labels.push(label);
            for (key, value) in cells {
                rows.entry(key).or_insert_with(|| vec![f64::NAN; width])[i] = value;
            }
        }

        Self { labels, rows }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Row keys in ascending order.
    pub fn keys(&self) -> Vec<K> {
        self.rows.keys().copied().collect()
    }

    /// Column `idx` over all row keys in ascending order, NaN where absent.
    pub fn column(&self, idx: usize) -> Vec<f64> {
        self.rows.values().map(|row| row[idx]).collect()
    }

    pub fn get(&self, key: K, idx: usize) -> Option<f64> {
        self.rows.get(&key).map(|row| row[idx])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_key(&self) -> Option<K> {
        self.rows.keys().next().copied()
    }

    pub fn last_key(&self) -> Option<K> {
        self.rows.keys().next_back().copied()
    }

    /// The table restricted to rows where every column has a value — the
    /// key intersection of all securities.
    pub fn complete_rows(&self) -> Self {
        let rows = self
            .rows
            .iter()
            .filter(|(_, row)| row.iter().all(|v| !v.is_nan()))
            .map(|(&k, row)| (k, row.clone()))
            .collect();
        Self {
            labels: self.labels.clone(),
            rows,
        }
    }
}
