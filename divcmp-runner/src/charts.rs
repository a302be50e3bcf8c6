//! Plotly chart builders.
//!
//! Each builder turns an aligned table or matrix into a `Plot` that renders
//! as a self-contained interactive HTML document. Missing cells are NaN,
//! which serializes to `null` and leaves gaps instead of fake zeros.

use crate::correlation::CorrelationMatrix;
use crate::table::ReturnTable;
use chrono::NaiveDate;
use plotly::box_plot::BoxMean;
use plotly::common::{Fill, Font, Mode, Title};
use plotly::layout::BarMode;
use plotly::{Bar, BoxPlot, HeatMap, Layout, Plot, Scatter};
use std::fmt::Display;
use std::path::{Path, PathBuf};

fn base_layout(title: &str) -> Layout {
    Layout::new()
        .title(Title::with_text(title))
        .font(Font::new().family("Courier New"))
}

/// Grouped bar chart, one trace per security.
pub fn grouped_bar<K: Ord + Copy + Display>(table: &ReturnTable<K>, title: &str) -> Plot {
    let x: Vec<String> = table.keys().iter().map(|k| k.to_string()).collect();

    let mut plot = Plot::new();
    for (i, label) in table.labels().iter().enumerate() {
        plot.add_trace(Bar::new(x.clone(), table.column(i)).name(label));
    }
    plot.set_layout(base_layout(title).bar_mode(BarMode::Group));
    plot
}

/// Filled-to-zero area chart over dates, one trace per security.
pub fn area(table: &ReturnTable<NaiveDate>, title: &str) -> Plot {
    let x: Vec<String> = table.keys().iter().map(|d| d.to_string()).collect();

    let mut plot = Plot::new();
    for (i, label) in table.labels().iter().enumerate() {
        plot.add_trace(
            Scatter::new(x.clone(), table.column(i))
                .name(label)
                .fill(Fill::ToZeroY)
                .mode(Mode::None),
        );
    }
    plot.set_layout(base_layout(title));
    plot
}

/// Per-security distribution of a table's column values, mean marked.
///
/// plotly.rs has no violin trace; box traces carry the same distribution
/// comparison for the `_RollBack_Violin` artifact.
pub fn distribution<K: Ord + Copy>(table: &ReturnTable<K>, title: &str) -> Plot {
    let mut plot = Plot::new();
    for (i, label) in table.labels().iter().enumerate() {
        let values: Vec<f64> = table
            .column(i)
            .into_iter()
            .filter(|v| v.is_finite())
            .collect();
        plot.add_trace(BoxPlot::new(values).name(label).box_mean(BoxMean::True));
    }
    plot.set_layout(base_layout(title));
    plot
}

/// Correlation heatmap with a fixed [-1, 1] color range.
pub fn heatmap(matrix: &CorrelationMatrix, title: &str) -> Plot {
    let mut plot = Plot::new();
    plot.add_trace(
        HeatMap::new(
            matrix.labels.clone(),
            matrix.labels.clone(),
            matrix.values.clone(),
        )
        .zmin(-1.0)
        .zmax(1.0),
    );
    plot.set_layout(base_layout(title));
    plot
}

/// Write a plot as `{prefix}_{name}.html` under `dir` and return the path.
pub fn write_chart(plot: &Plot, dir: &Path, prefix: &str, name: &str) -> PathBuf {
    let path = dir.join(format!("{prefix}_{name}.html"));
    plot.write_html(&path);
    path
}
