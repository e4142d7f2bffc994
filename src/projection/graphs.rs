use crate::projection::meta::{group_key, QueryMeta};
use crate::projection::palette::DIMMED;
use crate::query::QueryResult;
use ratatui::style::Color;

/// Per-op time series matrix, one row per group and one column per interval.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphData {
    pub title: String,
    /// `[groups][intervals]`; NaN marks a missing or non-numeric cell.
    pub data: Vec<Vec<f64>>,
    /// Row colors, aligned with `data`.
    pub colors: Vec<Color>,
}

impl GraphData {
    /// Finite (min, max) over all cells, if any cell is finite.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Points of one row with NaN cells dropped, as `(interval, value)`.
    pub fn points(&self, row: usize) -> Vec<(f64, f64)> {
        self.data
            .get(row)
            .map(|values| {
                values
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| !v.is_nan())
                    .map(|(i, v)| (i as f64, *v))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub fn build_graphs(result: &QueryResult, meta: &QueryMeta, highlight: Option<&str>) -> Vec<GraphData> {
    let colors = series_colors(meta, highlight);

    let mut graphs: Vec<GraphData> = meta
        .ops
        .iter()
        .map(|op| GraphData {
            title: op.alias.clone(),
            data: vec![vec![f64::NAN; meta.intervals]; meta.groups.len()],
            colors: colors.clone(),
        })
        .collect();

    for (interval_idx, interval) in result.buckets.series.iter().enumerate() {
        for entry in &interval.groups {
            let key = group_key(&meta.ordered_group_keys, &entry.group);
            let Some(row) = meta.group_index(&key) else {
                continue;
            };

            // Aggregations beyond the ops known from totals have no graph.
            for (graph, aggregation) in graphs.iter_mut().zip(entry.aggregations.iter()) {
                graph.data[row][interval_idx] = aggregation.value.as_float_or_nan();
            }
        }
    }

    graphs
}

/// Re-derives row colors only; matrix data is left untouched.
pub fn recolor(graphs: &mut [GraphData], meta: &QueryMeta, highlight: Option<&str>) {
    let colors = series_colors(meta, highlight);
    for graph in graphs {
        graph.colors = colors.clone();
    }
}

fn series_colors(meta: &QueryMeta, highlight: Option<&str>) -> Vec<Color> {
    meta.groups
        .iter()
        .map(|group| match highlight {
            Some(h) if h != group => DIMMED,
            _ => meta.color_of(group),
        })
        .collect()
}
