use crate::projection::palette::color_for_group;
use crate::query::{QueryResult, Scalar};
use ratatui::style::Color;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const GROUP_KEY_SEPARATOR: &str = ", ";

/// A named aggregation; each one becomes a graph and a totals column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op {
    pub alias: String,
}

/// Shape of a result, derived once per response.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryMeta {
    /// Group dimension names, sorted. The same list is used everywhere a
    /// group key is formed.
    pub ordered_group_keys: Vec<String>,
    /// Distinct group keys, sorted.
    pub groups: Vec<String>,
    pub ops: Vec<Op>,
    pub ops_count: usize,
    pub intervals: usize,
    pub group_colors: HashMap<String, Color>,
}

impl QueryMeta {
    /// Returns `None` when the result has no intervals.
    pub fn derive(result: &QueryResult) -> Option<Self> {
        let series = &result.buckets.series;
        if series.is_empty() {
            return None;
        }

        // Union of dimension names over every entry group, so a shape change
        // between intervals cannot shift values into the wrong position.
        let dimensions: BTreeSet<&String> = series
            .iter()
            .flat_map(|interval| interval.groups.iter())
            .chain(result.buckets.totals.iter())
            .flat_map(|entry| entry.group.keys())
            .collect();
        let ordered_group_keys: Vec<String> = dimensions.into_iter().cloned().collect();

        let mut ops_count = 0;
        let mut groups = BTreeSet::new();
        for entry in series.iter().flat_map(|interval| interval.groups.iter()) {
            ops_count = ops_count.max(entry.aggregations.len());
            groups.insert(group_key(&ordered_group_keys, &entry.group));
        }
        let groups: Vec<String> = groups.into_iter().collect();

        let mut ops: Vec<Op> = Vec::new();
        for aggregation in result.buckets.totals.iter().flat_map(|t| t.aggregations.iter()) {
            if !ops.iter().any(|op| op.alias == aggregation.alias) {
                ops.push(Op {
                    alias: aggregation.alias.clone(),
                });
            }
        }

        let group_colors = groups
            .iter()
            .map(|g| (g.clone(), color_for_group(g)))
            .collect();

        Some(Self {
            ordered_group_keys,
            groups,
            ops,
            ops_count,
            intervals: series.len(),
            group_colors,
        })
    }

    /// Position of a group key in the sorted `groups`.
    pub fn group_index(&self, key: &str) -> Option<usize> {
        self.groups.binary_search_by(|g| g.as_str().cmp(key)).ok()
    }

    pub fn color_of(&self, key: &str) -> Color {
        self.group_colors
            .get(key)
            .copied()
            .unwrap_or_else(|| color_for_group(key))
    }
}

/// Joins the values of `group` in `ordered_keys` order. Missing dimensions
/// contribute an empty string.
pub fn group_key(ordered_keys: &[String], group: &BTreeMap<String, Scalar>) -> String {
    ordered_keys
        .iter()
        .map(|k| group.get(k).map(|v| v.to_string()).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(GROUP_KEY_SEPARATOR)
}

/// Same as [`group_key`] for values that are already strings, in dimension order.
pub fn group_key_from_cells<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join(GROUP_KEY_SEPARATOR)
}
