use crate::projection::meta::QueryMeta;
use crate::query::QueryResult;

pub const TIME_COLUMN: &str = "_time";
const TIME_COLUMN_WIDTH: u16 = 20;
const FIELD_COLUMN_WIDTH: u16 = 10;
const TOTALS_COLUMN_WIDTH: u16 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    pub width: u16,
}

impl Column {
    fn new(title: impl Into<String>, width: u16) -> Self {
        Self {
            title: title.into(),
            width,
        }
    }
}

/// Stringified tabular projection of a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// `_time` followed by the first match's fields in sorted order.
pub fn matches_table(result: &QueryResult) -> Option<Table> {
    let first = result.matches.first()?;

    let mut columns = vec![Column::new(TIME_COLUMN, TIME_COLUMN_WIDTH)];
    columns.extend(first.data.keys().map(|k| Column::new(k.clone(), FIELD_COLUMN_WIDTH)));

    let rows = result
        .matches
        .iter()
        .map(|m| {
            let mut row = Vec::with_capacity(columns.len());
            row.push(m.time.to_string());
            row.extend(
                columns[1..]
                    .iter()
                    .map(|c| m.data.get(&c.title).map(|v| v.to_string()).unwrap_or_default()),
            );
            row
        })
        .collect();

    Some(Table { columns, rows })
}

/// Group dimension columns, then one column per op.
pub fn totals_table(result: &QueryResult, meta: &QueryMeta) -> Option<Table> {
    if result.buckets.totals.is_empty() {
        return None;
    }

    let columns = meta
        .ordered_group_keys
        .iter()
        .map(|k| Column::new(k.clone(), TOTALS_COLUMN_WIDTH))
        .chain(meta.ops.iter().map(|op| Column::new(op.alias.clone(), TOTALS_COLUMN_WIDTH)))
        .collect();

    let rows = result
        .buckets
        .totals
        .iter()
        .map(|total| {
            meta.ordered_group_keys
                .iter()
                .map(|k| total.group.get(k).map(|v| v.to_string()).unwrap_or_default())
                .chain(total.aggregations.iter().map(|a| a.value.to_string()))
                .collect()
        })
        .collect();

    Some(Table { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{EntryGroup, Interval, Match};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_matches_columns_are_sorted_after_time() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let result = QueryResult::new()
            .with_match(
                Match::new(time)
                    .with_field("status", 200)
                    .with_field("duration", 1.5)
                    .with_field("method", "GET"),
            )
            .with_match(Match::new(time).with_field("status", 404));

        let table = matches_table(&result).unwrap();
        let titles: Vec<_> = table.columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["_time", "duration", "method", "status"]);
        assert_eq!(table.columns[0].width, 20);
        assert_eq!(table.columns[1].width, 10);

        assert_eq!(table.rows[0], vec!["2024-03-01 10:00:00 UTC", "1.5", "GET", "200"]);
        assert_eq!(table.rows[1], vec!["2024-03-01 10:00:00 UTC", "", "", "404"]);
    }

    #[test]
    fn test_no_matches_no_table() {
        assert!(matches_table(&QueryResult::new()).is_none());
    }

    #[test]
    fn test_totals_rows() {
        let result = QueryResult::new()
            .with_interval(Interval::new(vec![EntryGroup::new()
                .with_group("svc", "a")
                .with_aggregation("count", 1.0)]))
            .with_total(
                EntryGroup::new()
                    .with_group("svc", "a")
                    .with_aggregation("count", 3.0)
                    .with_aggregation("avg", 0.25),
            );
        let meta = QueryMeta::derive(&result).unwrap();
        let table = totals_table(&result, &meta).unwrap();

        let titles: Vec<_> = table.columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["svc", "count", "avg"]);
        assert_eq!(table.rows, vec![vec!["a", "3", "0.25"]]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_totals_no_table() {
        let result = QueryResult::new().with_interval(Interval::new(vec![]));
        let meta = QueryMeta::derive(&result).unwrap();
        assert!(totals_table(&result, &meta).is_none());
    }
}
