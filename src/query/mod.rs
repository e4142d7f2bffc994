pub mod client;
pub mod mock;
pub mod value;

pub use client::{HttpQueryClient, QueryClient};
pub use mock::MockQueryClient;
pub use value::Scalar;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of an APL query submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub apl: String,
}

impl QueryRequest {
    pub fn new(apl: impl Into<String>) -> Self {
        Self { apl: apl.into() }
    }
}

/// A single raw event returned by a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "_time")]
    pub time: DateTime<Utc>,
    #[serde(rename = "_sysTime", default, skip_serializing_if = "Option::is_none")]
    pub sys_time: Option<DateTime<Utc>>,
    #[serde(rename = "_rowId", default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
    #[serde(default)]
    pub data: BTreeMap<String, Scalar>,
}

impl Match {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time,
            sys_time: None,
            row_id: None,
            data: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    #[serde(rename = "op")]
    pub alias: String,
    pub value: Scalar,
}

impl Aggregation {
    pub fn new(alias: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            alias: alias.into(),
            value: value.into(),
        }
    }
}

/// Group dimension assignment plus its aggregations, for one interval or for
/// the whole range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryGroup {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub group: BTreeMap<String, Scalar>,
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,
}

impl EntryGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.group.insert(key.into(), value.into());
        self
    }

    pub fn with_aggregation(mut self, alias: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.aggregations.push(Aggregation::new(alias, value));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub groups: Vec<EntryGroup>,
}

impl Interval {
    pub fn new(groups: Vec<EntryGroup>) -> Self {
        Self {
            start_time: None,
            end_time: None,
            groups,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Buckets {
    #[serde(default)]
    pub series: Vec<Interval>,
    #[serde(default)]
    pub totals: Vec<EntryGroup>,
}

/// Response of a query, immutable once received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub buckets: Buckets,
}

impl QueryResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match(mut self, m: Match) -> Self {
        self.matches.push(m);
        self
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.buckets.series.push(interval);
        self
    }

    pub fn with_total(mut self, total: EntryGroup) -> Self {
        self.buckets.totals.push(total);
        self
    }

    pub fn intervals(&self) -> usize {
        self.buckets.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.buckets.series.is_empty() && self.buckets.totals.is_empty()
    }
}
