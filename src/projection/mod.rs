//! Turns a raw [`QueryResult`] into the artifacts the screen is built from.
//!
//! Projection is pure: the same result always yields the same meta, tables
//! and graph matrices. Only graph colors depend on the current highlight,
//! and those are re-derived with [`recolor`].

pub mod graphs;
pub mod meta;
pub mod palette;
pub mod tables;

pub use graphs::{build_graphs, recolor, GraphData};
pub use meta::{group_key, group_key_from_cells, Op, QueryMeta};
pub use tables::{matches_table, totals_table, Column, Table};

use crate::query::QueryResult;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub meta: Option<QueryMeta>,
    pub matches: Option<Table>,
    pub totals: Option<Table>,
    pub graphs: Option<Vec<GraphData>>,
}

impl Projection {
    pub fn is_empty(&self) -> bool {
        self.meta.is_none() && self.matches.is_none() && self.totals.is_none() && self.graphs.is_none()
    }
}

/// Projects every artifact with no highlight active.
pub fn project(result: &QueryResult) -> Projection {
    let meta = QueryMeta::derive(result);
    let matches = matches_table(result);

    let (totals, graphs) = match &meta {
        Some(meta) => (
            totals_table(result, meta),
            Some(build_graphs(result, meta, None)),
        ),
        None => (None, None),
    };

    Projection {
        meta,
        matches,
        totals,
        graphs,
    }
}
