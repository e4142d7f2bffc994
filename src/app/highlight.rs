use crate::app::model::Model;
use crate::projection::{group_key_from_cells, recolor, QueryMeta};

/// Group key of a totals row: its leading group-dimension cells joined the
/// same way projection joins group values. `None` for ungrouped results.
pub fn group_for_row<S: AsRef<str>>(meta: &QueryMeta, row: &[S]) -> Option<String> {
    let dimensions = meta.ordered_group_keys.len();
    if dimensions == 0 || row.len() < dimensions {
        return None;
    }
    Some(group_key_from_cells(&row[..dimensions]))
}

/// Sets the highlighted group and re-derives graph colors.
pub fn set_highlight(model: &mut Model, group: Option<String>) {
    model.highlighted_group = group;
    if let (Some(meta), Some(graphs)) = (&model.meta, &mut model.graphs) {
        recolor(graphs, meta, model.highlighted_group.as_deref());
    }
}

/// Highlights the group of the totals table's selected row.
pub fn highlight_selected_total(model: &mut Model) {
    let group = match (&model.meta, &model.totals) {
        (Some(meta), Some(totals)) => totals.selected_row().and_then(|row| group_for_row(meta, row)),
        _ => None,
    };
    set_highlight(model, group);
}

/// Moves the matches highlight by `delta`, clamped to the table. With no
/// highlight yet, any move selects the first row.
pub fn step_matches_highlight(model: &mut Model, delta: isize) {
    let Some(matches) = &mut model.matches else {
        return;
    };
    if matches.table.is_empty() {
        return;
    }

    let last = matches.table.len() as isize - 1;
    let current = model.matches_highlighted.map(|i| i as isize).unwrap_or(-1);
    let next = (current + delta).clamp(0, last) as usize;

    matches.select(next);
    model.matches_highlighted = Some(next);
}
