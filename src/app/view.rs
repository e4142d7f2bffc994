//! Composes the screen for the current model.
//!
//! Assembly is a read-only walk over the [`Model`]; the terminal backend
//! turns the resulting [`Screen`] into widgets.

use crate::app::model::{Model, State, TableView, TextBuffer};
use crate::projection::palette::pulse_color;
use crate::projection::GraphData;
use ratatui::style::Color;

pub const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub const SPLASH_BANNER: &str = "\
 █████  ██   ██ ██  ██████  ███    ███
██   ██  ██ ██  ██ ██    ██ ████  ████
███████   ███   ██ ██    ██ ██ ████ ██
██   ██  ██ ██  ██ ██    ██ ██  ██  ██
██   ██ ██   ██ ██  ██████  ██      ██";

#[derive(Debug)]
pub enum Screen<'a> {
    Splash { banner: &'static str, color: Color },
    Dashboard(Vec<Fragment<'a>>),
}

/// One vertical section of the dashboard, top to bottom.
#[derive(Debug)]
pub enum Fragment<'a> {
    Status(String),
    QueryInput(&'a TextBuffer),
    Error(String),
    Graphs(&'a [GraphData]),
    Totals { table: &'a TableView, highlighted: bool },
    Matches { table: &'a TableView, highlighted: bool },
    MatchDetail(String),
}

pub fn assemble(model: &Model) -> Screen<'_> {
    if !model.ready {
        return Screen::Splash {
            banner: SPLASH_BANNER,
            color: pulse_color(model.pulse_step),
        };
    }

    let mut fragments = Vec::new();

    if let Some(status) = status_line(model) {
        fragments.push(Fragment::Status(status));
    }
    fragments.push(Fragment::QueryInput(&model.input));

    if let Some(err) = &model.error {
        fragments.push(Fragment::Error(format!("Error: {}", err)));
    }
    if let Some(graphs) = model.graphs.as_deref().filter(|g| !g.is_empty()) {
        fragments.push(Fragment::Graphs(graphs));
    }
    if let Some(totals) = &model.totals {
        fragments.push(Fragment::Totals {
            table: totals,
            highlighted: model.highlighted_group.is_some(),
        });
    }
    if let Some(matches) = &model.matches {
        fragments.push(Fragment::Matches {
            table: matches,
            highlighted: model.matches_highlighted.is_some(),
        });
    }
    if let Some(detail) = match_detail(model) {
        fragments.push(Fragment::MatchDetail(detail));
    }

    Screen::Dashboard(fragments)
}

fn status_line(model: &Model) -> Option<String> {
    match model.state {
        State::Querying => {
            let frame = SPINNER_FRAMES[model.spinner_frame % SPINNER_FRAMES.len()];
            Some(format!("{} {}", frame, model.status))
        }
        State::Refreshing => Some(format!("Refresh in {}", model.refresh_timeout)),
        State::Typing => None,
    }
}

fn match_detail(model: &Model) -> Option<String> {
    model.matches.as_ref()?;
    let idx = model.matches_highlighted?;
    let m = model.result.as_ref()?.matches.get(idx)?;
    serde_json::to_string_pretty(m).ok()
}
