use crate::app::{Fragment, Screen, TableView, TextBuffer};
use crate::projection::GraphData;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState};
use ratatui::Frame;

const GRAPH_HEIGHT: u16 = 12;
const TOTALS_MAX_HEIGHT: u16 = 12;
const MATCHES_MIN_HEIGHT: u16 = 6;
const DETAIL_MAX_HEIGHT: u16 = 16;

const BORDER_COLOR: Color = Color::Indexed(69);
const PLACEHOLDER_COLOR: Color = Color::DarkGray;
const ERROR_COLOR: Color = Color::Red;

fn selected_style() -> Style {
    Style::default().fg(Color::Indexed(229)).bg(Color::Indexed(57))
}

pub fn draw(frame: &mut Frame<'_>, screen: &Screen<'_>) {
    match screen {
        Screen::Splash { banner, color } => draw_splash(frame, banner, *color),
        Screen::Dashboard(fragments) => draw_dashboard(frame, fragments),
    }
}

fn draw_splash(frame: &mut Frame<'_>, banner: &str, color: Color) {
    let height = banner.lines().count() as u16;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(height), Constraint::Min(0)])
        .split(frame.area());

    let splash = Paragraph::new(banner)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    frame.render_widget(splash, rows[1]);
}

fn fragment_height(fragment: &Fragment<'_>) -> Constraint {
    match fragment {
        Fragment::Status(_) | Fragment::Error(_) => Constraint::Length(1),
        Fragment::QueryInput(_) => Constraint::Length(3),
        Fragment::Graphs(_) => Constraint::Length(GRAPH_HEIGHT),
        Fragment::Totals { table, .. } => {
            Constraint::Length((table.table.len() as u16).saturating_add(3).min(TOTALS_MAX_HEIGHT))
        }
        Fragment::Matches { .. } => Constraint::Min(MATCHES_MIN_HEIGHT),
        Fragment::MatchDetail(json) => {
            Constraint::Length((json.lines().count() as u16).saturating_add(2).min(DETAIL_MAX_HEIGHT))
        }
    }
}

fn draw_dashboard(frame: &mut Frame<'_>, fragments: &[Fragment<'_>]) {
    let constraints: Vec<Constraint> = fragments.iter().map(fragment_height).collect();
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    for (fragment, area) in fragments.iter().zip(areas.iter().copied()) {
        match fragment {
            Fragment::Status(text) => frame.render_widget(Paragraph::new(text.as_str()), area),
            Fragment::QueryInput(input) => draw_input(frame, input, area),
            Fragment::Error(text) => frame.render_widget(
                Paragraph::new(text.as_str()).style(Style::default().fg(ERROR_COLOR)),
                area,
            ),
            Fragment::Graphs(graphs) => draw_graphs(frame, graphs, area),
            Fragment::Totals { table, highlighted } => draw_table(frame, "Totals", table, *highlighted, area),
            Fragment::Matches { table, highlighted } => draw_table(frame, "Matches", table, *highlighted, area),
            Fragment::MatchDetail(json) => frame.render_widget(
                Paragraph::new(json.as_str()).block(bordered("Match")),
                area,
            ),
        }
    }
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

fn draw_input(frame: &mut Frame<'_>, input: &TextBuffer, area: Rect) {
    let paragraph = if input.value().is_empty() {
        Paragraph::new(input.placeholder).style(Style::default().fg(PLACEHOLDER_COLOR))
    } else {
        Paragraph::new(input.value())
    };
    frame.render_widget(paragraph.block(bordered("Query")), area);

    if input.is_focused() {
        let x = area.x + 1 + input.cursor() as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn axis_bounds(graph: &GraphData) -> (f64, f64) {
    match graph.value_bounds() {
        Some((lo, hi)) if lo == hi => (lo - 1.0, hi + 1.0),
        Some(bounds) => bounds,
        None => (0.0, 1.0),
    }
}

fn draw_graphs(frame: &mut Frame<'_>, graphs: &[GraphData], area: Rect) {
    let count = graphs.len() as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(graphs.iter().map(|_| Constraint::Ratio(1, count)))
        .split(area);

    for (graph, column) in graphs.iter().zip(columns.iter().copied()) {
        let series: Vec<Vec<(f64, f64)>> = (0..graph.data.len()).map(|row| graph.points(row)).collect();
        let datasets: Vec<Dataset<'_>> = series
            .iter()
            .zip(graph.colors.iter())
            .map(|(points, color)| {
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(*color))
                    .data(points)
            })
            .collect();

        let intervals = graph.data.first().map(|row| row.len()).unwrap_or(0);
        let x_max = intervals.saturating_sub(1).max(1) as f64;
        let (lo, hi) = axis_bounds(graph);

        let chart = Chart::new(datasets)
            .block(bordered(&graph.title))
            .x_axis(Axis::default().bounds([0.0, x_max]))
            .y_axis(
                Axis::default()
                    .bounds([lo, hi])
                    .labels(vec![Span::raw(format!("{:.0}", lo)), Span::raw(format!("{:.0}", hi))]),
            );
        frame.render_widget(chart, column);
    }
}

fn draw_table(frame: &mut Frame<'_>, title: &str, view: &TableView, highlighted: bool, area: Rect) {
    let header = Row::new(view.table.columns.iter().map(|c| c.title.clone()))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = view.table.rows.iter().map(|cells| Row::new(cells.clone()));
    let widths = view.table.columns.iter().map(|c| Constraint::Length(c.width));

    let mut table = Table::new(rows, widths).header(header).block(bordered(title));
    let mut state = TableState::default();
    if highlighted {
        table = table.highlight_style(selected_style());
        state = state.with_selected(Some(view.selected()));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
