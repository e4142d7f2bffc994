//! The state machine sequencing Typing, Querying and Refreshing.
//!
//! [`update`] is the only place the [`Model`] is mutated. Every external
//! happening (keys, query completions, ticks) arrives as an [`Event`], and
//! any follow-up work is returned as [`Command`]s for the event loop to run.

use crate::app::event::{Command, EmitEvent, Event, Key, QueryOutcome, TickKind, Ticker};
use crate::app::highlight::{highlight_selected_total, step_matches_highlight};
use crate::app::model::{Model, State, TableView, RUNNING_QUERY};
use crate::app::view::SPINNER_FRAMES;
use crate::projection::{project, recolor};
use tracing::{debug, info, warn};
use uuid::Uuid;

const PULSE_STEPS: usize = 10;

/// Commands to run at startup: the splash pulse.
pub fn init(model: &mut Model) -> Vec<Command> {
    vec![Command::StartTicker(model.next_ticker(TickKind::Pulse))]
}

pub fn update(model: &mut Model, event: Event) -> Vec<Command> {
    match event {
        Event::Key(key) => on_key(model, key),
        Event::ResultArrived(outcome) => on_result(model, outcome),
        Event::Tick(ticker) => on_tick(model, ticker),
        Event::ReRun => on_rerun(model),
        Event::Resize => Vec::new(),
    }
}

fn on_key(model: &mut Model, key: Key) -> Vec<Command> {
    if key == Key::CtrlC {
        return vec![Command::Quit];
    }

    if !model.ready {
        // The first key only dismisses the splash.
        model.ready = true;
        return Vec::new();
    }

    match model.state {
        State::Typing => match key {
            Key::Enter => {
                let apl = model.input.value().trim().to_string();
                if apl.is_empty() {
                    Vec::new()
                } else {
                    submit(model, apl)
                }
            }
            _ => {
                model.input.handle_key(key);
                Vec::new()
            }
        },
        State::Querying => Vec::new(),
        State::Refreshing => match key {
            Key::Esc => {
                model.input.focus();
                model.state = State::Typing;
                Vec::new()
            }
            _ => {
                navigate(model, key);
                Vec::new()
            }
        },
    }
}

fn navigate(model: &mut Model, key: Key) {
    if let Some(totals) = &mut model.totals {
        if totals.is_focused() {
            totals.handle_key(key);
        } else {
            // First key only focuses, so the current row gets highlighted
            totals.focus();
        }
        highlight_selected_total(model);
    } else if model.matches.is_some() {
        match key {
            Key::Down => step_matches_highlight(model, 1),
            Key::Up => step_matches_highlight(model, -1),
            _ => {}
        }
    }
}

fn submit(model: &mut Model, apl: String) -> Vec<Command> {
    let request_id = Uuid::new_v4();
    info!("Submitting query {}", request_id);
    debug!("APL: {}", apl);

    model.status = RUNNING_QUERY.to_string();
    model.state = State::Querying;
    model.pending_request = Some(request_id);

    vec![
        Command::Submit { request_id, apl },
        Command::StartTicker(model.next_ticker(TickKind::Spinner)),
    ]
}

fn on_result(model: &mut Model, outcome: QueryOutcome) -> Vec<Command> {
    if model.pending_request == Some(outcome.request_id) {
        model.pending_request = None;
    } else {
        debug!("Result of superseded request {} accepted", outcome.request_id);
    }

    model.input.blur();
    model.highlighted_group = None;
    model.last_apl = outcome.apl;

    match outcome.result {
        Ok(result) => {
            let projection = project(&result);
            info!(
                "Query {} returned {} matches, {} intervals",
                outcome.request_id,
                result.matches.len(),
                result.intervals()
            );

            model.error = None;
            model.meta = projection.meta;
            model.graphs = projection.graphs;
            model.totals = projection.totals.map(|t| TableView::new(t, false));
            model.matches = projection.matches.map(|t| TableView::new(t, true));
            model.matches_highlighted = None;
            model.result = Some(result);
        }
        Err(e) => {
            warn!("Query {} failed: {}", outcome.request_id, e);

            model.error = Some(e.to_string());
            if let (Some(meta), Some(graphs)) = (&model.meta, &mut model.graphs) {
                recolor(graphs, meta, None);
            }
            if let Some(totals) = &mut model.totals {
                totals.blur();
            }
        }
    }

    arm_refresh(model)
}

fn arm_refresh(model: &mut Model) -> Vec<Command> {
    model.refresh_timeout = model.refresh_seconds;
    model.state = State::Refreshing;
    vec![Command::StartTicker(model.next_ticker(TickKind::Refresh))]
}

fn on_tick(model: &mut Model, ticker: Ticker) -> Vec<Command> {
    if !model.gates().is_live(ticker) {
        return Vec::new();
    }

    match ticker.kind {
        TickKind::Spinner => {
            model.spinner_frame = (model.spinner_frame + 1) % SPINNER_FRAMES.len();
            Vec::new()
        }
        TickKind::Pulse => {
            model.pulse_step = match model.pulse_step {
                0 => PULSE_STEPS - 1,
                step => step - 1,
            };
            Vec::new()
        }
        TickKind::Refresh => {
            if model.refresh_timeout <= 1 {
                vec![Command::Emit(EmitEvent::ReRun)]
            } else {
                model.refresh_timeout -= 1;
                Vec::new()
            }
        }
    }
}

fn on_rerun(model: &mut Model) -> Vec<Command> {
    if model.state != State::Refreshing || model.last_apl.is_empty() {
        return Vec::new();
    }
    let apl = model.last_apl.clone();
    submit(model, apl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AxtopError;
    use crate::projection::palette::{color_for_group, DIMMED};
    use crate::query::{EntryGroup, Interval, QueryResult};

    fn ready_model() -> Model {
        let mut model = Model::new(5);
        init(&mut model);
        update(&mut model, Event::Key(Key::Char('x')));
        model
    }

    fn type_text(model: &mut Model, text: &str) {
        for c in text.chars() {
            update(model, Event::Key(Key::Char(c)));
        }
    }

    fn submitted(commands: &[Command]) -> (Uuid, String) {
        commands
            .iter()
            .find_map(|c| match c {
                Command::Submit { request_id, apl } => Some((*request_id, apl.clone())),
                _ => None,
            })
            .expect("a submit command")
    }

    fn started(commands: &[Command], kind: TickKind) -> Ticker {
        commands
            .iter()
            .find_map(|c| match c {
                Command::StartTicker(t) if t.kind == kind => Some(*t),
                _ => None,
            })
            .expect("a ticker")
    }

    fn two_groups() -> QueryResult {
        QueryResult::new()
            .with_interval(Interval::new(vec![
                EntryGroup::new().with_group("svc", "a").with_aggregation("avg", 10.0),
                EntryGroup::new().with_group("svc", "b").with_aggregation("avg", 20.0),
            ]))
            .with_total(EntryGroup::new().with_group("svc", "a").with_aggregation("avg", 10.0))
            .with_total(EntryGroup::new().with_group("svc", "b").with_aggregation("avg", 20.0))
    }

    fn arrive(model: &mut Model, request_id: Uuid, apl: &str, result: Result<QueryResult, AxtopError>) -> Vec<Command> {
        update(
            model,
            Event::ResultArrived(QueryOutcome {
                request_id,
                apl: apl.to_string(),
                result,
            }),
        )
    }

    #[test]
    fn test_first_key_only_dismisses_splash() {
        let mut model = Model::new(5);
        let commands = init(&mut model);
        assert_eq!(started(&commands, TickKind::Pulse).generation, 1);

        update(&mut model, Event::Key(Key::Char('q')));
        assert!(model.ready);
        assert_eq!(model.state, State::Typing);
        assert_eq!(model.input.value(), "");
    }

    #[test]
    fn test_pulse_cycles_while_not_ready() {
        let mut model = Model::new(5);
        let pulse = started(&init(&mut model), TickKind::Pulse);

        let steps: Vec<usize> = (0..11)
            .map(|_| {
                update(&mut model, Event::Tick(pulse));
                model.pulse_step
            })
            .collect();
        assert_eq!(steps, vec![8, 7, 6, 5, 4, 3, 2, 1, 0, 9, 8]);

        update(&mut model, Event::Key(Key::Enter));
        update(&mut model, Event::Tick(pulse));
        assert_eq!(model.pulse_step, 8);
    }

    #[test]
    fn test_ctrl_c_quits_without_mutation() {
        let mut model = Model::new(5);
        assert_eq!(update(&mut model, Event::Key(Key::CtrlC)), vec![Command::Quit]);
        assert!(!model.ready);

        let mut model = ready_model();
        type_text(&mut model, "count()");
        assert_eq!(update(&mut model, Event::Key(Key::CtrlC)), vec![Command::Quit]);
        assert_eq!(model.input.value(), "count()");
        assert_eq!(model.state, State::Typing);
    }

    #[test]
    fn test_enter_with_blank_buffer_does_nothing() {
        let mut model = ready_model();
        type_text(&mut model, "   ");
        assert!(update(&mut model, Event::Key(Key::Enter)).is_empty());
        assert_eq!(model.state, State::Typing);
    }

    #[test]
    fn test_enter_submits_trimmed_query() {
        let mut model = ready_model();
        type_text(&mut model, "  count() ");
        let commands = update(&mut model, Event::Key(Key::Enter));

        let (request_id, apl) = submitted(&commands);
        assert_eq!(apl, "count()");
        assert_eq!(model.pending_request, Some(request_id));
        assert_eq!(model.state, State::Querying);
        assert_eq!(model.status, RUNNING_QUERY);
        started(&commands, TickKind::Spinner);
    }

    #[test]
    fn test_keys_ignored_while_querying() {
        let mut model = ready_model();
        type_text(&mut model, "count()");
        update(&mut model, Event::Key(Key::Enter));

        update(&mut model, Event::Key(Key::Char('z')));
        update(&mut model, Event::Key(Key::Esc));
        assert_eq!(model.input.value(), "count()");
        assert_eq!(model.state, State::Querying);
    }

    #[test]
    fn test_spinner_advances_only_while_querying() {
        let mut model = ready_model();
        type_text(&mut model, "count()");
        let commands = update(&mut model, Event::Key(Key::Enter));
        let spinner = started(&commands, TickKind::Spinner);

        update(&mut model, Event::Tick(spinner));
        update(&mut model, Event::Tick(spinner));
        assert_eq!(model.spinner_frame, 2);

        let (id, apl) = submitted(&commands);
        arrive(&mut model, id, &apl, Ok(QueryResult::new()));
        update(&mut model, Event::Tick(spinner));
        assert_eq!(model.spinner_frame, 2);
    }

    #[test]
    fn test_result_projects_and_arms_refresh() {
        let mut model = ready_model();
        type_text(&mut model, "avg");
        let (id, apl) = submitted(&update(&mut model, Event::Key(Key::Enter)));

        let commands = arrive(&mut model, id, &apl, Ok(two_groups()));
        started(&commands, TickKind::Refresh);

        assert_eq!(model.state, State::Refreshing);
        assert_eq!(model.refresh_timeout, 5);
        assert!(!model.input.is_focused());
        assert!(model.pending_request.is_none());
        assert_eq!(model.last_apl, "avg");
        assert_eq!(model.meta.as_ref().unwrap().groups, vec!["a", "b"]);
        assert!(!model.totals.as_ref().unwrap().is_focused());
        assert!(model.matches.is_none());
    }

    #[test]
    fn test_refresh_countdown_reruns_on_fifth_tick() {
        let mut model = ready_model();
        type_text(&mut model, "count()");
        let (id, apl) = submitted(&update(&mut model, Event::Key(Key::Enter)));
        let refresh = started(&arrive(&mut model, id, &apl, Ok(QueryResult::new())), TickKind::Refresh);

        let mut seen = Vec::new();
        for _ in 0..4 {
            assert!(update(&mut model, Event::Tick(refresh)).is_empty());
            seen.push(model.refresh_timeout);
        }
        assert_eq!(seen, vec![4, 3, 2, 1]);

        let commands = update(&mut model, Event::Tick(refresh));
        assert_eq!(commands, vec![Command::Emit(EmitEvent::ReRun)]);

        let commands = update(&mut model, Event::ReRun);
        let (_, rerun_apl) = submitted(&commands);
        assert_eq!(rerun_apl, "count()");
        assert_eq!(model.state, State::Querying);
    }

    #[test]
    fn test_escape_abandons_countdown() {
        let mut model = ready_model();
        type_text(&mut model, "count()");
        let (id, apl) = submitted(&update(&mut model, Event::Key(Key::Enter)));
        let refresh = started(&arrive(&mut model, id, &apl, Ok(two_groups())), TickKind::Refresh);

        update(&mut model, Event::Key(Key::Esc));
        assert_eq!(model.state, State::Typing);
        assert!(model.input.is_focused());

        for _ in 0..10 {
            assert!(update(&mut model, Event::Tick(refresh)).is_empty());
        }
        assert!(update(&mut model, Event::ReRun).is_empty());
        assert_eq!(model.state, State::Typing);
    }

    #[test]
    fn test_stale_refresh_ticker_is_ignored() {
        let mut model = ready_model();
        type_text(&mut model, "count()");
        let (id, apl) = submitted(&update(&mut model, Event::Key(Key::Enter)));
        let old = started(&arrive(&mut model, id, &apl, Ok(QueryResult::new())), TickKind::Refresh);

        update(&mut model, Event::Key(Key::Esc));
        let (id, apl) = submitted(&update(&mut model, Event::Key(Key::Enter)));
        arrive(&mut model, id, &apl, Ok(QueryResult::new()));

        update(&mut model, Event::Tick(old));
        assert_eq!(model.refresh_timeout, 5);
    }

    #[test]
    fn test_navigation_focuses_then_highlights_totals() {
        let mut model = ready_model();
        type_text(&mut model, "avg");
        let (id, apl) = submitted(&update(&mut model, Event::Key(Key::Enter)));
        arrive(&mut model, id, &apl, Ok(two_groups()));

        update(&mut model, Event::Key(Key::Down));
        assert!(model.totals.as_ref().unwrap().is_focused());
        assert_eq!(model.highlighted_group.as_deref(), Some("a"));

        update(&mut model, Event::Key(Key::Down));
        assert_eq!(model.highlighted_group.as_deref(), Some("b"));
        let colors = &model.graphs.as_ref().unwrap()[0].colors;
        assert_eq!(colors, &vec![DIMMED, color_for_group("b")]);
    }

    #[test]
    fn test_error_keeps_previous_artifacts() {
        let mut model = ready_model();
        type_text(&mut model, "avg");
        let (id, apl) = submitted(&update(&mut model, Event::Key(Key::Enter)));
        let refresh = started(&arrive(&mut model, id, &apl, Ok(two_groups())), TickKind::Refresh);
        update(&mut model, Event::Key(Key::Down));
        update(&mut model, Event::Key(Key::Down));

        for _ in 0..5 {
            update(&mut model, Event::Tick(refresh));
        }
        let (id, apl) = submitted(&update(&mut model, Event::ReRun));
        let commands = arrive(&mut model, id, &apl, Err(AxtopError::Network("timeout".to_string())));

        started(&commands, TickKind::Refresh);
        assert_eq!(model.state, State::Refreshing);
        assert_eq!(model.error.as_deref(), Some("Network error: timeout"));
        assert!(model.result.is_some());
        assert!(model.graphs.is_some());
        assert!(model.totals.is_some());
        assert!(model.highlighted_group.is_none());
        let colors = &model.graphs.as_ref().unwrap()[0].colors;
        assert_eq!(colors, &vec![color_for_group("a"), color_for_group("b")]);
    }

    #[test]
    fn test_late_result_after_escape_reenters_refreshing() {
        let mut model = ready_model();
        type_text(&mut model, "count()");
        let (id, apl) = submitted(&update(&mut model, Event::Key(Key::Enter)));
        let refresh = started(&arrive(&mut model, id, &apl, Ok(QueryResult::new())), TickKind::Refresh);
        for _ in 0..5 {
            update(&mut model, Event::Tick(refresh));
        }
        let (rerun_id, _) = submitted(&update(&mut model, Event::ReRun));

        // A late result lands while the user is back in the editor.
        model.state = State::Typing;
        arrive(&mut model, rerun_id, "count()", Ok(two_groups()));
        assert_eq!(model.state, State::Refreshing);
        assert!(model.meta.is_some());
    }

    #[test]
    fn test_matches_navigation_without_totals() {
        use chrono::{TimeZone, Utc};
        use crate::query::Match;

        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let result = QueryResult::new()
            .with_match(Match::new(time).with_field("n", 1))
            .with_match(Match::new(time).with_field("n", 2));

        let mut model = ready_model();
        type_text(&mut model, "events");
        let (id, apl) = submitted(&update(&mut model, Event::Key(Key::Enter)));
        arrive(&mut model, id, &apl, Ok(result));

        assert!(model.matches_highlighted.is_none());
        update(&mut model, Event::Key(Key::Down));
        assert_eq!(model.matches_highlighted, Some(0));
        update(&mut model, Event::Key(Key::Down));
        update(&mut model, Event::Key(Key::Down));
        assert_eq!(model.matches_highlighted, Some(1));
        update(&mut model, Event::Key(Key::Up));
        assert_eq!(model.matches_highlighted, Some(0));
        assert!(model.highlighted_group.is_none());
    }
}
