use crate::app::event::{Key, TickKind, Ticker};
use crate::app::ticks::Gates;
use crate::projection::{GraphData, QueryMeta, Table};
use crate::query::QueryResult;
use uuid::Uuid;

pub const QUERY_PLACEHOLDER: &str = "Enter an APL query...";
pub const RUNNING_QUERY: &str = "Running query...";
const INITIAL_PULSE_STEP: usize = 9;
const TABLE_PAGE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Typing,
    Querying,
    Refreshing,
}

/// Single-line editable query buffer.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    value: String,
    // cursor position in chars
    cursor: usize,
    focused: bool,
    pub placeholder: &'static str,
}

impl TextBuffer {
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            focused: true,
            placeholder,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Applies an editing key. Ignored while blurred.
    pub fn handle_key(&mut self, key: Key) {
        if !self.focused {
            return;
        }

        let len = self.value.chars().count();
        match key {
            Key::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
            }
            Key::Backspace if self.cursor > 0 => {
                let at = self.byte_offset(self.cursor - 1);
                self.value.remove(at);
                self.cursor -= 1;
            }
            Key::Delete if self.cursor < len => {
                let at = self.byte_offset(self.cursor);
                self.value.remove(at);
            }
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(len),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = len,
            _ => {}
        }
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

/// A projected table plus its cursor and focus.
#[derive(Debug, Clone)]
pub struct TableView {
    pub table: Table,
    selected: usize,
    focused: bool,
}

impl TableView {
    pub fn new(table: Table, focused: bool) -> Self {
        Self {
            table,
            selected: 0,
            focused,
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, idx: usize) {
        self.selected = idx.min(self.table.len().saturating_sub(1));
    }

    pub fn selected_row(&self) -> Option<&[String]> {
        self.table.rows.get(self.selected).map(|r| r.as_slice())
    }

    /// Moves the cursor for navigation keys. Ignored while blurred.
    pub fn handle_key(&mut self, key: Key) {
        if !self.focused || self.table.is_empty() {
            return;
        }

        let last = self.table.len() - 1;
        self.selected = match key {
            Key::Up => self.selected.saturating_sub(1),
            Key::Down => (self.selected + 1).min(last),
            Key::PageUp => self.selected.saturating_sub(TABLE_PAGE),
            Key::PageDown => (self.selected + TABLE_PAGE).min(last),
            Key::Home => 0,
            Key::End => last,
            _ => self.selected,
        };
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TickGenerations {
    spinner: u64,
    pulse: u64,
    refresh: u64,
}

/// All mutable state of the client. Only the controller writes to it.
#[derive(Debug)]
pub struct Model {
    pub ready: bool,
    pub state: State,
    pub input: TextBuffer,
    pub status: String,
    /// Query text of the most recent result; re-run by the countdown.
    pub last_apl: String,
    pub pending_request: Option<Uuid>,
    /// Most recent successful result.
    pub result: Option<QueryResult>,
    pub error: Option<String>,
    pub meta: Option<QueryMeta>,
    pub graphs: Option<Vec<GraphData>>,
    pub totals: Option<TableView>,
    pub matches: Option<TableView>,
    pub matches_highlighted: Option<usize>,
    pub highlighted_group: Option<String>,
    pub refresh_seconds: u64,
    pub refresh_timeout: u64,
    pub pulse_step: usize,
    pub spinner_frame: usize,
    generations: TickGenerations,
}

impl Model {
    pub fn new(refresh_seconds: u64) -> Self {
        Self {
            ready: false,
            state: State::Typing,
            input: TextBuffer::new(QUERY_PLACEHOLDER),
            status: String::new(),
            last_apl: String::new(),
            pending_request: None,
            result: None,
            error: None,
            meta: None,
            graphs: None,
            totals: None,
            matches: None,
            matches_highlighted: None,
            highlighted_group: None,
            refresh_seconds,
            refresh_timeout: 0,
            pulse_step: INITIAL_PULSE_STEP,
            spinner_frame: 0,
            generations: TickGenerations::default(),
        }
    }

    /// Starts a new run of a tick source, retiring any previous run.
    pub fn next_ticker(&mut self, kind: TickKind) -> Ticker {
        let generation = match kind {
            TickKind::Spinner => &mut self.generations.spinner,
            TickKind::Pulse => &mut self.generations.pulse,
            TickKind::Refresh => &mut self.generations.refresh,
        };
        *generation += 1;
        Ticker {
            kind,
            generation: *generation,
        }
    }

    pub fn gates(&self) -> Gates {
        Gates {
            ready: self.ready,
            state: self.state,
            spinner_generation: self.generations.spinner,
            pulse_generation: self.generations.pulse,
            refresh_generation: self.generations.refresh,
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.state == State::Refreshing
    }
}
