use crate::error::AxtopResult;
use crate::query::QueryResult;
use tokio::time::Duration;
use uuid::Uuid;

/// Keyboard input, independent of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    Tab,
    CtrlC,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickKind {
    Spinner,
    Pulse,
    Refresh,
}

impl TickKind {
    pub fn cadence(self) -> Duration {
        match self {
            TickKind::Spinner => Duration::from_millis(100),
            TickKind::Pulse => Duration::from_millis(150),
            TickKind::Refresh => Duration::from_secs(1),
        }
    }
}

/// Identifies one run of a tick source. A new run is started each time the
/// source's gate opens; ticks from older runs are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticker {
    pub kind: TickKind,
    pub generation: u64,
}

/// Completion of a submitted query.
#[derive(Debug)]
pub struct QueryOutcome {
    pub request_id: Uuid,
    pub apl: String,
    pub result: AxtopResult<QueryResult>,
}

#[derive(Debug)]
pub enum Event {
    Key(Key),
    ResultArrived(QueryOutcome),
    Tick(Ticker),
    ReRun,
    Resize,
}

/// Follow-up work requested by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit { request_id: Uuid, apl: String },
    StartTicker(Ticker),
    Emit(EmitEvent),
    Quit,
}

/// Events the controller may feed back into its own queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitEvent {
    ReRun,
}

impl From<EmitEvent> for Event {
    fn from(e: EmitEvent) -> Self {
        match e {
            EmitEvent::ReRun => Event::ReRun,
        }
    }
}
