use crate::app::event::{Event, TickKind, Ticker};
use crate::app::model::State;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

/// Snapshot of the model that tick sources read to decide whether to keep
/// running. Published by the event loop after every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gates {
    pub ready: bool,
    pub state: State,
    pub spinner_generation: u64,
    pub pulse_generation: u64,
    pub refresh_generation: u64,
}

impl Gates {
    pub fn is_live(&self, ticker: Ticker) -> bool {
        match ticker.kind {
            TickKind::Spinner => {
                self.state == State::Querying && ticker.generation == self.spinner_generation
            }
            TickKind::Pulse => !self.ready && ticker.generation == self.pulse_generation,
            TickKind::Refresh => {
                self.state == State::Refreshing && ticker.generation == self.refresh_generation
            }
        }
    }
}

/// Spawns a periodic tick source. The first tick fires one cadence after
/// spawning; the task ends as soon as its gate closes or the loop is gone.
pub fn spawn_ticker(
    ticker: Ticker,
    gates: watch::Receiver<Gates>,
    events: mpsc::UnboundedSender<Event>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = ticker.kind.cadence();
        let mut timer = interval_at(Instant::now() + period, period);

        loop {
            timer.tick().await;

            if !gates.borrow().is_live(ticker) {
                debug!("{:?} ticker generation {} stopped", ticker.kind, ticker.generation);
                break;
            }

            if events.send(Event::Tick(ticker)).is_err() {
                break;
            }
        }
    })
}
