use crate::app::controller::{init, update};
use crate::app::event::{Command, Event, QueryOutcome};
use crate::app::model::Model;
use crate::app::ticks::{spawn_ticker, Gates};
use crate::query::QueryClient;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the model and drives it from a single event queue.
///
/// Keys, query completions and ticks all arrive on one unbounded channel.
/// Events the controller emits for itself go to a local backlog, which is
/// drained before the channel so they are handled in the order produced.
pub struct Runtime {
    model: Model,
    client: Arc<dyn QueryClient>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    gates_tx: watch::Sender<Gates>,
    backlog: VecDeque<Event>,
}

impl Runtime {
    pub fn new(refresh_seconds: u64, client: Arc<dyn QueryClient>) -> Self {
        let model = Model::new(refresh_seconds);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (gates_tx, _) = watch::channel(model.gates());

        Self {
            model,
            client,
            events_tx,
            events_rx,
            gates_tx,
            backlog: VecDeque::new(),
        }
    }

    /// Handle for producers outside the loop, such as the input reader.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.events_tx.clone()
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn start(&mut self) {
        info!("Starting event loop (refresh every {}s)", self.model.refresh_seconds);
        let commands = init(&mut self.model);
        self.publish_gates();
        for command in commands {
            self.execute(command);
        }
    }

    pub async fn next_event(&mut self) -> Option<Event> {
        if let Some(event) = self.backlog.pop_front() {
            return Some(event);
        }
        self.events_rx.recv().await
    }

    /// Runs one event through the controller and carries out its commands.
    pub fn dispatch(&mut self, event: Event) -> Flow {
        let commands = update(&mut self.model, event);
        self.publish_gates();

        let mut flow = Flow::Continue;
        for command in commands {
            if command == Command::Quit {
                flow = Flow::Quit;
                continue;
            }
            self.execute(command);
        }
        flow
    }

    fn publish_gates(&self) {
        self.gates_tx.send_replace(self.model.gates());
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Submit { request_id, apl } => self.submit(request_id, apl),
            Command::StartTicker(ticker) => {
                debug!("Starting {:?} ticker generation {}", ticker.kind, ticker.generation);
                spawn_ticker(ticker, self.gates_tx.subscribe(), self.events_tx.clone());
            }
            Command::Emit(event) => self.backlog.push_back(event.into()),
            Command::Quit => {}
        }
    }

    fn submit(&self, request_id: Uuid, apl: String) {
        let client = Arc::clone(&self.client);
        let events = self.events_tx.clone();

        tokio::spawn(async move {
            let result = client.query(&apl).await;
            debug!("Query {} completed (ok: {})", request_id, result.is_ok());

            let outcome = QueryOutcome {
                request_id,
                apl,
                result,
            };
            if events.send(Event::ResultArrived(outcome)).is_err() {
                debug!("Event loop gone, dropping result of {}", request_id);
            }
        });
    }
}
