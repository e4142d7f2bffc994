//! The interactive client: model, controller, tick sources and view.

pub mod controller;
pub mod event;
pub mod highlight;
pub mod model;
pub mod runtime;
pub mod ticks;
pub mod view;

pub use controller::{init, update};
pub use event::{Command, EmitEvent, Event, Key, QueryOutcome, TickKind, Ticker};
pub use model::{Model, State, TableView, TextBuffer};
pub use runtime::{Flow, Runtime};
pub use view::{assemble, Fragment, Screen};
