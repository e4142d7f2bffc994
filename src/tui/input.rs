use crate::app::{Event, Key};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn map_key(key: KeyEvent) -> Key {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Key::CtrlC,
            _ => Key::Other,
        };
    }

    match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        _ => Key::Other,
    }
}

/// Reads terminal events on a dedicated thread until the loop hangs up.
pub fn spawn_reader(events: mpsc::UnboundedSender<Event>) -> JoinHandle<()> {
    thread::spawn(move || {
        while !events.is_closed() {
            match event::poll(POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    warn!("Terminal poll failed: {}", e);
                    break;
                }
            }

            let forwarded = match event::read() {
                Ok(CEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    events.send(Event::Key(map_key(key)))
                }
                Ok(CEvent::Resize(..)) => events.send(Event::Resize),
                Ok(_) => Ok(()),
                Err(e) => {
                    warn!("Terminal read failed: {}", e);
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        }
        debug!("Input reader stopped");
    })
}
