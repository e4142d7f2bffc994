//! Terminal front end: raw-mode setup, key reading and drawing.

pub mod input;
pub mod render;

use crate::app::{assemble, Flow, Runtime};
use crate::error::{AxtopError, AxtopResult};
use crate::query::QueryClient;
use crate::AxtopConfig;
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::sync::Arc;
use tracing::{info, warn};

/// Restores the terminal when dropped, including on early returns.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> AxtopResult<Self> {
        enable_raw_mode().map_err(|e| AxtopError::Terminal {
            message: format!("failed to enable raw mode: {}", e),
        })?;
        // Guard exists from here so raw mode is undone if the next step fails.
        let guard = TerminalGuard;
        execute!(std::io::stdout(), EnterAlternateScreen).map_err(|e| AxtopError::Terminal {
            message: format!("failed to enter alternate screen: {}", e),
        })?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
    }
}

/// Runs the interactive client until the user quits.
pub async fn run(config: &AxtopConfig, client: Arc<dyn QueryClient>) -> AxtopResult<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal: Terminal<CrosstermBackend<Stdout>> = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
    terminal.clear()?;

    let mut runtime = Runtime::new(config.refresh_seconds, client);
    input::spawn_reader(runtime.sender());
    runtime.start();

    loop {
        terminal.draw(|frame| render::draw(frame, &assemble(runtime.model())))?;

        let Some(event) = runtime.next_event().await else {
            warn!("Event channel closed");
            break;
        };
        if runtime.dispatch(event) == Flow::Quit {
            info!("Quit requested");
            break;
        }
    }

    Ok(())
}
