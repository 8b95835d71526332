//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, background task events, and periodic ticks.

use crate::app::{App, AppEvent};
use crate::content::PostFetcher;
use anyhow::{Context, Result};
use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::input::handle_input;
use super::render::render;

/// Frames in the braille loading spinner.
pub(super) const SPINNER_FRAMES: usize = 10;

/// What the loop does after a key press.
pub enum Action {
    Continue,
    /// Leave the loop; the terminal is restored on the way out.
    Quit,
}

/// Drive the reader until the user quits or a signal arrives.
///
/// One `tokio::select!` (biased, in this order) waits on:
/// - **Signals**: SIGTERM/SIGINT end the session (Unix only)
/// - **Keys**: crossterm's async event stream (resizes just redraw)
/// - **Background tasks**: catalog load and post fetches via the `AppEvent` channel
/// - **Periodic tick**: 250ms timer for status expiry and the loading spinner
///
/// A panic hook leaves raw mode and the alternate screen before the default
/// hook prints, so panics are readable.
///
/// Errors only come from terminal setup, drawing and teardown; quitting and
/// signals both return `Ok(())`.
pub async fn run(
    app: &mut App,
    fetcher: PostFetcher,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    // Hook first, so a panic during setup still restores the terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal().context("Failed to set up terminal")?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    let outcome: Result<()> = loop {
        if app.needs_redraw {
            if let Err(e) = terminal.draw(|f| render(f, app)) {
                break Err(e.into());
            }
            app.needs_redraw = false;
        }

        // Drain pending app events before waiting on input, so results are
        // applied promptly even while keys are arriving.
        while let Ok(event) = event_rx.try_recv() {
            handle_app_event(app, event);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break Ok(());
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break Ok(());
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                        app.needs_redraw = true;
                        match handle_input(app, key.code, key.modifiers, &fetcher, &event_tx) {
                            Ok(Action::Quit) => break Ok(()),
                            Ok(Action::Continue) => {}
                            Err(e) => app.set_status(format!("Error: {}", e)),
                        }
                    }
                    Some(Ok(Event::Resize(_, _))) => app.needs_redraw = true,
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Terminal event stream error");
                    }
                    // Stream closed: the terminal is gone
                    None => break Ok(()),
                    _ => {}
                }
            }

            Some(event) = event_rx.recv() => {
                handle_app_event(app, event);
            }

            _ = tick_interval.tick() => {
                handle_tick(app);
            }
        }
    };

    app.cancel_post_load();
    restore_terminal(terminal)?;
    outcome
}

/// Periodic housekeeping: expire status messages, animate the loading spinner.
fn handle_tick(app: &mut App) {
    if app.clear_expired_status() {
        app.needs_redraw = true;
    }

    if app.pending_post.is_some() || !app.catalog_loaded {
        app.spinner_frame = (app.spinner_frame + 1) % SPINNER_FRAMES;
        app.needs_redraw = true;
    }
}

/// Raw mode plus the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Undo [`setup_terminal`] and show the cursor again.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::platform::{MemoryClipboard, MemoryPreferences, Platform};
    use crate::theme::ThemeVariant;
    use tokio::time;

    fn app() -> App {
        let platform = Platform::in_memory(MemoryClipboard::default(), MemoryPreferences::new());
        App::new(Config::default().menu_tree().unwrap(), platform, ThemeVariant::Dark)
    }

    #[tokio::test]
    async fn test_tick_expires_status() {
        time::pause();
        let mut app = app();
        app.apply_catalog(Vec::new());
        app.set_status("hello");
        app.needs_redraw = false;

        time::advance(Duration::from_secs(4)).await;
        handle_tick(&mut app);
        assert!(app.status_message.is_none());
        assert!(app.needs_redraw);
    }

    #[tokio::test]
    async fn test_tick_spins_while_loading() {
        let mut app = app();
        app.apply_catalog(Vec::new());
        handle_tick(&mut app);
        assert_eq!(app.spinner_frame, 0);

        app.open_post("a.md");
        for _ in 0..SPINNER_FRAMES + 1 {
            handle_tick(&mut app);
        }
        assert_eq!(app.spinner_frame, 1);
    }
}
