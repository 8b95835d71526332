//! Input handling for the TUI.
//!
//! Keys go to the help overlay, the path prompt or the search prompt when one
//! is open, otherwise to the handler for the current view.

use crate::app::{App, AppEvent, Focus, View, MAX_SCROLL};
use crate::content::PostFetcher;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::request_open_post;
use super::Action;

/// Maximum length of a typed category path.
const MAX_PATH_INPUT_LENGTH: usize = 512;

/// Map the current focus panel to a keybinding context.
fn focus_to_context(focus: Focus) -> KbContext {
    match focus {
        Focus::Menu => KbContext::Menu,
        Focus::Posts => KbContext::Posts,
    }
}

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    fetcher: &PostFetcher,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.path_input.is_some() {
        return Ok(handle_path_input(app, code));
    }

    if app.search_mode {
        return Ok(handle_search_input(app, code, modifiers));
    }

    match app.view {
        View::Listing => handle_listing_input(app, code, modifiers, fetcher, event_tx),
        View::ReadingPost | View::NotFound => handle_reader_input(app, code, modifiers),
    }
}

/// Actions available from every view.
fn handle_global_action(app: &mut App, action: KbAction) -> Action {
    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::HistoryBack => app.history_back(),
        KbAction::HistoryForward => app.history_forward(),
        KbAction::EnterSearch => {
            app.search_mode = true;
            app.needs_redraw = true;
        }
        KbAction::GoToPath => {
            app.path_input = Some(app.address().to_string());
            app.needs_redraw = true;
        }
        KbAction::ToggleTheme => app.toggle_theme(),
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the go-to-path prompt is open.
fn handle_path_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc => app.path_input = None,
        KeyCode::Enter => {
            if let Some(path) = app.path_input.take() {
                app.navigate_to_path(&path);
            }
        }
        KeyCode::Backspace => {
            if let Some(input) = app.path_input.as_mut() {
                input.pop();
            }
        }
        KeyCode::Char(c) => {
            let len = app.path_input.as_ref().map_or(0, String::len);
            if len >= MAX_PATH_INPUT_LENGTH {
                app.set_status(format!("Path at max length ({} chars)", MAX_PATH_INPUT_LENGTH));
            } else if let Some(input) = app.path_input.as_mut() {
                input.push(c);
            }
        }
        _ => {}
    }
    app.needs_redraw = true;
    Action::Continue
}

/// Handle input in search mode. The grid is filtered on every keystroke.
fn handle_search_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Search);

    match (action, code) {
        (Some(KbAction::ExitSearch), _) => {
            app.search_mode = false;
            if !app.search_query.is_empty() {
                app.set_search_query("");
            }
            app.needs_redraw = true;
        }
        (Some(KbAction::CommitSearch), _) => {
            app.search_mode = false;
            app.needs_redraw = true;
        }
        (_, KeyCode::Backspace) => {
            let mut query = app.search_query.clone();
            query.pop();
            app.set_search_query(&query);
        }
        (_, KeyCode::Char(c)) => {
            if app.search_query.len() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Search query at max length ({} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
                return Action::Continue;
            }
            let query = format!("{}{}", app.search_query, c);
            app.set_search_query(&query);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input in the listing view (menu + post grid).
fn handle_listing_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    fetcher: &PostFetcher,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let context = focus_to_context(app.focus);
    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        return Ok(Action::Continue);
    };

    match action {
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::CycleFocus => app.toggle_focus(),
        KbAction::Select => match app.focus {
            Focus::Menu => {
                let id = app.selected_menu_item().map(|item| item.id.clone());
                if let Some(id) = id {
                    app.select_category(id.as_deref());
                }
            }
            Focus::Posts => {
                let locator = app.selected_post().map(|post| post.locator.clone());
                match locator {
                    Some(locator) => request_open_post(app, &locator, fetcher, event_tx),
                    None => app.set_status("No post selected"),
                }
            }
        },
        KbAction::Back => {
            if app.pending_post.is_some() {
                app.cancel_post_load();
                app.set_status("Cancelled");
            } else if !app.search_query.is_empty() {
                app.set_search_query("");
            }
        }
        other => return Ok(handle_global_action(app, other)),
    }
    Ok(Action::Continue)
}

/// Handle input in the reader and on the not-found page.
fn handle_reader_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    // Digits copy the matching code block
    if let KeyCode::Char(c @ '1'..='9') = code {
        if app.view == View::ReadingPost && !modifiers.contains(KeyModifiers::CONTROL) {
            let n = c.to_digit(10).unwrap_or(0) as usize;
            app.copy_code_block(n);
            return Ok(Action::Continue);
        }
    }

    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Reader)
    else {
        return Ok(Action::Continue);
    };

    let page = app.reader_visible_lines.saturating_sub(2).max(1);
    match action {
        KbAction::ExitReader | KbAction::Back => app.close_post(),
        KbAction::ScrollDown => {
            app.scroll_down(1);
            app.clamp_reader_scroll();
        }
        KbAction::ScrollUp => app.scroll_up(1),
        KbAction::PageDown => {
            app.scroll_down(page);
            app.clamp_reader_scroll();
        }
        KbAction::PageUp => app.scroll_up(page),
        KbAction::ScrollTop => app.scroll_offset = 0,
        KbAction::ScrollBottom => {
            app.scroll_offset = MAX_SCROLL;
            app.clamp_reader_scroll();
        }
        other => return Ok(handle_global_action(app, other)),
    }
    Ok(Action::Continue)
}
