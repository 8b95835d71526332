//! Render functions for the TUI.
//!
//! Dispatches to the view for the current route and draws overlays on top.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{categories, help, posts, reader, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Zero-sized frames show up mid-resize
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);

    match app.view {
        View::Listing => render_listing(f, app, chunks[1]),
        View::ReadingPost => reader::render(f, app, chunks[1]),
        View::NotFound => render_not_found(f, app, chunks[1]),
    }

    status::render(f, app, chunks[2]);

    if app.path_input.is_some() {
        render_path_prompt(f, app);
    }

    if app.show_help {
        help::render(f, app);
    }
}

/// Address bar, or the search input while searching.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let palette = &app.palette;
    let line = if app.search_mode {
        Line::from(vec![
            Span::styled(" Search: ", palette.search_input),
            Span::styled(format!("{}_", app.search_query), palette.search_input),
        ])
    } else if !app.search_query.is_empty() {
        Line::from(vec![
            Span::styled(format!(" {} ", app.address()), palette.address_bar),
            Span::styled(format!(" Search: {}", app.search_query), palette.search_input),
        ])
    } else {
        Line::from(Span::styled(format!(" {} ", app.address()), palette.address_bar))
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Category menu beside the post grid.
fn render_listing(f: &mut Frame, app: &App, area: Rect) {
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(area);

    categories::render(f, app, panels[0]);
    posts::render(f, app, panels[1]);
}

fn render_not_found(f: &mut Frame, app: &App, area: Rect) {
    let palette = &app.palette;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("404 Not Found", palette.not_found)),
        Line::from(""),
        Line::from(Span::styled(app.not_found_message.as_str(), palette.reader_body)),
        Line::from(""),
        Line::from(Span::styled(
            "b/Esc: back to posts, [: history back",
            palette.card_excerpt,
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.panel_border)
                .title(app.address().to_string()),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// "Go to path" prompt centered on screen.
fn render_path_prompt(f: &mut Frame, app: &App) {
    let Some(input) = app.path_input.as_deref() else {
        return;
    };
    let area = f.area();

    let width = 60u16.min(area.width.saturating_sub(4));
    let height = 7u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 20 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let text = format!("Go to path:\n\n> {}_\n\n(Enter) Go  (Esc) Cancel", input);
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.palette.panel_border_focused)
                .title(" Go to "),
        )
        .style(app.palette.reader_body);

    f.render_widget(paragraph, overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PostMeta;
    use crate::config::Config;
    use crate::platform::{MemoryClipboard, MemoryPreferences, Platform};
    use crate::theme::ThemeVariant;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn app() -> App {
        let platform = Platform::in_memory(MemoryClipboard::default(), MemoryPreferences::new());
        let menu = Config::default().menu_tree().unwrap();
        let mut app = App::new(menu, platform, ThemeVariant::Dark);
        app.apply_catalog(vec![PostMeta {
            locator: Arc::from("tools/docker/docker.md"),
            title: Arc::from("Docker Basics"),
            excerpt: Arc::from("Containers without the ceremony."),
            category: Arc::from("DOCKER"),
            image: None,
        }]);
        app
    }

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_listing_shows_address_and_titles() {
        let mut app = app();
        app.route_initial("/");
        let screen = draw(&mut app, 120, 30);
        assert!(screen.contains(" / "));
        assert!(screen.contains("Categories"));
        assert!(screen.contains("Docker Basics"));
    }

    #[test]
    fn test_not_found_page() {
        let mut app = app();
        app.route_initial("/no/such/place");
        assert_eq!(app.view, View::NotFound);
        let screen = draw(&mut app, 120, 30);
        assert!(screen.contains("404 Not Found"));
        assert!(screen.contains("b/Esc: back to posts"));
    }

    #[test]
    fn test_reader_shows_title() {
        let mut app = app();
        let generation = app.open_post("tools/docker/docker.md");
        app.apply_post_loaded(
            "tools/docker/docker.md",
            generation,
            Ok("# Docker Basics\n\nSome text.".to_string()),
        );
        assert_eq!(app.view, View::ReadingPost);
        let screen = draw(&mut app, 120, 30);
        assert!(screen.contains("Docker Basics"));
        assert!(app.reader_visible_lines > 0);
    }

    #[test]
    fn test_help_overlay() {
        let mut app = app();
        app.show_help = true;
        let screen = draw(&mut app, 120, 40);
        assert!(screen.contains("Help"));
        assert!(screen.contains("Quit"));
    }

    #[test]
    fn test_path_prompt_overlay() {
        let mut app = app();
        app.path_input = Some("/tools".to_string());
        let screen = draw(&mut app, 120, 30);
        assert!(screen.contains("Go to path:"));
        assert!(screen.contains("> /tools_"));
    }

    #[test]
    fn test_too_small_terminal() {
        let mut app = app();
        let screen = draw(&mut app, 40, 8);
        assert!(screen.contains("Terminal too small"));
    }
}
