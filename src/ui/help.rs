//! Help overlay: scrollable keybinding table.
//!
//! Shows the live bindings, including overrides from the config file.

use crate::app::App;
use crate::keybindings::Context;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

/// Display order for the help screen.
const CONTEXT_ORDER: [Context; 5] = [
    Context::Global,
    Context::Menu,
    Context::Posts,
    Context::Reader,
    Context::Search,
];

/// Rows drawn outside the registry.
const EXTRA_ROWS: [(Context, &str, &str); 3] = [
    (Context::Reader, "1-9", "Copy code block n"),
    (Context::Search, "Backspace", "Delete last character"),
    (Context::Search, "(any text)", "Filter posts as you type"),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }
    f.render_widget(Clear, overlay);

    let palette = &app.palette;
    let bindings = app.keybindings.help_rows();
    let mut rows: Vec<Row> = Vec::new();

    for context in CONTEXT_ORDER {
        let entries: Vec<(String, &str)> = bindings
            .iter()
            .filter(|(c, _, _)| *c == context)
            .map(|(_, keys, description)| (keys.clone(), *description))
            .chain(
                EXTRA_ROWS
                    .iter()
                    .filter(|(c, _, _)| *c == context)
                    .map(|(_, keys, description)| (keys.to_string(), *description)),
            )
            .collect();

        if entries.is_empty() {
            continue;
        }

        if !rows.is_empty() {
            rows.push(Row::new(vec![String::new(), String::new()]));
        }
        rows.push(
            Row::new(vec![
                Line::from(Span::styled(
                    format!("-- {} --", context.label()),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ])
            .style(palette.reader_heading),
        );
        for (keys, description) in entries {
            rows.push(Row::new(vec![format!("  {}", keys), description.to_string()]));
        }
    }

    let total_rows = rows.len();
    let visible_height = overlay.height.saturating_sub(4) as usize; // borders, header, margin
    let max_scroll = total_rows.saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);
    let visible_rows: Vec<Row> = rows.into_iter().skip(scroll).take(visible_height).collect();

    let title = if max_scroll > 0 {
        format!(" Help ({}/{}) ", scroll + 1, max_scroll + 1)
    } else {
        " Help (? to close) ".to_string()
    };

    let table = Table::new(visible_rows, [Constraint::Length(22), Constraint::Min(20)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.panel_border_focused)
                .title(title),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        )
        .style(palette.reader_body);

    f.render_widget(table, overlay);

    if max_scroll > 0 && scroll < max_scroll {
        let hint = Line::from(Span::styled(
            " j/k to scroll, ? or Esc to close ",
            palette.card_excerpt,
        ));
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(Paragraph::new(hint), hint_area);
    }
}

/// A rectangle with the given percentage of the parent area, centered in it.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
