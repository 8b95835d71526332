use crate::app::{App, Focus, View};
use crate::catalog::PostMeta;
use crate::theme::ColorPalette;
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Minimum card width before the grid drops a column.
const CARD_MIN_WIDTH: u16 = 36;
const MAX_COLUMNS: u16 = 3;
/// Border + title row + category row + two excerpt rows.
const CARD_HEIGHT: u16 = 6;

/// Number of grid columns that fit in `width`.
pub(super) fn column_count(width: u16) -> usize {
    (width / CARD_MIN_WIDTH).clamp(1, MAX_COLUMNS) as usize
}

/// First grid row to draw so the selected card stays on screen.
fn first_visible_row(selected: usize, columns: usize, visible_rows: usize) -> usize {
    let selected_row = selected / columns.max(1);
    selected_row.saturating_sub(visible_rows.saturating_sub(1))
}

/// Render the post grid panel.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let palette = &app.palette;
    let is_focused = app.focus == Focus::Posts && app.view == View::Listing;
    let border_style = if is_focused {
        palette.panel_border_focused
    } else {
        palette.panel_border
    };

    let category = app.menu.name_for_id(app.current_category.as_deref());
    let title = if app.search_query.trim().is_empty() {
        format!("{} ({})", category, app.visible_posts.len())
    } else {
        format!(
            "{} matching \"{}\" ({})",
            category,
            app.search_query.trim(),
            app.visible_posts.len()
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.visible_posts.is_empty() {
        let message = if !app.catalog_loaded {
            "Loading posts..."
        } else if app.search_query.trim().is_empty() {
            "No posts in this category"
        } else {
            "No posts match your search"
        };
        f.render_widget(Paragraph::new(message).style(palette.card_excerpt), inner);
        return;
    }

    let columns = column_count(inner.width);
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let first_row = first_visible_row(app.selected_post, columns, visible_rows);

    let row_areas = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); visible_rows]).split(inner);

    for (row_offset, row_area) in row_areas.iter().enumerate() {
        let start = (first_row + row_offset) * columns;
        if start >= app.visible_posts.len() {
            break;
        }

        let cells = Layout::horizontal(vec![Constraint::Ratio(1, columns as u32); columns]).split(*row_area);
        for (col, cell) in cells.iter().enumerate() {
            let index = start + col;
            let Some(post) = app.visible_posts.get(index) else {
                break;
            };
            render_card(f, post, is_focused && index == app.selected_post, palette, *cell);
        }
    }
}

/// Render a single post card.
fn render_card(f: &mut Frame, post: &PostMeta, selected: bool, palette: &ColorPalette, area: Rect) {
    if area.width < 4 || area.height < 3 {
        return;
    }

    let text_width = area.width.saturating_sub(2) as usize;
    let border_style = if selected {
        palette.card_selected
    } else {
        palette.panel_border
    };
    let title_style = if selected {
        palette.card_selected
    } else {
        palette.card_title
    };

    let mut meta_spans = vec![Span::styled(post.category.to_string(), palette.card_category)];
    if post.image.is_some() {
        meta_spans.push(Span::styled("  [image]", palette.card_image));
    }

    let lines = vec![
        Line::from(Span::styled(
            truncate_to_width(&post.title, text_width).into_owned(),
            title_style,
        )),
        Line::from(meta_spans),
        Line::from(Span::styled(post.excerpt.to_string(), palette.card_excerpt)),
    ];

    let card = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(card, area);
}
