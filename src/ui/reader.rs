use crate::app::{App, MAX_SCROLL};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the post reader view.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    // Layout may produce tiny rects during extreme terminal resizes
    if area.width < 3 || area.height < 3 {
        return;
    }

    // Viewport size (minus borders) drives scroll clamping
    app.reader_visible_lines = area.height.saturating_sub(2) as usize;
    app.reader_viewport_width = area.width.saturating_sub(2) as usize;
    // Clamp before drawing so a resize never shows an out-of-range frame
    app.clamp_reader_scroll();

    let palette = &app.palette;
    let Some(post) = app.open_post.as_ref() else {
        let paragraph = Paragraph::new("No post open")
            .block(Block::default().borders(Borders::ALL).title("Post"));
        f.render_widget(paragraph, area);
        return;
    };

    let blocks = post.rendered.code_blocks.len();
    let mut meta = post.locator.to_string();
    match blocks {
        0 => {}
        1 => meta.push_str("  ·  1 code block, press 1 to copy"),
        n => meta.push_str(&format!("  ·  {} code blocks, press 1-{} to copy", n, n.min(9))),
    }

    // Exactly two header lines; App::reader_content_lines counts on it
    let header = [
        Line::from(Span::styled(post.title.to_string(), palette.reader_heading)),
        Line::from(Span::styled(meta, palette.card_excerpt)),
    ];
    let text = Text::from_iter(header.into_iter().chain(post.rendered.lines.iter().cloned()));

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.panel_border_focused)
                .title(app.address().to_string()),
        )
        .style(palette.reader_body)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(MAX_SCROLL) as u16, 0));

    f.render_widget(paragraph, area);
}
