use crate::app::{App, Focus, View};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the category menu panel.
///
/// Every category on the path to the current one is highlighted, so a
/// nested selection also marks its ancestors.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let palette = &app.palette;
    let is_focused = app.focus == Focus::Menu && app.view == View::Listing;

    let items: Vec<ListItem> = app
        .menu_items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let indent = "  ".repeat(item.depth);
            let marker = if item.has_children { "▸ " } else { "  " };

            let is_active = match item.id.as_deref() {
                None => app.current_category.is_none(),
                Some(id) => app.active_chain.iter().any(|active| active == id),
            };

            let style = if is_focused && i == app.selected_menu {
                palette.menu_selected
            } else if is_active {
                palette.menu_active
            } else {
                palette.menu_item
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{}", indent, marker), style),
                Span::styled(item.name.as_str(), style),
            ]))
        })
        .collect();

    let border_style = if is_focused {
        palette.panel_border_focused
    } else {
        palette.panel_border
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Categories"),
        )
        .highlight_style(Style::default());

    let mut state = ListState::default().with_selected(Some(app.selected_menu));
    f.render_stateful_widget(list, area, &mut state);
}
