use crate::app::{App, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Braille spinner frames, indexed by `App::spinner_frame`.
const SPINNER: [&str; super::loop_runner::SPINNER_FRAMES] =
    ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let spinner = SPINNER[app.spinner_frame % SPINNER.len()];

    let text: Cow<'_, str> = if let Some(status) = &app.status_message {
        Cow::Borrowed(&*status.text)
    } else if let Some(locator) = &app.pending_post {
        Cow::Owned(format!("{} Loading {}... (Esc to cancel)", spinner, locator))
    } else if !app.catalog_loaded {
        Cow::Owned(format!("{} Loading posts...", spinner))
    } else if app.search_mode {
        Cow::Borrowed("Type to search | Enter keep results | Esc cancel")
    } else {
        match app.view {
            View::Listing => Cow::Borrowed(
                "[Enter]open [Tab]switch [/]search [g]o to path [[/]]history [t]heme [?]help [q]uit",
            ),
            View::ReadingPost => {
                Cow::Borrowed("[b]ack [j/k]scroll [Space]page [1-9]copy code [t]heme [?]help [q]uit")
            }
            View::NotFound => Cow::Borrowed("[b]ack to posts [[]history back [g]o to path [q]uit"),
        }
    };

    let paragraph = Paragraph::new(text).style(app.palette.status_bar);
    f.render_widget(paragraph, area);
}
