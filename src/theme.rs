//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Flip between Dark and Light.
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Value written to the preference store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette: semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    // -- Category menu --
    pub menu_item: Style,
    pub menu_active: Style,
    pub menu_selected: Style,

    // -- Post grid --
    pub card_title: Style,
    pub card_excerpt: Style,
    pub card_category: Style,
    pub card_image: Style,
    pub card_selected: Style,

    // -- Reader --
    pub reader_heading: Style,
    pub reader_body: Style,
    pub reader_code_block: Style,
    pub reader_inline_code: Style,
    pub reader_emphasis: Style,
    pub reader_strong: Style,
    pub reader_link: Style,
    pub reader_image: Style,
    pub reader_quote: Style,

    // -- Code highlighting --
    pub code_keyword: Style,
    pub code_string: Style,
    pub code_comment: Style,
    pub copy_control: Style,

    // -- Chrome --
    pub address_bar: Style,
    pub search_input: Style,
    pub status_bar: Style,
    pub not_found: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            // Menu
            menu_item: Style::default(),
            menu_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            menu_selected: Style::default().bg(Color::DarkGray).fg(Color::White),

            // Cards
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_excerpt: Style::default().fg(Color::Gray),
            card_category: Style::default().fg(Color::Cyan),
            card_image: Style::default().fg(Color::Blue),
            card_selected: Style::default().bg(Color::DarkGray).fg(Color::White),

            // Reader
            reader_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default(),
            reader_code_block: Style::default().fg(Color::Yellow).bg(Color::Black),
            reader_inline_code: Style::default().fg(Color::Yellow),
            reader_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            reader_strong: Style::default().add_modifier(Modifier::BOLD),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            reader_image: Style::default().fg(Color::Blue),
            reader_quote: Style::default().fg(Color::Gray),

            // Code
            code_keyword: Style::default()
                .fg(Color::Magenta)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
            code_string: Style::default().fg(Color::Green).bg(Color::Black),
            code_comment: Style::default().fg(Color::DarkGray).bg(Color::Black),
            copy_control: Style::default().fg(Color::Black).bg(Color::Cyan),

            // Chrome
            address_bar: Style::default().fg(Color::Cyan),
            search_input: Style::default().fg(Color::Yellow),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            not_found: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    /// Light palette, adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            // Menu
            menu_item: Style::default().fg(Color::Black),
            menu_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            menu_selected: Style::default().bg(Color::Blue).fg(Color::White),

            // Cards
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_excerpt: Style::default().fg(Color::DarkGray),
            card_category: Style::default().fg(Color::Blue),
            card_image: Style::default().fg(Color::Magenta),
            card_selected: Style::default().bg(Color::Blue).fg(Color::White),

            // Reader
            reader_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::Black),
            reader_code_block: Style::default().fg(Color::DarkGray).bg(Color::White),
            reader_inline_code: Style::default().fg(Color::DarkGray),
            reader_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            reader_strong: Style::default().add_modifier(Modifier::BOLD),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            reader_image: Style::default().fg(Color::Blue),
            reader_quote: Style::default().fg(Color::DarkGray),

            // Code
            code_keyword: Style::default()
                .fg(Color::Magenta)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
            code_string: Style::default().fg(Color::Green).bg(Color::White),
            code_comment: Style::default().fg(Color::Gray).bg(Color::White),
            copy_control: Style::default().fg(Color::White).bg(Color::Blue),

            // Chrome
            address_bar: Style::default().fg(Color::Blue),
            search_input: Style::default().fg(Color::Magenta),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            not_found: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
