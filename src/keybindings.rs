//! Keybinding registry: maps key events to reader actions, with config overrides.
//!
//! Digits `1`-`9` in the reader (copy code block n) and free text in the
//! search and path prompts are handled directly by the input layer and are
//! not part of the registry.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    CycleFocus,
    Select,
    Back,
    HistoryBack,
    HistoryForward,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    GoToPath,
    ToggleTheme,
    ShowHelp,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    ScrollTop,
    ScrollBottom,
    ExitReader,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::NavDown => "Move selection down",
            Self::NavUp => "Move selection up",
            Self::CycleFocus => "Switch between menu and posts",
            Self::Select => "Open category / post",
            Self::Back => "Cancel loading / clear search",
            Self::HistoryBack => "Previous page in history",
            Self::HistoryForward => "Next page in history",
            Self::EnterSearch => "Search posts",
            Self::ExitSearch => "Cancel search",
            Self::CommitSearch => "Keep search results",
            Self::GoToPath => "Go to a category path",
            Self::ToggleTheme => "Toggle light/dark theme",
            Self::ShowHelp => "Show help",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::ScrollTop => "Jump to top",
            Self::ScrollBottom => "Jump to bottom",
            Self::ExitReader => "Back to the post grid",
        }
    }

    /// Canonical config name, as accepted by `[keybindings]`.
    pub fn config_name(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::NavDown => "nav_down",
            Self::NavUp => "nav_up",
            Self::CycleFocus => "cycle_focus",
            Self::Select => "select",
            Self::Back => "back",
            Self::HistoryBack => "history_back",
            Self::HistoryForward => "history_forward",
            Self::EnterSearch => "search",
            Self::ExitSearch => "exit_search",
            Self::CommitSearch => "commit_search",
            Self::GoToPath => "go_to_path",
            Self::ToggleTheme => "toggle_theme",
            Self::ShowHelp => "help",
            Self::ScrollDown => "scroll_down",
            Self::ScrollUp => "scroll_up",
            Self::PageDown => "page_down",
            Self::PageUp => "page_up",
            Self::ScrollTop => "scroll_top",
            Self::ScrollBottom => "scroll_bottom",
            Self::ExitReader => "exit_reader",
        }
    }
}

const ALL_ACTIONS: [Action; 21] = [
    Action::Quit,
    Action::NavDown,
    Action::NavUp,
    Action::CycleFocus,
    Action::Select,
    Action::Back,
    Action::HistoryBack,
    Action::HistoryForward,
    Action::EnterSearch,
    Action::ExitSearch,
    Action::CommitSearch,
    Action::GoToPath,
    Action::ToggleTheme,
    Action::ShowHelp,
    Action::ScrollDown,
    Action::ScrollUp,
    Action::PageDown,
    Action::PageUp,
    Action::ScrollTop,
    Action::ScrollBottom,
    Action::ExitReader,
];

/// Parse an action name from config. Accepts the canonical name and a few aliases.
fn parse_action_name(name: &str) -> Option<Action> {
    let name = name.trim().to_lowercase();
    if let Some(action) = ALL_ACTIONS.iter().find(|a| a.config_name() == name) {
        return Some(*action);
    }
    match name.as_str() {
        "down" => Some(Action::NavDown),
        "up" => Some(Action::NavUp),
        "focus" | "tab" => Some(Action::CycleFocus),
        "open" | "enter" => Some(Action::Select),
        "history_prev" | "prev" => Some(Action::HistoryBack),
        "history_next" | "next" => Some(Action::HistoryForward),
        "goto" | "path" => Some(Action::GoToPath),
        "theme" => Some(Action::ToggleTheme),
        "close" | "close_post" => Some(Action::ExitReader),
        _ => None,
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context. Lookups fall back to `Global` when a context has no binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Menu,
    Posts,
    /// Reader and not-found page
    Reader,
    Search,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Everywhere",
            Self::Menu => "Category menu",
            Self::Posts => "Post grid",
            Self::Reader => "Reader",
            Self::Search => "Search",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Terminals report uppercase letters with SHIFT; bindings store them plain.
    fn normalized(self) -> Self {
        match self.code {
            KeyCode::Char(_) => Self::new(self.code, self.modifiers.difference(KeyModifiers::SHIFT)),
            _ => self,
        }
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/", "["
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Left", "Right",
///   "Home", "End", "PageUp", "PageDown", "Backspace", "Space"
/// - Modifier combos: "Ctrl+d", "Alt+Left"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        let c = chars.next()?;
        return chars.next().is_none().then(|| KeySpec::ctrl(c));
    }

    if let Some(rest) = s.strip_prefix("Alt+") {
        let base = parse_key_string(rest)?;
        return Some(KeySpec::new(base.code, base.modifiers | KeyModifiers::ALT));
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s.strip_prefix(['F', 'f']).and_then(|n| n.parse::<u8>().ok()) {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then(|| KeySpec::ch(c))
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let mut out = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        out.push_str("Ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        out.push_str("Alt+");
    }

    match key.code {
        KeyCode::Char(' ') => out.push_str("Space"),
        KeyCode::Char(c) => out.push(c),
        KeyCode::Enter => out.push_str("Enter"),
        KeyCode::Esc => out.push_str("Esc"),
        KeyCode::Tab => out.push_str("Tab"),
        KeyCode::Up => out.push_str("Up"),
        KeyCode::Down => out.push_str("Down"),
        KeyCode::Left => out.push_str("Left"),
        KeyCode::Right => out.push_str("Right"),
        KeyCode::Home => out.push_str("Home"),
        KeyCode::End => out.push_str("End"),
        KeyCode::PageUp => out.push_str("PageUp"),
        KeyCode::PageDown => out.push_str("PageDown"),
        KeyCode::Backspace => out.push_str("Backspace"),
        KeyCode::F(n) => out.push_str(&format!("F{}", n)),
        _ => out.push('?'),
    }
    out
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Default bindings, in help-screen order.
const DEFAULT_BINDINGS: &[(Context, KeySpec, Action)] = &[
    // Everywhere
    (Context::Global, KeySpec::ch('q'), Action::Quit),
    (Context::Global, KeySpec::ch('j'), Action::NavDown),
    (Context::Global, KeySpec::plain(KeyCode::Down), Action::NavDown),
    (Context::Global, KeySpec::ch('k'), Action::NavUp),
    (Context::Global, KeySpec::plain(KeyCode::Up), Action::NavUp),
    (Context::Global, KeySpec::plain(KeyCode::Tab), Action::CycleFocus),
    (Context::Global, KeySpec::plain(KeyCode::Enter), Action::Select),
    (Context::Global, KeySpec::plain(KeyCode::Esc), Action::Back),
    (Context::Global, KeySpec::ch('['), Action::HistoryBack),
    (Context::Global, KeySpec::new(KeyCode::Left, KeyModifiers::ALT), Action::HistoryBack),
    (Context::Global, KeySpec::ch(']'), Action::HistoryForward),
    (Context::Global, KeySpec::new(KeyCode::Right, KeyModifiers::ALT), Action::HistoryForward),
    (Context::Global, KeySpec::ch('/'), Action::EnterSearch),
    (Context::Global, KeySpec::ch('g'), Action::GoToPath),
    (Context::Global, KeySpec::ch('t'), Action::ToggleTheme),
    (Context::Global, KeySpec::ch('?'), Action::ShowHelp),
    // Category menu
    (Context::Menu, KeySpec::ch('l'), Action::Select),
    (Context::Menu, KeySpec::plain(KeyCode::Right), Action::Select),
    // Reader
    (Context::Reader, KeySpec::ch('j'), Action::ScrollDown),
    (Context::Reader, KeySpec::plain(KeyCode::Down), Action::ScrollDown),
    (Context::Reader, KeySpec::ch('k'), Action::ScrollUp),
    (Context::Reader, KeySpec::plain(KeyCode::Up), Action::ScrollUp),
    (Context::Reader, KeySpec::ctrl('d'), Action::PageDown),
    (Context::Reader, KeySpec::plain(KeyCode::PageDown), Action::PageDown),
    (Context::Reader, KeySpec::ch(' '), Action::PageDown),
    (Context::Reader, KeySpec::ctrl('u'), Action::PageUp),
    (Context::Reader, KeySpec::plain(KeyCode::PageUp), Action::PageUp),
    (Context::Reader, KeySpec::plain(KeyCode::Home), Action::ScrollTop),
    (Context::Reader, KeySpec::plain(KeyCode::End), Action::ScrollBottom),
    (Context::Reader, KeySpec::ch('G'), Action::ScrollBottom),
    (Context::Reader, KeySpec::ch('b'), Action::ExitReader),
    (Context::Reader, KeySpec::plain(KeyCode::Esc), Action::ExitReader),
    // Search prompt
    (Context::Search, KeySpec::plain(KeyCode::Esc), Action::ExitSearch),
    (Context::Search, KeySpec::plain(KeyCode::Enter), Action::CommitSearch),
];

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts.
#[derive(Debug, Clone)]
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings, for help screen enumeration
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::with_capacity(DEFAULT_BINDINGS.len()),
        };
        for &(context, key, action) in DEFAULT_BINDINGS {
            registry.bind(context, key, action);
        }
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    /// Apply user overrides from the config `[keybindings]` table.
    ///
    /// Keys in the map are action names (e.g., "quit", "history_back").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5"). An override
    /// replaces every default key of that action, in the same contexts.
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        // Sorted so a conflicting pair resolves the same way on every run
        let mut entries: Vec<_> = overrides.iter().collect();
        entries.sort();

        for (action_name, key_str) in entries {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };
            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (context, _, a) in &self.bindings {
                if *a == action && !contexts.contains(context) {
                    contexts.push(*context);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);
            for context in contexts {
                self.bind(context, key, action);
            }

            tracing::info!(action = %action_name, key = %key_str, "Applied keybinding override");
        }

        warnings
    }

    /// Look up the action for a key in a context, falling back to Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers).normalized();

        self.lookup.get(&(context, key)).copied().or_else(|| {
            (context != Context::Global)
                .then(|| self.lookup.get(&(Context::Global, key)).copied())
                .flatten()
        })
    }

    /// Bindings for the help screen, grouped by context with keys joined.
    ///
    /// Returns (context, "j / Down", description) rows in registration order.
    pub fn help_rows(&self) -> Vec<(Context, String, &'static str)> {
        let mut rows: Vec<(Context, Action, Vec<String>)> = Vec::new();
        for (context, key, action) in &self.bindings {
            match rows
                .iter_mut()
                .find(|(c, a, _)| c == context && a == action)
            {
                Some((_, _, keys)) => keys.push(format_key(key)),
                None => rows.push((*context, *action, vec![format_key(key)])),
            }
        }
        rows.into_iter()
            .map(|(context, action, keys)| (context, keys.join(" / "), action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
