//! Host integrations behind narrow traits.
//!
//! The controller only talks to these traits, so the terminal build and the
//! tests plug in different implementations:
//!
//! | Trait | Terminal | Tests |
//! |---|---|---|
//! | [`Navigator`] | [`AddressBar`] | [`AddressBar`] |
//! | [`HistoryStore`] | [`SessionHistory`] | [`SessionHistory`] |
//! | [`ClipboardWriter`] | [`Osc52Clipboard`] | [`MemoryClipboard`] |
//! | [`PreferenceStore`] | [`FilePreferences`] | [`MemoryPreferences`] |

mod clipboard;
mod history;
mod navigator;
mod preferences;

pub use clipboard::{ClipboardError, MemoryClipboard, Osc52Clipboard};
pub use history::{HistoryEntry, SessionHistory};
pub use navigator::AddressBar;
pub use preferences::{FilePreferences, MemoryPreferences, PreferenceError};

/// The current location shown to the reader.
pub trait Navigator {
    fn current_path(&self) -> &str;
    fn set_path(&mut self, path: &str);
}

/// Back/forward stack of visited locations.
pub trait HistoryStore {
    /// Add an entry after the cursor, dropping any forward entries.
    fn push(&mut self, entry: HistoryEntry);
    /// Overwrite the entry at the cursor.
    fn replace(&mut self, entry: HistoryEntry);
    /// Move back one entry; `None` at the start.
    fn back(&mut self) -> Option<&HistoryEntry>;
    /// Move forward one entry; `None` at the end.
    fn forward(&mut self) -> Option<&HistoryEntry>;
}

pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// String key-value persistence.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// The set of host integrations handed to the controller.
pub struct Platform {
    pub navigator: Box<dyn Navigator>,
    pub history: Box<dyn HistoryStore>,
    pub clipboard: Box<dyn ClipboardWriter>,
    pub preferences: Box<dyn PreferenceStore>,
}

impl Platform {
    /// Terminal integrations, with preferences stored at `preferences_path`.
    pub fn terminal(preferences_path: &std::path::Path) -> Self {
        Self {
            navigator: Box::new(AddressBar::default()),
            history: Box::new(SessionHistory::new()),
            clipboard: Box::new(Osc52Clipboard::stdout()),
            preferences: Box::new(FilePreferences::open(preferences_path)),
        }
    }

    /// In-memory integrations sharing state with the given test doubles.
    pub fn in_memory(clipboard: MemoryClipboard, preferences: MemoryPreferences) -> Self {
        Self {
            navigator: Box::new(AddressBar::default()),
            history: Box::new(SessionHistory::new()),
            clipboard: Box::new(clipboard),
            preferences: Box::new(preferences),
        }
    }
}
