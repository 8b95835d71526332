use super::ClipboardWriter;
use crossterm_osc52::clipboard::CopyToClipboard;
use std::io::{Stdout, Write};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Failed to write to terminal clipboard: {0}")]
    Io(#[from] std::io::Error),
}

/// Copies through the terminal with an OSC 52 escape sequence.
///
/// Works over SSH and inside most multiplexers; terminals without OSC 52
/// support silently ignore the sequence.
#[derive(Debug)]
pub struct Osc52Clipboard<W: Write = Stdout> {
    out: W,
}

impl Osc52Clipboard {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl Default for Osc52Clipboard {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write> Osc52Clipboard<W> {
    /// Write the escape sequence to `out` instead of stdout.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ClipboardWriter for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        crossterm_osc52::execute!(self.out, CopyToClipboard::to_clipboard_from(text))?;
        tracing::debug!(bytes = text.len(), "Copied to clipboard");
        Ok(())
    }
}

/// Records copied text instead of touching the terminal.
///
/// Clones share the same slot, so a test can keep a handle after giving
/// the clipboard to the controller.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|slot| slot.clone())
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if let Ok(mut slot) = self.contents.lock() {
            *slot = Some(text.to_string());
        }
        Ok(())
    }
}
