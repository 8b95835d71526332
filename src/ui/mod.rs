//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling for listing, reader, search and prompts
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch
//! - `helpers` - Background task spawning
//! - `categories` - Category menu widget
//! - `posts` - Post grid widget
//! - `reader` - Post reader widget
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod categories;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod posts;
mod reader;
mod render;
mod status;

pub use helpers::spawn_catalog_load;
pub use loop_runner::{run, Action};
