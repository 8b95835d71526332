//! folio: a terminal reader for markdown blogs.
//!
//! The binary in `main.rs` wires these modules together; integration tests
//! drive the controller and the catalog loader through this library target.

pub mod app;
pub mod catalog;
pub mod config;
pub mod content;
pub mod filter;
pub mod keybindings;
pub mod menu;
pub mod platform;
pub mod render;
pub mod theme;
pub mod ui;
pub mod util;
