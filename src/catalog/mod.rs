//! Post catalog: the static list of posts and the metadata derived from them.

mod loader;
mod meta;

pub use loader::load_catalog;
pub use meta::{extract_meta, humanize_locator, is_error_page, not_found_meta, PostEntry, PostMeta};

/// Excerpt used when a post could not be fetched.
pub const NOT_FOUND_EXCERPT: &str = "File not found on server.";

/// Excerpt used when no paragraph qualifies.
pub const NO_DESCRIPTION_EXCERPT: &str = "No description available.";
