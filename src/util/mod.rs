//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **URL validation**: blog host URLs and post locators
//! - **Text processing**: Unicode-aware string width calculation, truncation
//!   and control-character stripping
//!
//! # Examples
//!
//! ```
//! use folio::util::{validate_locator, display_width, truncate_to_width};
//!
//! assert!(validate_locator("tools/docker/docker.md").is_ok());
//!
//! // Calculate display width for proper terminal rendering
//! let width = display_width("Hello 世界"); // Returns 10 (6 + 2*2)
//!
//! // Truncate to fit terminal width
//! let truncated = truncate_to_width("Long article title", 15);
//! ```

mod text;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_base_url, validate_locator, UrlValidationError};

/// Maximum allowed search query length (UI input validation)
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
