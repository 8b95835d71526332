//! Post content retrieval.
//!
//! - `fetcher` - HTTP client for `GET {base}/posts/{locator}`
//! - `batch` - ordered concurrent join used by the catalog loader

mod batch;
mod fetcher;

pub use batch::join_ordered;
pub use fetcher::{ContentError, PostFetcher, DEFAULT_TIMEOUT, MAX_CONTENT_SIZE};
