use crate::util::{validate_base_url, validate_locator, UrlValidationError};
use futures::StreamExt;
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Largest post body accepted (5MB).
pub const MAX_CONTENT_SIZE: usize = 5 * 1024 * 1024;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    #[error(transparent)]
    InvalidUrl(#[from] UrlValidationError),
}

impl ContentError {
    /// True when the host answered but the post is not there.
    ///
    /// Any non-success status counts, not just 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::HttpStatus(_))
    }
}

/// Limit redirects to 3 hops and refuse loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// Fetches raw post text from `{base_url}/posts/{locator}`.
///
/// Cloning is cheap: the reqwest client is reference counted.
/// A single attempt is made per call; there is no retry.
#[derive(Clone, Debug)]
pub struct PostFetcher {
    client: reqwest::Client,
    base: Url,
    timeout: Duration,
    max_body: usize,
}

impl PostFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ContentError> {
        let base = validate_base_url(base_url)?;

        let client = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base,
            timeout,
            max_body: MAX_CONTENT_SIZE,
        })
    }

    /// Override the body size limit (used by tests to avoid multi-megabyte fixtures).
    pub fn with_max_body(mut self, max_body: usize) -> Self {
        self.max_body = max_body;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL of a post.
    pub fn post_url(&self, locator: &str) -> Result<Url, ContentError> {
        let locator = validate_locator(locator)?;
        let url = self
            .base
            .join("posts/")
            .and_then(|posts| posts.join(locator))
            .map_err(UrlValidationError::from)?;
        Ok(url)
    }

    /// Fetch the raw text of a post.
    ///
    /// Non-success statuses come back as [`ContentError::HttpStatus`].
    pub async fn fetch(&self, locator: &str) -> Result<String, ContentError> {
        let url = self.post_url(locator)?;
        tracing::debug!(%url, "Fetching post");

        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| ContentError::Timeout(self.timeout.as_secs()))?
            .map_err(ContentError::Network)?;

        if !response.status().is_success() {
            tracing::debug!(locator, status = response.status().as_u16(), "Post fetch failed");
            return Err(ContentError::HttpStatus(response.status().as_u16()));
        }

        tokio::time::timeout(self.timeout, read_limited_text(response, self.max_body))
            .await
            .map_err(|_| ContentError::Timeout(self.timeout.as_secs()))?
    }
}

async fn read_limited_text(
    response: reqwest::Response,
    limit: usize,
) -> Result<String, ContentError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ContentError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ContentError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ContentError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| ContentError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_for(server: &MockServer) -> PostFetcher {
        PostFetcher::new(&server.uri(), DEFAULT_TIMEOUT).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/tools/docker/docker.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Docker\n\nHello world"))
            .mount(&mock_server)
            .await;

        let text = fetcher_for(&mock_server)
            .fetch("tools/docker/docker.md")
            .await
            .unwrap();
        assert!(text.starts_with("# Docker"));
    }

    #[tokio::test]
    async fn test_http_404_is_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = fetcher_for(&mock_server).fetch("missing.md").await.unwrap_err();
        assert!(matches!(err, ContentError::HttpStatus(404)));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_http_500_is_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let err = fetcher_for(&mock_server).fetch("post.md").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_response_too_large() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
            .mount(&mock_server)
            .await;

        let err = fetcher_for(&mock_server)
            .with_max_body(16)
            .fetch("big.md")
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::ResponseTooLarge(16)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let fetcher = PostFetcher::new(&mock_server.uri(), Duration::from_millis(50)).unwrap();
        let err = fetcher.fetch("slow.md").await.unwrap_err();
        assert!(matches!(err, ContentError::Timeout(_)));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_invalid_locator_never_hits_network() {
        let fetcher = PostFetcher::new("http://127.0.0.1:9", DEFAULT_TIMEOUT).unwrap();
        let err = fetcher.fetch("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, ContentError::InvalidUrl(_)));
    }

    #[test]
    fn test_post_url_under_base_path() {
        let fetcher = PostFetcher::new("https://example.com/blog", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            fetcher.post_url("big-data/starburst.md").unwrap().as_str(),
            "https://example.com/blog/posts/big-data/starburst.md"
        );
    }

    #[test]
    fn test_post_url_encodes_spaces() {
        let fetcher = PostFetcher::new("http://localhost:8000", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            fetcher.post_url("my notes.md").unwrap().as_str(),
            "http://localhost:8000/posts/my%20notes.md"
        );
    }

    #[test]
    fn test_insecure_scheme_rejected() {
        let err = PostFetcher::new("ftp://example.com", DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, ContentError::InvalidUrl(_)));
    }
}
