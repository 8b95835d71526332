use thiserror::Error;
use url::Url;

/// Errors that can occur while validating the blog host URL or a post locator.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The base URL carries a query string or fragment.
    #[error("Base URL must not contain a query or fragment")]
    QueryOrFragment,
    /// The locator would escape the posts directory or is not a relative path.
    #[error("Invalid post locator: {0:?}")]
    InvalidLocator(String),
}

/// Validates the blog host URL that posts are fetched from.
///
/// Only `http` and `https` are accepted. The returned URL always ends in `/`
/// so that relative joins append to it instead of replacing its last segment.
///
/// # Examples
///
/// ```
/// use folio::util::validate_base_url;
///
/// let url = validate_base_url("https://blog.example.com/site").unwrap();
/// assert_eq!(url.as_str(), "https://blog.example.com/site/");
///
/// assert!(validate_base_url("file:///srv/blog").is_err());
/// ```
pub fn validate_base_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let mut url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(UrlValidationError::QueryOrFragment);
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Validates a post locator: a relative, slash-separated path below `/posts/`.
///
/// Rejects absolute paths, `..` segments, empty segments, backslashes, and
/// anything that would be read as a scheme, query or fragment.
pub fn validate_locator(locator: &str) -> Result<&str, UrlValidationError> {
    let invalid = || UrlValidationError::InvalidLocator(locator.to_string());

    if locator.is_empty()
        || locator.starts_with('/')
        || locator.contains(['\\', '?', '#', ':'])
        || locator.chars().any(char::is_control)
    {
        return Err(invalid());
    }

    if locator
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(invalid());
    }

    Ok(locator)
}
