use super::{NOT_FOUND_EXCERPT, NO_DESCRIPTION_EXCERPT};
use crate::util::strip_control_chars;
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};

/// Minimum character count for a line to become an excerpt.
const MIN_EXCERPT_CHARS: usize = 20;

/// A post as declared in config: which category it belongs to and where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostEntry {
    pub category: String,
    pub locator: String,
}

impl PostEntry {
    pub fn new(category: &str, locator: &str) -> Self {
        Self {
            category: category.to_string(),
            locator: locator.to_string(),
        }
    }
}

/// Display metadata for one post card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMeta {
    pub locator: Arc<str>,
    pub title: Arc<str>,
    pub excerpt: Arc<str>,
    pub category: Arc<str>,
    pub image: Option<Arc<str>>,
}

fn image_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[.*?\]\((.*?)\)").unwrap())
}

/// Derive a readable title from a locator.
///
/// Last path segment, extension removed, `-` and `_` turned into spaces.
///
/// ```
/// use folio::catalog::humanize_locator;
///
/// assert_eq!(humanize_locator("tools/docker/docker-basics.md"), "docker basics");
/// assert_eq!(humanize_locator("missing.md"), "missing");
/// ```
pub fn humanize_locator(locator: &str) -> String {
    let file = locator.rsplit('/').next().unwrap_or(locator);
    let stem = match file.rfind('.') {
        Some(idx) if idx > 0 => &file[..idx],
        _ => file,
    };
    stem.replace(['-', '_'], " ")
}

/// True when the body looks like a server HTML error page instead of a post.
pub fn is_error_page(body: &str) -> bool {
    body.contains("<!DOCTYPE") || body.contains("<html")
}

/// Placeholder metadata for a post that could not be fetched.
pub fn not_found_meta(entry: &PostEntry) -> PostMeta {
    PostMeta {
        locator: Arc::from(entry.locator.as_str()),
        title: Arc::from(humanize_locator(&entry.locator)),
        excerpt: Arc::from(NOT_FOUND_EXCERPT),
        category: Arc::from(entry.category.as_str()),
        image: None,
    }
}

/// Extract card metadata from a fetched post body.
pub fn extract_meta(entry: &PostEntry, body: &str) -> PostMeta {
    if is_error_page(body) {
        return not_found_meta(entry);
    }
    let body = strip_control_chars(body);

    let title = body
        .lines()
        .find(|line| line.starts_with('#'))
        .map(|line| line.trim_start_matches('#').trim())
        .filter(|heading| !heading.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| humanize_locator(&entry.locator));

    let excerpt = body
        .lines()
        .map(str::trim)
        .find(|line| {
            !line.is_empty()
                && !line.starts_with('#')
                && !line.starts_with('!')
                && !line.starts_with("```")
                && line.chars().count() >= MIN_EXCERPT_CHARS
        })
        .unwrap_or(NO_DESCRIPTION_EXCERPT);

    let image = image_regex()
        .captures(&body)
        .and_then(|caps| caps.get(1))
        .map(|m| Arc::from(m.as_str()));

    PostMeta {
        locator: Arc::from(entry.locator.as_str()),
        title: Arc::from(title),
        excerpt: Arc::from(excerpt),
        category: Arc::from(entry.category.as_str()),
        image,
    }
}
