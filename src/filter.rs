//! Category and search filtering over the post catalog.

use crate::catalog::PostMeta;
use crate::menu::ROOT_ID;

fn category_matches(meta: &PostMeta, category: Option<&str>) -> bool {
    match category {
        None | Some(ROOT_ID) => true,
        Some(id) => &*meta.category == id,
    }
}

fn query_matches(meta: &PostMeta, needle: &str) -> bool {
    [&meta.title, &meta.excerpt, &meta.locator, &meta.category]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Posts visible for a category and search query, in catalog order.
///
/// The category must match exactly (descendants are not included); `None`
/// passes everything. A blank (whitespace-only) query passes everything;
/// otherwise the query as typed, surrounding spaces included, is matched
/// case-insensitively against title, excerpt, locator and category.
pub fn filter_posts(catalog: &[PostMeta], category: Option<&str>, query: &str) -> Vec<PostMeta> {
    let blank = query.trim().is_empty();
    let needle = query.to_lowercase();

    catalog
        .iter()
        .filter(|meta| category_matches(meta, category))
        .filter(|meta| blank || query_matches(meta, &needle))
        .cloned()
        .collect()
}
