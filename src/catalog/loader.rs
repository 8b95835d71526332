use super::{extract_meta, not_found_meta, PostEntry, PostMeta};
use crate::content::{join_ordered, PostFetcher};
use futures::future::{BoxFuture, FutureExt};

/// Fetch every entry and build the catalog.
///
/// All fetches run at once but the result keeps `entries` order. A failed
/// fetch yields placeholder metadata; the batch itself never fails.
pub async fn load_catalog(fetcher: &PostFetcher, entries: &[PostEntry]) -> Vec<PostMeta> {
    let started = std::time::Instant::now();

    // Each future owns its entry and client so the batch can be spawned
    let fetches: Vec<BoxFuture<'static, PostMeta>> = entries
        .iter()
        .map(|entry| {
            let entry = entry.clone();
            let fetcher = fetcher.clone();
            async move {
                match fetcher.fetch(&entry.locator).await {
                    Ok(body) => extract_meta(&entry, &body),
                    Err(e) => {
                        tracing::warn!(locator = %entry.locator, error = %e, "Post fetch failed");
                        not_found_meta(&entry)
                    }
                }
            }
            .boxed()
        })
        .collect();

    let limit = fetches.len();
    let metas = join_ordered(fetches, limit).await;

    tracing::info!(
        posts = metas.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Catalog loaded"
    );
    metas
}
