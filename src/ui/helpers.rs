//! Background task spawning shared by the UI layer.

use crate::app::{App, AppEvent};
use crate::catalog::{load_catalog, PostEntry};
use crate::content::PostFetcher;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of a spawned task silently disappearing, the panic message comes
/// back as `Err(String)` so it can be reported through `AppEvent::TaskPanicked`.
///
/// # Returns
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Report a panicked task to the event loop.
async fn report_panic(tx: &mpsc::Sender<AppEvent>, task: &'static str, error: String) {
    tracing::error!(task, error = %error, "Background task panicked");
    let _ = tx.send(AppEvent::TaskPanicked { task, error }).await;
}

/// Spawn the one-time catalog load.
///
/// Sends `AppEvent::CatalogLoaded` with metadata in `entries` order. Per-post
/// failures are already folded into placeholder entries by the loader.
pub fn spawn_catalog_load(
    fetcher: PostFetcher,
    entries: Vec<PostEntry>,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match catch_task_panic(load_catalog(&fetcher, &entries)).await {
            Ok(metas) => {
                if let Err(e) = tx.send(AppEvent::CatalogLoaded(metas)).await {
                    tracing::warn!(error = %e, event = "CatalogLoaded", "Channel send failed (receiver dropped)");
                }
            }
            Err(panic_msg) => report_panic(&tx, "catalog_load", panic_msg).await,
        }
    })
}

/// Spawn a single post fetch tagged with `generation`.
pub(super) fn spawn_post_load(
    locator: Arc<str>,
    generation: u64,
    fetcher: PostFetcher,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = catch_task_panic(fetcher.fetch(&locator)).await;
        match outcome {
            Ok(result) => {
                let event = AppEvent::PostLoaded {
                    locator,
                    generation,
                    result,
                };
                if let Err(e) = tx.send(event).await {
                    tracing::warn!(error = %e, event = "PostLoaded", "Channel send failed (receiver dropped)");
                }
            }
            Err(panic_msg) => report_panic(&tx, "post_load", panic_msg).await,
        }
    })
}

/// Start loading `locator` and keep the task handle on the app so a newer
/// request (or navigation) can abort it.
pub(super) fn request_open_post(
    app: &mut App,
    locator: &str,
    fetcher: &PostFetcher,
    tx: &mpsc::Sender<AppEvent>,
) {
    let generation = app.open_post(locator);
    tracing::debug!(locator, generation, "Spawning post load");
    let handle = spawn_post_load(Arc::from(locator), generation, fetcher.clone(), tx.clone());
    app.post_load_handle = Some(handle);
}
