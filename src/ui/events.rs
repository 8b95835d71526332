//! Application event handling.
//!
//! Applies background task results (catalog load, post fetches) to the app.

use crate::app::{App, AppEvent};

/// Handle an event from a background task.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::CatalogLoaded(metas) => {
            let count = metas.len();
            app.apply_catalog(metas);
            tracing::info!(count, visible = app.visible_posts.len(), "Catalog applied");
        }
        AppEvent::PostLoaded {
            locator,
            generation,
            result,
        } => {
            app.apply_post_loaded(&locator, generation, result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            match task {
                // Nothing else will resolve the pending request
                "post_load" => app.cancel_post_load(),
                // Show the (empty) grid rather than a loading placeholder forever
                "catalog_load" => app.apply_catalog(Vec::new()),
                _ => {}
            }
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}
