//! Integration tests for routing: deep links, menu selection, history and search.
//!
//! Each test builds its own controller over in-memory platform integrations,
//! so the address bar and history can be inspected without a terminal.

use folio::app::{App, View};
use folio::catalog::PostMeta;
use folio::config::Config;
use folio::platform::{MemoryClipboard, MemoryPreferences, Platform};
use folio::theme::ThemeVariant;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn meta(locator: &str, title: &str, category: &str) -> PostMeta {
    PostMeta {
        locator: Arc::from(locator),
        title: Arc::from(title),
        excerpt: Arc::from("An excerpt long enough to show."),
        category: Arc::from(category),
        image: None,
    }
}

fn test_app() -> App {
    let platform = Platform::in_memory(MemoryClipboard::default(), MemoryPreferences::new());
    let menu = Config::default().menu_tree().unwrap();
    let mut app = App::new(menu, platform, ThemeVariant::Dark);
    app.apply_catalog(vec![
        meta("tools/docker/docker.md", "Docker Basics", "DOCKER"),
        meta("tools/docker/docker-compose.md", "Docker Compose", "DOCKER"),
        meta("big-data/starburst.md", "Starburst", "BIG_DATA"),
        meta("tools/spark/reused-spark-code.md", "Reused Spark Code", "SPARK"),
    ]);
    app
}

fn titles(app: &App) -> Vec<&str> {
    app.visible_posts.iter().map(|p| &*p.title).collect()
}

// ============================================================================
// Deep Links
// ============================================================================

#[test]
fn test_deep_link_to_nested_category() {
    let mut app = test_app();
    app.route_initial("/TOOLS/DOCKER");

    assert_eq!(app.view, View::Listing);
    assert_eq!(app.current_category.as_deref(), Some("DOCKER"));
    assert_eq!(app.active_chain, vec!["TOOLS".to_string(), "DOCKER".to_string()]);
    assert_eq!(app.address(), "/TOOLS/DOCKER");
    assert_eq!(titles(&app), vec!["Docker Basics", "Docker Compose"]);
}

#[test]
fn test_deep_link_tolerates_trailing_slash() {
    let mut app = test_app();
    app.route_initial("/BIG_DATA/");

    assert_eq!(app.current_category.as_deref(), Some("BIG_DATA"));
    assert_eq!(titles(&app), vec!["Starburst"]);
}

#[test]
fn test_unknown_path_shows_not_found() {
    let mut app = test_app();
    app.route_initial("/TOOLS/NOPE");

    assert_eq!(app.view, View::NotFound);
    assert!(app.not_found_message.contains("TOOLS/NOPE"));
}

#[test]
fn test_all_is_root() {
    let mut app = test_app();
    app.route_initial("/All");

    assert_eq!(app.view, View::Listing);
    assert_eq!(app.current_category, None);
    assert_eq!(app.visible_posts.len(), 4);
}

// ============================================================================
// History
// ============================================================================

#[test]
fn test_back_and_forward_restore_categories() {
    let mut app = test_app();
    app.route_initial("/");
    app.select_category(Some("DOCKER"));
    app.select_category(Some("SPARK"));

    app.history_back();
    assert_eq!(app.current_category.as_deref(), Some("DOCKER"));
    assert_eq!(app.address(), "/TOOLS/DOCKER");

    app.history_back();
    assert_eq!(app.current_category, None);
    assert_eq!(app.address(), "/");

    app.history_forward();
    app.history_forward();
    assert_eq!(app.current_category.as_deref(), Some("SPARK"));
    assert_eq!(app.address(), "/TOOLS/SPARK");
}

#[test]
fn test_new_selection_drops_forward_entries() {
    let mut app = test_app();
    app.route_initial("/");
    app.select_category(Some("DOCKER"));
    app.history_back();
    app.select_category(Some("BIG_DATA"));

    app.history_forward();
    assert_eq!(app.current_category.as_deref(), Some("BIG_DATA"));
}

#[test]
fn test_typed_path_is_a_history_entry() {
    let mut app = test_app();
    app.route_initial("/");
    app.navigate_to_path("/TOOLS/SPARK");
    assert_eq!(app.current_category.as_deref(), Some("SPARK"));

    app.history_back();
    assert_eq!(app.current_category, None);
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn test_search_within_category() {
    let mut app = test_app();
    app.route_initial("/TOOLS/DOCKER");
    app.set_search_query("compose");

    assert_eq!(titles(&app), vec!["Docker Compose"]);
}

#[test]
fn test_search_survives_category_change() {
    let mut app = test_app();
    app.route_initial("/");
    app.set_search_query("docker");
    assert_eq!(app.visible_posts.len(), 2);

    app.select_category(Some("SPARK"));
    assert!(app.visible_posts.is_empty());

    app.set_search_query("");
    assert_eq!(titles(&app), vec!["Reused Spark Code"]);
}

#[test]
fn test_search_leaves_not_found_page() {
    let mut app = test_app();
    app.route_initial("/missing");
    assert_eq!(app.view, View::NotFound);

    app.set_search_query("star");
    assert_eq!(app.view, View::Listing);
}

#[test]
fn test_back_from_typed_unknown_path() {
    let mut app = test_app();
    app.route_initial("/");
    app.select_category(Some("SPARK"));
    app.navigate_to_path("/TOOLS/NOPE");
    assert_eq!(app.view, View::NotFound);
    assert_eq!(app.address(), "/TOOLS/NOPE");

    app.history_back();
    assert_eq!(app.view, View::Listing);
    assert_eq!(app.current_category.as_deref(), Some("SPARK"));
    assert_eq!(app.address(), "/TOOLS/SPARK");
}
