use crate::catalog::{humanize_locator, PostMeta};
use crate::content::ContentError;
use crate::filter::filter_posts;
use crate::keybindings::KeybindingRegistry;
use crate::menu::{normalize_path, MenuItem, MenuTree, PathLookup, ROOT_ID};
use crate::platform::{HistoryEntry, Platform};
use crate::render::{render_markdown, Highlighter, KeywordHighlighter, RenderedPost};
use crate::theme::{ColorPalette, ThemeVariant};
use ratatui::text::Line;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use unicode_width::UnicodeWidthStr;

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// How long an ordinary status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// How long the "Copied!" confirmation stays visible.
const COPIED_TTL: Duration = Duration::from_secs(2);

// ============================================================================
// View and Focus Enums
// ============================================================================

/// Which main region is shown. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Post grid, filtered by category and search query
    Listing,
    /// A single rendered post
    ReadingPost,
    /// Unresolvable path or failed post load
    NotFound,
}

/// Which panel has focus in the Listing view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Menu,
    Posts,
}

/// How a category change is recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Replace,
    /// Moving through existing entries: record nothing.
    Keep,
}

// ============================================================================
// Content and Event Types
// ============================================================================

/// A post open in the reader.
#[derive(Debug, Clone)]
pub struct OpenPost {
    pub locator: Arc<str>,
    pub title: Arc<str>,
    /// Raw post text, kept so a theme change can re-render it.
    pub source: String,
    pub rendered: RenderedPost,
}

/// Events from background tasks
pub enum AppEvent {
    /// The catalog batch finished; metadata is in configured order.
    CatalogLoaded(Vec<PostMeta>),
    /// A post fetch finished.
    ///
    /// Fields:
    /// - `locator`: The post that was requested
    /// - `generation`: The generation counter when this load was spawned
    /// - `result`: The post text or error from fetching
    PostLoaded {
        locator: Arc<str>,
        generation: u64,
        result: Result<String, ContentError>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

/// Transient message in the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: Cow<'static, str>,
    pub set_at: Instant,
    pub ttl: Duration,
}

// ============================================================================
// Application State
// ============================================================================

/// Session state and the routing state machine.
pub struct App {
    // Static data
    pub menu: MenuTree,
    /// Flattened menu rows, built once (the tree is immutable).
    pub menu_items: Vec<MenuItem>,

    // Catalog
    /// Full catalog in configured order. Empty until the load completes.
    pub catalog: Arc<Vec<PostMeta>>,
    pub catalog_loaded: bool,
    /// Catalog filtered by the current category and search query.
    pub visible_posts: Vec<PostMeta>,

    // Routing
    /// Current category, `None` for "All".
    pub current_category: Option<String>,
    /// Ids on the path to the current category, for menu highlighting.
    pub active_chain: Vec<String>,
    pub view: View,
    pub not_found_message: String,

    // Search
    pub search_mode: bool,
    pub search_query: String,

    // Go-to-path prompt
    pub path_input: Option<String>,

    // Help overlay
    pub show_help: bool,
    pub help_scroll_offset: usize,
    pub keybindings: KeybindingRegistry,

    // Theme
    pub theme_variant: ThemeVariant,
    pub palette: ColorPalette,

    // UI State
    pub focus: Focus,
    pub selected_menu: usize,
    pub selected_post: usize,
    pub scroll_offset: usize,
    /// Last known reader viewport height, excluding borders.
    pub reader_visible_lines: usize,
    /// Last known reader viewport width, excluding borders.
    pub reader_viewport_width: usize,
    pub spinner_frame: usize,
    pub needs_redraw: bool,

    pub status_message: Option<StatusMessage>,

    // Post loading
    /// Post requested but not yet resolved. The view does not change until it is.
    pub pending_post: Option<Arc<str>>,
    pub open_post: Option<OpenPost>,

    /// Generation counter for post loading.
    ///
    /// Incremented each time a load starts. Results carrying an older
    /// generation are dropped, so a slow response for A cannot replace B
    /// after the reader moved on.
    pub post_load_generation: u64,

    /// Handle to the current post load task, aborted when superseded.
    pub post_load_handle: Option<tokio::task::JoinHandle<()>>,

    // Collaborators
    platform: Platform,
    highlighter: Box<dyn Highlighter>,
}

impl App {
    /// Build the controller.
    ///
    /// A saved `theme` preference wins over `default_theme`.
    pub fn new(menu: MenuTree, platform: Platform, default_theme: ThemeVariant) -> Self {
        let theme_variant = platform
            .preferences
            .get("theme")
            .and_then(|saved| ThemeVariant::from_str_name(&saved))
            .unwrap_or(default_theme);
        let menu_items = menu.flatten();

        Self {
            menu,
            menu_items,
            catalog: Arc::new(Vec::new()),
            catalog_loaded: false,
            visible_posts: Vec::new(),
            current_category: None,
            active_chain: Vec::new(),
            view: View::Listing,
            not_found_message: String::new(),
            search_mode: false,
            search_query: String::new(),
            path_input: None,
            show_help: false,
            help_scroll_offset: 0,
            keybindings: KeybindingRegistry::new(),
            theme_variant,
            palette: theme_variant.palette(),
            focus: Focus::Posts,
            selected_menu: 0,
            selected_post: 0,
            scroll_offset: 0,
            reader_visible_lines: 0,
            reader_viewport_width: 0,
            spinner_frame: 0,
            needs_redraw: true,
            status_message: None,
            pending_post: None,
            open_post: None,
            post_load_generation: 0,
            post_load_handle: None,
            platform,
            highlighter: Box::new(KeywordHighlighter),
        }
    }

    /// Replace the code highlighter.
    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Path currently shown in the address bar.
    pub fn address(&self) -> &str {
        self.platform.navigator.current_path()
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// Route the startup path. The current history entry is replaced, not pushed.
    pub fn route_initial(&mut self, path: &str) {
        self.route(path, HistoryMode::Replace);
    }

    /// Route a typed path. Unlike startup, this adds a history entry.
    pub fn navigate_to_path(&mut self, path: &str) {
        self.route(path, HistoryMode::Push);
    }

    fn route(&mut self, path: &str, mode: HistoryMode) {
        let path = normalize_path(path);
        let target = match self.menu.lookup_path(path) {
            PathLookup::Root => Ok(None),
            PathLookup::Category(id) => Ok(Some(id.to_string())),
            PathLookup::Unknown => Err(format!("Category \"{}\" not found", path)),
        };

        match target {
            Ok(id) => self.enter_category(id.as_deref(), mode),
            Err(message) => {
                tracing::info!(path, "Path does not match any category");
                // The failed path stays in the address bar and in history
                self.record_location(&format!("/{}", path), None, mode);
                self.show_not_found(message);
            }
        }
    }

    fn record_location(&mut self, path: &str, id: Option<&str>, mode: HistoryMode) {
        let entry = HistoryEntry::new(path, id);
        match mode {
            HistoryMode::Push => {
                self.platform.navigator.set_path(path);
                self.platform.history.push(entry);
            }
            HistoryMode::Replace => {
                self.platform.navigator.set_path(path);
                self.platform.history.replace(entry);
            }
            HistoryMode::Keep => {}
        }
    }

    /// Select a category from the menu, adding a history entry.
    pub fn select_category(&mut self, id: Option<&str>) {
        self.enter_category(id, HistoryMode::Push);
    }

    /// Step back through history. Does nothing at the oldest entry.
    pub fn history_back(&mut self) {
        let Some(entry) = self.platform.history.back().cloned() else {
            self.set_status("No earlier page");
            return;
        };
        self.restore_entry(entry);
    }

    /// Step forward through history. Does nothing at the newest entry.
    pub fn history_forward(&mut self) {
        let Some(entry) = self.platform.history.forward().cloned() else {
            self.set_status("No later page");
            return;
        };
        self.restore_entry(entry);
    }

    fn restore_entry(&mut self, entry: HistoryEntry) {
        self.platform.navigator.set_path(&entry.path);
        if entry.category.is_none() && matches!(self.menu.lookup_path(&entry.path), PathLookup::Unknown) {
            // An entry recorded for a path that never resolved
            self.route(&entry.path, HistoryMode::Keep);
            return;
        }
        self.enter_category(entry.category.as_deref(), HistoryMode::Keep);
    }

    /// Address of a category: `/` for the root, else `/{path}`.
    fn category_address(&self, id: Option<&str>) -> String {
        format!("/{}", self.menu.resolve_path_for_id(id).unwrap_or_default())
    }

    fn enter_category(&mut self, id: Option<&str>, mode: HistoryMode) {
        let id = id.filter(|id| *id != ROOT_ID);
        if !self.menu.contains(id) {
            tracing::warn!(category = ?id, "Selected category is not in the menu");
        }

        self.cancel_post_load();
        self.current_category = id.map(str::to_string);
        self.active_chain = self.menu.active_chain(id);
        self.view = View::Listing;
        self.open_post = None;
        self.scroll_offset = 0;
        self.sync_menu_selection();
        self.refresh_visible_posts();

        let path = self.category_address(id);
        self.record_location(&path, id, mode);

        tracing::debug!(category = ?id, path = %path, visible = self.visible_posts.len(), "Entered category");
        self.needs_redraw = true;
    }

    fn show_not_found(&mut self, message: String) {
        self.cancel_post_load();
        self.view = View::NotFound;
        self.not_found_message = message;
        self.open_post = None;
        self.needs_redraw = true;
    }

    // ========================================================================
    // Catalog and Filtering
    // ========================================================================

    /// Replace the catalog once the batch load completes.
    pub fn apply_catalog(&mut self, metas: Vec<PostMeta>) {
        self.catalog = Arc::new(metas);
        self.catalog_loaded = true;
        self.refresh_visible_posts();
        self.needs_redraw = true;
    }

    /// Update the search query and recompute the visible posts.
    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
        if self.view != View::Listing {
            self.close_post();
        }
        self.refresh_visible_posts();
        self.needs_redraw = true;
    }

    fn refresh_visible_posts(&mut self) {
        self.visible_posts = filter_posts(
            &self.catalog,
            self.current_category.as_deref(),
            &self.search_query,
        );
        self.selected_post = self
            .selected_post
            .min(self.visible_posts.len().saturating_sub(1));
    }

    fn sync_menu_selection(&mut self) {
        let current = self.current_category.as_deref();
        if let Some(idx) = self
            .menu_items
            .iter()
            .position(|item| item.id.as_deref() == current)
        {
            self.selected_menu = idx;
        }
    }

    /// The post under the cursor in the grid.
    pub fn selected_post(&self) -> Option<&PostMeta> {
        self.visible_posts.get(self.selected_post)
    }

    /// The menu row under the cursor.
    pub fn selected_menu_item(&self) -> Option<&MenuItem> {
        self.menu_items.get(self.selected_menu)
    }

    // ========================================================================
    // Post Loading
    // ========================================================================

    /// Start loading a post. Returns the generation the result must carry.
    ///
    /// The view stays as it is until [`apply_post_loaded`](Self::apply_post_loaded).
    pub fn open_post(&mut self, locator: &str) -> u64 {
        self.cancel_post_load();
        self.post_load_generation = self.post_load_generation.wrapping_add(1);
        self.pending_post = Some(Arc::from(locator));
        self.needs_redraw = true;
        self.post_load_generation
    }

    /// Apply a finished post fetch.
    ///
    /// Results for anything other than the latest pending request are dropped.
    pub fn apply_post_loaded(
        &mut self,
        locator: &str,
        generation: u64,
        result: Result<String, ContentError>,
    ) {
        if generation != self.post_load_generation
            || self.pending_post.as_deref() != Some(locator)
        {
            tracing::debug!(
                locator,
                generation,
                current = self.post_load_generation,
                "Discarding stale post load"
            );
            return;
        }
        self.pending_post = None;
        self.post_load_handle = None;

        match result {
            Ok(source) => {
                let title = self
                    .catalog
                    .iter()
                    .find(|meta| &*meta.locator == locator)
                    .map(|meta| Arc::clone(&meta.title))
                    .unwrap_or_else(|| Arc::from(humanize_locator(locator)));
                let rendered = self.render_post(&source);

                self.open_post = Some(OpenPost {
                    locator: Arc::from(locator),
                    title,
                    source,
                    rendered,
                });
                self.view = View::ReadingPost;
                self.scroll_offset = 0;
                tracing::info!(locator, "Opened post");
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(locator, error = %e, "Post not found");
                self.show_not_found(format!("Blog post \"{}\" not found", locator));
            }
            Err(e) => {
                tracing::warn!(locator, error = %e, "Post load failed");
                self.show_not_found(format!("Error loading blog post \"{}\"", locator));
            }
        }
        self.needs_redraw = true;
    }

    fn render_post(&self, source: &str) -> RenderedPost {
        let mut rendered = render_markdown(source, &self.palette);
        rendered.decorate_copy_controls(&self.palette);
        self.highlighter.highlight(&mut rendered, &self.palette);
        rendered
    }

    /// Abandon any in-flight post load.
    pub fn cancel_post_load(&mut self) {
        if let Some(handle) = self.post_load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted post load task");
        }
        self.pending_post = None;
    }

    /// Leave the reader (or not-found page) and return to the grid.
    pub fn close_post(&mut self) {
        self.cancel_post_load();
        if self.view == View::NotFound {
            // A failed path left its own address behind
            let path = self.category_address(self.current_category.as_deref());
            self.platform.navigator.set_path(&path);
        }
        self.open_post = None;
        self.view = View::Listing;
        self.scroll_offset = 0;
        self.needs_redraw = true;
    }

    // ========================================================================
    // Theme and Clipboard
    // ========================================================================

    /// Flip between dark and light and persist the choice.
    ///
    /// A failed write is reported in the status bar; the theme still changes.
    pub fn toggle_theme(&mut self) {
        let next = self.theme_variant.toggled();
        self.theme_variant = next;
        self.palette = next.palette();

        if let Some(post) = self.open_post.take() {
            let rendered = self.render_post(&post.source);
            self.open_post = Some(OpenPost { rendered, ..post });
        }

        match self.platform.preferences.set("theme", next.as_str()) {
            Ok(()) => self.set_status(format!("Theme: {}", next.name())),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save theme preference");
                self.set_status(format!("Theme: {} (not saved: {})", next.name(), e));
            }
        }
        self.needs_redraw = true;
    }

    /// Copy the 1-based `n`th code block of the open post.
    pub fn copy_code_block(&mut self, n: usize) {
        let Some(code) = self
            .open_post
            .as_ref()
            .and_then(|post| post.rendered.code_block_text(n))
            .map(str::to_string)
        else {
            self.set_status(format!("No code block {}", n));
            return;
        };

        match self.platform.clipboard.write_text(&code) {
            Ok(()) => self.set_status_for("Copied!", COPIED_TTL),
            Err(e) => {
                tracing::warn!(error = %e, "Clipboard write failed");
                self.set_status(format!("Copy failed: {}", e));
            }
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate up in the focused list
    pub fn nav_up(&mut self) {
        match self.focus {
            Focus::Menu => self.selected_menu = self.selected_menu.saturating_sub(1),
            Focus::Posts => self.selected_post = self.selected_post.saturating_sub(1),
        }
    }

    /// Navigate down in the focused list
    pub fn nav_down(&mut self) {
        match self.focus {
            Focus::Menu => {
                let max_index = self.menu_items.len().saturating_sub(1);
                self.selected_menu = self.selected_menu.saturating_add(1).min(max_index);
            }
            Focus::Posts => {
                let max_index = self.visible_posts.len().saturating_sub(1);
                self.selected_post = self.selected_post.saturating_add(1).min(max_index);
            }
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Menu => Focus::Posts,
            Focus::Posts => Focus::Menu,
        };
    }

    /// Scroll up in reader view
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Scroll down in reader view
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Clamp scroll offset so the last line can reach the bottom of the viewport.
    pub fn clamp_scroll(&mut self, content_lines: usize, visible_lines: usize) {
        let max_scroll = content_lines.saturating_sub(visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    /// Display lines in the reader after wrapping, including the 2-line header.
    pub fn reader_content_lines(&self) -> usize {
        const HEADER_LINES: usize = 2;
        let width = self.reader_viewport_width.max(1);
        let body = self.open_post.as_ref().map_or(0, |post| {
            post.rendered
                .lines
                .iter()
                .map(|line| wrapped_line_count(line, width))
                .sum()
        });
        HEADER_LINES + body
    }

    /// Clamp scroll offset using the viewport size from the last render.
    pub fn clamp_reader_scroll(&mut self) {
        let content_lines = self.reader_content_lines();
        self.clamp_scroll(content_lines, self.reader_visible_lines);
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.set_status_for(msg, STATUS_TTL);
    }

    fn set_status_for(&mut self, msg: impl Into<Cow<'static, str>>, ttl: Duration) {
        self.status_message = Some(StatusMessage {
            text: msg.into(),
            set_at: Instant::now(),
            ttl,
        });
        self.needs_redraw = true;
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some(status) = &self.status_message {
            if status.set_at.elapsed() >= status.ttl {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

/// How many display lines a single Line occupies after wrapping.
fn wrapped_line_count(line: &Line<'_>, viewport_width: usize) -> usize {
    let width = viewport_width.max(1);
    let line_width: usize = line.spans.iter().map(|s| s.content.width()).sum();
    if line_width == 0 {
        1 // Empty lines still take one line
    } else {
        line_width.div_ceil(width)
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort the in-flight post load on drop so no task outlives the event loop.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.post_load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted post load task on App drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::platform::{MemoryClipboard, MemoryPreferences, PreferenceStore};
    use pretty_assertions::assert_eq;
    use tokio::time;

    fn meta(locator: &str, title: &str, category: &str) -> PostMeta {
        PostMeta {
            locator: Arc::from(locator),
            title: Arc::from(title),
            excerpt: Arc::from("An excerpt long enough to show."),
            category: Arc::from(category),
            image: None,
        }
    }

    fn sample_catalog() -> Vec<PostMeta> {
        vec![
            meta("tools/docker/docker.md", "Docker Basics", "DOCKER"),
            meta("tools/docker/docker-compose.md", "Docker Compose", "DOCKER"),
            meta("big-data/starburst.md", "Starburst", "BIG_DATA"),
            meta("tools/spark/reused-spark-code.md", "Reused Spark Code", "SPARK"),
        ]
    }

    struct Harness {
        app: App,
        clipboard: MemoryClipboard,
        preferences: MemoryPreferences,
    }

    fn harness_with(preferences: MemoryPreferences) -> Harness {
        let clipboard = MemoryClipboard::default();
        let platform = Platform::in_memory(clipboard.clone(), preferences.clone());
        let menu = Config::default().menu_tree().unwrap();
        let mut app = App::new(menu, platform, ThemeVariant::Dark);
        app.apply_catalog(sample_catalog());
        Harness {
            app,
            clipboard,
            preferences,
        }
    }

    fn harness() -> Harness {
        harness_with(MemoryPreferences::new())
    }

    fn visible_locators(app: &App) -> Vec<&str> {
        app.visible_posts.iter().map(|p| &*p.locator).collect()
    }

    // Routing

    #[test]
    fn test_route_root_lists_everything() {
        let mut h = harness();
        h.app.route_initial("/");
        assert_eq!(h.app.view, View::Listing);
        assert_eq!(h.app.current_category, None);
        assert_eq!(h.app.visible_posts.len(), 4);
        assert_eq!(h.app.address(), "/");
    }

    #[test]
    fn test_route_category_path() {
        let mut h = harness();
        h.app.route_initial("/TOOLS/DOCKER");
        assert_eq!(h.app.view, View::Listing);
        assert_eq!(h.app.current_category.as_deref(), Some("DOCKER"));
        assert_eq!(h.app.active_chain, vec!["TOOLS", "DOCKER"]);
        assert_eq!(
            visible_locators(&h.app),
            vec!["tools/docker/docker.md", "tools/docker/docker-compose.md"]
        );
        assert_eq!(h.app.address(), "/TOOLS/DOCKER");
    }

    #[test]
    fn test_route_unknown_path_is_not_found() {
        let mut h = harness();
        h.app.route_initial("/nonexistent/path");
        assert_eq!(h.app.view, View::NotFound);
        assert_eq!(h.app.not_found_message, "Category \"nonexistent/path\" not found");
        assert_eq!(h.app.address(), "/nonexistent/path");
    }

    #[test]
    fn test_route_initial_does_not_push() {
        let mut h = harness();
        h.app.route_initial("/BIG_DATA");
        h.app.history_back();
        // Nothing to go back to: still on the startup category
        assert_eq!(h.app.current_category.as_deref(), Some("BIG_DATA"));
    }

    #[test]
    fn test_select_category_pushes_and_sets_address() {
        let mut h = harness();
        h.app.route_initial("/");
        h.app.select_category(Some("SPARK"));
        assert_eq!(h.app.address(), "/TOOLS/SPARK");
        assert_eq!(visible_locators(&h.app), vec!["tools/spark/reused-spark-code.md"]);

        h.app.history_back();
        assert_eq!(h.app.current_category, None);
        assert_eq!(h.app.address(), "/");
        assert_eq!(h.app.visible_posts.len(), 4);
    }

    #[test]
    fn test_select_root_literal() {
        let mut h = harness();
        h.app.select_category(Some("DOCKER"));
        h.app.select_category(Some("All"));
        assert_eq!(h.app.current_category, None);
        assert_eq!(h.app.address(), "/");
    }

    #[test]
    fn test_back_and_forward_do_not_push() {
        let mut h = harness();
        h.app.select_category(Some("DOCKER"));
        h.app.select_category(Some("SPARK"));

        h.app.history_back();
        assert_eq!(h.app.current_category.as_deref(), Some("DOCKER"));
        h.app.history_forward();
        assert_eq!(h.app.current_category.as_deref(), Some("SPARK"));

        // Had back/forward pushed entries, there would be more to walk through
        h.app.history_forward();
        assert_eq!(h.app.current_category.as_deref(), Some("SPARK"));
        h.app.history_back();
        h.app.history_back();
        assert_eq!(h.app.current_category, None);
        h.app.history_back();
        assert_eq!(h.app.current_category, None);
    }

    #[test]
    fn test_navigate_to_path_pushes() {
        let mut h = harness();
        h.app.navigate_to_path("JAVA/SPRING");
        assert_eq!(h.app.current_category.as_deref(), Some("SPRING"));
        assert!(h.app.visible_posts.is_empty());
        h.app.history_back();
        assert_eq!(h.app.current_category, None);
    }

    #[test]
    fn test_navigate_to_unknown_path_pushes_entry() {
        let mut h = harness();
        h.app.select_category(Some("DOCKER"));
        h.app.navigate_to_path("/nope");
        assert_eq!(h.app.view, View::NotFound);
        assert_eq!(h.app.address(), "/nope");

        h.app.history_back();
        assert_eq!(h.app.view, View::Listing);
        assert_eq!(h.app.current_category.as_deref(), Some("DOCKER"));
        assert_eq!(h.app.address(), "/TOOLS/DOCKER");

        h.app.history_forward();
        assert_eq!(h.app.view, View::NotFound);
        assert_eq!(h.app.address(), "/nope");
        assert_eq!(h.app.not_found_message, "Category \"nope\" not found");
    }

    #[test]
    fn test_leaving_not_found_restores_category_address() {
        let mut h = harness();
        h.app.select_category(Some("DOCKER"));
        h.app.navigate_to_path("/nope");
        h.app.close_post();
        assert_eq!(h.app.view, View::Listing);
        assert_eq!(h.app.current_category.as_deref(), Some("DOCKER"));
        assert_eq!(h.app.address(), "/TOOLS/DOCKER");
    }

    // Search

    #[test]
    fn test_search_within_category() {
        let mut h = harness();
        h.app.select_category(Some("DOCKER"));
        h.app.set_search_query("COMPOSE");
        assert_eq!(visible_locators(&h.app), vec!["tools/docker/docker-compose.md"]);

        h.app.select_category(None);
        assert_eq!(visible_locators(&h.app), vec!["tools/docker/docker-compose.md"]);
        h.app.set_search_query("  ");
        assert_eq!(h.app.visible_posts.len(), 4);
    }

    #[test]
    fn test_search_leaves_not_found() {
        let mut h = harness();
        h.app.route_initial("/missing");
        h.app.set_search_query("spark");
        assert_eq!(h.app.view, View::Listing);
    }

    #[test]
    fn test_catalog_arrives_after_routing() {
        let platform = Platform::in_memory(MemoryClipboard::default(), MemoryPreferences::new());
        let mut app = App::new(Config::default().menu_tree().unwrap(), platform, ThemeVariant::Dark);
        app.route_initial("/TOOLS/DOCKER");
        assert!(app.visible_posts.is_empty());

        app.apply_catalog(sample_catalog());
        assert!(app.catalog_loaded);
        assert_eq!(app.visible_posts.len(), 2);
    }

    // Post loading

    #[test]
    fn test_open_post_success() {
        let mut h = harness();
        let generation = h.app.open_post("tools/docker/docker.md");
        assert_eq!(h.app.view, View::Listing);

        h.app.apply_post_loaded(
            "tools/docker/docker.md",
            generation,
            Ok("# Docker\n\n```bash\ndocker ps\n```\n".to_string()),
        );
        assert_eq!(h.app.view, View::ReadingPost);
        let post = h.app.open_post.as_ref().unwrap();
        assert_eq!(&*post.title, "Docker Basics");
        assert_eq!(post.rendered.code_blocks.len(), 1);
        assert!(post.rendered.code_blocks[0].control_line.is_some());
        assert!(h.app.pending_post.is_none());
    }

    #[test]
    fn test_open_post_http_error_is_not_found() {
        let mut h = harness();
        let generation = h.app.open_post("missing.md");
        h.app
            .apply_post_loaded("missing.md", generation, Err(ContentError::HttpStatus(404)));
        assert_eq!(h.app.view, View::NotFound);
        assert_eq!(h.app.not_found_message, "Blog post \"missing.md\" not found");
    }

    #[test]
    fn test_open_post_network_error_message() {
        let mut h = harness();
        let generation = h.app.open_post("slow.md");
        h.app
            .apply_post_loaded("slow.md", generation, Err(ContentError::Timeout(20)));
        assert_eq!(h.app.view, View::NotFound);
        assert_eq!(h.app.not_found_message, "Error loading blog post \"slow.md\"");
    }

    #[test]
    fn test_stale_post_result_discarded() {
        let mut h = harness();
        let first = h.app.open_post("a.md");
        let second = h.app.open_post("b.md");

        h.app.apply_post_loaded("a.md", first, Ok("# A".to_string()));
        assert_eq!(h.app.view, View::Listing);
        assert_eq!(h.app.pending_post.as_deref(), Some("b.md"));

        h.app.apply_post_loaded("b.md", second, Ok("# B".to_string()));
        assert_eq!(h.app.view, View::ReadingPost);
        assert_eq!(&*h.app.open_post.as_ref().unwrap().locator, "b.md");
    }

    #[test]
    fn test_result_after_navigating_away_discarded() {
        let mut h = harness();
        let generation = h.app.open_post("a.md");
        h.app.select_category(Some("SPARK"));
        h.app.apply_post_loaded("a.md", generation, Ok("# A".to_string()));
        assert_eq!(h.app.view, View::Listing);
        assert!(h.app.open_post.is_none());
    }

    #[test]
    fn test_close_post_returns_to_listing() {
        let mut h = harness();
        let generation = h.app.open_post("a.md");
        h.app.apply_post_loaded("a.md", generation, Ok("# A".to_string()));
        h.app.close_post();
        assert_eq!(h.app.view, View::Listing);
        assert!(h.app.open_post.is_none());
    }

    #[test]
    fn test_unknown_locator_title_is_humanized() {
        let mut h = harness();
        let generation = h.app.open_post("notes/new-post.md");
        h.app
            .apply_post_loaded("notes/new-post.md", generation, Ok("text".to_string()));
        assert_eq!(&*h.app.open_post.as_ref().unwrap().title, "new post");
    }

    // Theme

    #[test]
    fn test_saved_theme_wins_over_default() {
        let preferences = MemoryPreferences::new();
        preferences.clone().set("theme", "light").unwrap();
        let h = harness_with(preferences);
        assert_eq!(h.app.theme_variant, ThemeVariant::Light);
    }

    #[test]
    fn test_toggle_theme_persists() {
        let mut h = harness();
        h.app.toggle_theme();
        assert_eq!(h.app.theme_variant, ThemeVariant::Light);
        assert_eq!(h.app.palette, ThemeVariant::Light.palette());
        assert_eq!(h.preferences.get("theme").as_deref(), Some("light"));

        h.app.toggle_theme();
        assert_eq!(h.preferences.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_toggle_theme_write_failure_is_status() {
        let mut h = harness_with(MemoryPreferences::read_only());
        h.app.toggle_theme();
        assert_eq!(h.app.theme_variant, ThemeVariant::Light);
        let status = h.app.status_message.as_ref().unwrap();
        assert!(status.text.contains("not saved"));
    }

    #[test]
    fn test_toggle_theme_rerenders_open_post() {
        let mut h = harness();
        let generation = h.app.open_post("a.md");
        h.app.apply_post_loaded("a.md", generation, Ok("# Title".to_string()));
        let dark_style = h.app.open_post.as_ref().unwrap().rendered.lines[0].spans[0].style;

        h.app.toggle_theme();
        let light_style = h.app.open_post.as_ref().unwrap().rendered.lines[0].spans[0].style;
        assert_ne!(dark_style, light_style);
        assert_eq!(light_style, ThemeVariant::Light.palette().reader_heading);
    }

    // Clipboard and status

    #[tokio::test]
    async fn test_copy_code_block_sets_copied_then_expires() {
        let mut h = harness();
        let generation = h.app.open_post("a.md");
        h.app.apply_post_loaded(
            "a.md",
            generation,
            Ok("```\nfirst\n```\n\n```sh\nsecond block\n```\n".to_string()),
        );

        time::pause();
        h.app.copy_code_block(2);
        assert_eq!(h.clipboard.contents().as_deref(), Some("second block"));
        assert_eq!(h.app.status_message.as_ref().unwrap().text, "Copied!");

        time::advance(Duration::from_millis(1999)).await;
        assert!(!h.app.clear_expired_status());
        time::advance(Duration::from_millis(1)).await;
        assert!(h.app.clear_expired_status());
        assert!(h.app.status_message.is_none());
    }

    #[test]
    fn test_copy_missing_block() {
        let mut h = harness();
        h.app.copy_code_block(1);
        assert!(h.clipboard.contents().is_none());
        assert!(h.app.status_message.as_ref().unwrap().text.contains("No code block"));
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut h = harness();
        time::pause();
        h.app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        h.app.clear_expired_status();
        assert!(h.app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        h.app.clear_expired_status();
        assert!(h.app.status_message.is_none());
    }

    // Navigation

    #[test]
    fn test_nav_bounds() {
        let mut h = harness();
        h.app.nav_up();
        assert_eq!(h.app.selected_post, 0);
        for _ in 0..10 {
            h.app.nav_down();
        }
        assert_eq!(h.app.selected_post, 3);

        h.app.toggle_focus();
        for _ in 0..50 {
            h.app.nav_down();
        }
        assert_eq!(h.app.selected_menu, h.app.menu_items.len() - 1);
    }

    #[test]
    fn test_selection_clamped_when_filter_shrinks() {
        let mut h = harness();
        h.app.selected_post = 3;
        h.app.select_category(Some("BIG_DATA"));
        assert_eq!(h.app.selected_post, 0);
        assert_eq!(&*h.app.selected_post().unwrap().locator, "big-data/starburst.md");
    }

    #[test]
    fn test_menu_cursor_follows_category() {
        let mut h = harness();
        h.app.route_initial("/TOOLS/SPLUNK");
        assert_eq!(h.app.selected_menu_item().unwrap().id.as_deref(), Some("SPLUNK"));
    }

    #[test]
    fn test_clamp_scroll() {
        let mut h = harness();
        h.app.scroll_offset = 100;
        h.app.clamp_scroll(50, 20);
        assert_eq!(h.app.scroll_offset, 30);
        h.app.clamp_scroll(10, 20);
        assert_eq!(h.app.scroll_offset, 0);
    }
}
