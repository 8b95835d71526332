//! Configuration file parser for ~/.config/folio/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`,
//! which describes the sample blog (menu and post list). Unknown keys are
//! accepted by serde, though we log a warning when the file contains
//! potential typos.
use crate::catalog::PostEntry;
use crate::menu::{MenuError, MenuNode, MenuTree, ROOT_ID};
use crate::theme::ThemeVariant;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid menu in config file: {0}")]
    Menu(#[from] MenuError),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// `menu` and `posts` are replaced wholesale when present.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Blog host; posts are fetched from `{base_url}/posts/{locator}`.
    pub base_url: String,

    /// Default theme ("dark" or "light"). A saved preference wins over this.
    pub theme: String,

    /// Per-request fetch timeout in seconds.
    pub fetch_timeout_secs: u64,

    /// Category tree. Exactly one node has no id (the "All" root).
    pub menu: Vec<MenuNode>,

    /// Posts shown in the catalog, in display order.
    pub posts: Vec<PostEntry>,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            theme: "dark".to_string(),
            fetch_timeout_secs: 20,
            menu: default_menu(),
            posts: default_posts(),
            keybindings: HashMap::new(),
        }
    }
}

fn default_menu() -> Vec<MenuNode> {
    vec![
        MenuNode::root(ROOT_ID),
        MenuNode::new("JAVA", "Java").with_children(vec![
            MenuNode::new("CORE_JAVA", "Core Java"),
            MenuNode::new("SPRING", "Spring")
                .with_children(vec![MenuNode::new("SPRING_BOOT", "Spring Boot")]),
        ]),
        MenuNode::new("TOOLS", "Tools").with_children(vec![
            MenuNode::new("DOCKER", "Docker"),
            MenuNode::new("SPLUNK", "Splunk"),
            MenuNode::new("SPARK", "Spark"),
        ]),
        MenuNode::new("BIG_DATA", "Big Data"),
    ]
}

fn default_posts() -> Vec<PostEntry> {
    [
        ("DOCKER", "tools/docker/docker.md"),
        ("DOCKER", "tools/docker/docker-compose.md"),
        ("DOCKER", "tools/docker/docker-swarm.md"),
        ("BIG_DATA", "big-data/starburst.md"),
        ("SPLUNK", "tools/splunk/push-logs-in-splunk.md"),
        ("SPLUNK", "tools/splunk/read-splunk-data-using-query.md"),
        ("SPARK", "tools/spark/reused-spark-code.md"),
    ]
    .into_iter()
    .map(|(category, locator)| PostEntry::new(category, locator))
    .collect()
}

/// Treat a node written with the literal root id as the root.
fn normalize_root_ids(nodes: &mut [MenuNode]) {
    for node in nodes {
        if node.id.as_deref() == Some(ROOT_ID) {
            node.id = None;
        }
        normalize_root_ids(&mut node.children);
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "base_url",
        "theme",
        "fetch_timeout_secs",
        "menu",
        "posts",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid loading a huge file
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
            .inspect(|config| {
                tracing::info!(
                    path = %path.display(),
                    base_url = %config.base_url,
                    posts = config.posts.len(),
                    "Loaded configuration"
                );
            })
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse as a raw table first to detect unknown keys
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let mut config: Config = toml::from_str(content)?;
        normalize_root_ids(&mut config.menu);
        Ok(config)
    }

    /// The validated category tree.
    pub fn menu_tree(&self) -> Result<MenuTree, ConfigError> {
        Ok(MenuTree::new(self.menu.clone())?)
    }

    /// Configured theme, falling back to Dark for unrecognized names.
    pub fn theme_variant(&self) -> ThemeVariant {
        ThemeVariant::from_str_name(&self.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %self.theme, "Unknown theme in config, using dark");
            ThemeVariant::Dark
        })
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

// ============================================================================
// Tests
// ============================================================================
