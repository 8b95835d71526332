use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use folio::app::{App, AppEvent};
use folio::config::Config;
use folio::content::PostFetcher;
use folio::platform::Platform;
use folio::theme::ThemeVariant;
use folio::ui;

/// Get the config directory path (~/.config/folio/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("folio"))
}

#[derive(Parser, Debug)]
#[command(name = "folio", about = "Terminal reader for markdown blogs")]
struct Args {
    /// Path to open, e.g. /tools/docker
    #[arg(value_name = "PATH")]
    path: Option<String>,

    /// Blog host to read from (overrides base_url in the config file)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Config file (default: ~/.config/folio/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Theme to start with when no preference is saved: dark or light
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,
}

/// Send logs to `folio.log` in the config directory.
///
/// Only active when RUST_LOG is set; the terminal belongs to the TUI.
fn init_tracing(config_dir: &std::path::Path) -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let log_path = config_dir.join("folio.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file '{}'", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    // User-only access to the config directory
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = std::fs::metadata(&config_dir) {
            let mut perms = metadata.permissions();
            perms.set_mode(0o700);
            if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                eprintln!("Warning: failed to restrict {}: {}", config_dir.display(), e);
            }
        }
    }

    init_tracing(&config_dir)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;

    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    let default_theme = match args.theme.as_deref() {
        Some(name) => ThemeVariant::from_str_name(name)
            .with_context(|| format!("Unknown theme '{}': expected dark or light", name))?,
        None => config.theme_variant(),
    };

    let menu = config.menu_tree().context("Invalid menu in config file")?;
    let fetcher = PostFetcher::new(&config.base_url, config.fetch_timeout())
        .with_context(|| format!("Invalid base URL '{}'", config.base_url))?;
    tracing::info!(
        base_url = %fetcher.base_url(),
        posts = config.posts.len(),
        "Starting folio"
    );

    let platform = Platform::terminal(&config_dir.join("preferences.json"));
    let mut app = App::new(menu, platform, default_theme);

    for warning in app.keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
        eprintln!("Warning: {}", warning);
    }

    app.route_initial(args.path.as_deref().unwrap_or("/"));

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    let catalog_task = ui::spawn_catalog_load(fetcher.clone(), config.posts.clone(), event_tx.clone());

    let result = ui::run(&mut app, fetcher, event_tx, event_rx).await;
    catalog_task.abort();
    result
}
