//! Application configuration for Papertrail.
//!
//! User config lives at `~/.papertrail/papertrail.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PapertrailError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "papertrail.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".papertrail";

/// Desktop browser User-Agent sent with every plain HTTP request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Proceedings listing used when no index URL is configured.
pub const DEFAULT_INDEX_URL: &str = "https://openaccess.thecvf.com/CVPR2024?day=all";

// ---------------------------------------------------------------------------
// Config structs (matching papertrail.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// HTTP and browser fetch policies.
    #[serde(default)]
    pub fetch: FetchPoliciesConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory abstracts are written to.
    #[serde(default = "default_abstracts_dir")]
    pub abstracts_dir: String,

    /// Directory paper documents are written to.
    #[serde(default = "default_papers_dir")]
    pub papers_dir: String,

    /// Proceedings index page.
    #[serde(default = "default_index_url")]
    pub index_url: String,

    /// Maximum number of abstracts saved per run.
    #[serde(default = "default_count")]
    pub count: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            abstracts_dir: default_abstracts_dir(),
            papers_dir: default_papers_dir(),
            index_url: default_index_url(),
            count: default_count(),
        }
    }
}

fn default_abstracts_dir() -> String {
    "CVPR2024_abstracts".into()
}
fn default_papers_dir() -> String {
    "CVPR_papers".into()
}
fn default_index_url() -> String {
    DEFAULT_INDEX_URL.into()
}
fn default_count() -> usize {
    10
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchPoliciesConfig {
    /// User-Agent header for plain HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Pause between catalog entries, in milliseconds.
    #[serde(default = "default_request_delay")]
    pub request_delay_ms: u64,

    /// How long the browser may wait for a page body, in seconds.
    #[serde(default = "default_render_wait")]
    pub render_wait_secs: u64,

    /// Plain HTTP request timeout, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Origin that relative hrefs are joined onto. Defaults to the index URL's origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_origin: Option<String>,

    /// Explicit Chromium executable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chromium_path: Option<String>,
}

impl Default for FetchPoliciesConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_delay_ms: default_request_delay(),
            render_wait_secs: default_render_wait(),
            request_timeout_secs: default_request_timeout(),
            site_origin: None,
            chromium_path: None,
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}
fn default_request_delay() -> u64 {
    1000
}
fn default_render_wait() -> u64 {
    10
}
fn default_request_timeout() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// Fetch config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime fetch configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User-Agent header for plain HTTP requests.
    pub user_agent: String,
    /// Pause between catalog entries.
    pub request_delay: Duration,
    /// Upper bound on waiting for a rendered page body.
    pub render_wait: Duration,
    /// Plain HTTP request timeout.
    pub request_timeout: Duration,
    /// Origin override for resolving relative hrefs.
    pub site_origin: Option<String>,
    /// Explicit Chromium executable.
    pub chromium_path: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.fetch.user_agent.clone(),
            request_delay: Duration::from_millis(config.fetch.request_delay_ms),
            render_wait: Duration::from_secs(config.fetch.render_wait_secs),
            request_timeout: Duration::from_secs(config.fetch.request_timeout_secs),
            site_origin: config.fetch.site_origin.clone(),
            chromium_path: config.fetch.chromium_path.as_ref().map(PathBuf::from),
        }
    }
}

impl FetchConfig {
    /// Resolve the origin that relative hrefs on `index_url` are joined onto.
    pub fn origin_for(&self, index_url: &Url) -> Result<Url> {
        if let Some(origin) = &self.site_origin {
            return Url::parse(origin).map_err(|e| {
                PapertrailError::config(format!("invalid site_origin '{origin}': {e}"))
            });
        }
        origin_url(index_url)
    }
}

/// Extract the origin (scheme + host + port) from a URL, with a trailing slash.
pub fn origin_url(url: &Url) -> Result<Url> {
    let host = url
        .host_str()
        .ok_or_else(|| PapertrailError::validation(format!("URL has no host: {url}")))?;

    let origin = match url.port() {
        Some(port) => format!("{}://{host}:{port}/", url.scheme()),
        None => format!("{}://{host}/", url.scheme()),
    };
    Url::parse(&origin).map_err(|e| PapertrailError::validation(format!("{origin}: {e}")))
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.papertrail/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PapertrailError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.papertrail/papertrail.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PapertrailError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PapertrailError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PapertrailError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| PapertrailError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PapertrailError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
