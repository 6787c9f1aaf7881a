//! Configuration types for Lojistas components.
//!
//! Hardcoded defaults live in the `Default` impls. The search client can
//! override the presentation and freshness knobs through an optional TOML
//! settings file (see [`load_client_settings`]).

use crate::error::AppError;
use chrono::Duration as ChronoDuration;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Platform name the gateway can refresh live.
pub const LIVE_FETCH_PLATFORM: &str = "Google Shopping";

/// Database connection pool configuration.
pub struct DbConfig {
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self { max_connections: 5 }
    }
}

/// HTTP client configuration for outbound calls.
///
/// No retry settings: every outbound call is made exactly once.
pub struct HttpConfig {
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Fixed regional parameters for the shopping-search provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub engine: &'static str,
    pub location: &'static str,
    pub google_domain: &'static str,
    pub gl: &'static str,
    pub hl: &'static str,
    /// Listings requested per search.
    pub num: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            engine: "google_shopping",
            location: "Brazil",
            google_domain: "google.com.br",
            gl: "br",
            hl: "pt-br",
            num: 100,
        }
    }
}

/// Client-side search and presentation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Rows older than this trigger a refresh from the gateway.
    pub staleness_window: ChronoDuration,
    /// Cards per page.
    pub page_size: usize,
    /// The only platform filter compatible with a live refresh.
    pub live_platform: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            staleness_window: ChronoDuration::hours(24),
            page_size: 6,
            live_platform: LIVE_FETCH_PLATFORM.to_string(),
        }
    }
}

/// On-disk form of [`SearchConfig`]. Every key is optional.
///
/// ```toml
/// page_size = 9
/// staleness_hours = 12
/// live_platform = "Google Shopping"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSettings {
    pub page_size: Option<usize>,
    pub staleness_hours: Option<i64>,
    pub live_platform: Option<String>,
}

impl ClientSettings {
    /// Applies the settings over the defaults.
    pub fn into_search_config(self) -> SearchConfig {
        let defaults = SearchConfig::default();
        SearchConfig {
            staleness_window: self
                .staleness_hours
                .filter(|h| *h > 0)
                .map(ChronoDuration::hours)
                .unwrap_or(defaults.staleness_window),
            page_size: self
                .page_size
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
            live_platform: self.live_platform.unwrap_or(defaults.live_platform),
        }
    }
}

/// Default settings file location: `~/.config/lojistas/config.toml`.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lojistas").join("config.toml"))
}

/// Loads client settings.
///
/// An explicit `path` must exist. When `path` is `None` the default location
/// is tried and a missing file yields the defaults.
pub fn load_client_settings(path: Option<&Path>) -> Result<SearchConfig, AppError> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_settings_path() {
            Some(p) => (p, false),
            None => return Ok(SearchConfig::default()),
        },
    };

    if !path.exists() {
        if required {
            return Err(AppError::ConfigError(format!(
                "settings file not found: {}",
                path.display()
            )));
        }
        tracing::debug!("No settings file at {}, using defaults", path.display());
        return Ok(SearchConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| AppError::ConfigError(format!("{}: {}", path.display(), e)))?;
    let settings: ClientSettings = toml::from_str(&content)
        .map_err(|e| AppError::ConfigError(format!("{}: {}", path.display(), e)))?;

    Ok(settings.into_search_config())
}
