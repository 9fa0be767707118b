//! Application configuration structures.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::EndpointCandidates;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend endpoints and HTTP client behavior
    #[serde(default)]
    pub api: ApiConfig,

    /// Static snapshot used when no backend is reachable
    #[serde(default)]
    pub mock: MockConfig,

    /// On-screen debug panel
    #[serde(default)]
    pub debug: DebugConfig,

    /// Periodic feed refresh
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// `/api/*` forwarding server
    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply environment overrides on top of file values.
    pub fn apply_env(mut self) -> Self {
        if let Some(origin) = env_var("SUITER_ORIGIN") {
            self.api.origin = origin;
        }
        if let Some(url) = env_var("BACKEND_API_URL") {
            self.proxy.backend_url = url;
        }
        if let Some(bind) = env_var("PROXY_BIND") {
            self.proxy.bind = bind;
        }
        if let Some(dir) = env_var("STATIC_DIR") {
            self.proxy.static_dir = Some(dir);
        }
        self
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        self.api.candidates()?;
        if self.debug.capacity == 0 {
            return Err(AppError::validation("debug.capacity must be > 0"));
        }
        if self.refresh.interval_secs == 0 {
            return Err(AppError::validation("refresh.interval_secs must be > 0"));
        }
        url::Url::parse(&self.proxy.backend_url)
            .map_err(|e| AppError::validation(format!("proxy.backend_url: {e}")))?;
        if self.proxy.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(AppError::validation(format!(
                "proxy.bind '{}' is not a socket address",
                self.proxy.bind
            )));
        }
        Ok(())
    }
}

/// Backend endpoints and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the same-origin candidate resolves against
    #[serde(default = "defaults::origin")]
    pub origin: String,

    /// Ordered candidates; `same-origin` first, then absolute hosts
    #[serde(default = "defaults::candidates")]
    pub candidates: Vec<String>,

    /// Request timeout in seconds, applied by the transport
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    /// Parse the configured candidates into their fixed order.
    pub fn candidates(&self) -> Result<EndpointCandidates> {
        EndpointCandidates::parse(&self.origin, &self.candidates)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            origin: defaults::origin(),
            candidates: defaults::candidates(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Mock snapshot settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockConfig {
    /// Local directory holding `posts.json` / `rankings.json`.
    /// When unset the snapshot is fetched from `{origin}/mock/`.
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Maximum retained debug entries
    #[serde(default = "defaults::debug_capacity")]
    pub capacity: usize,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::debug_capacity(),
        }
    }
}

/// How the posts and rankings reads are combined per refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStrategy {
    /// Both reads are applied together; an unavailable read lands as empty
    #[default]
    AllOrNothing,
    /// Each read is applied on its own; missing ones are reported
    Independent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "defaults::refresh_interval")]
    pub interval_secs: u64,

    #[serde(default)]
    pub join: JoinStrategy,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::refresh_interval(),
            join: JoinStrategy::default(),
        }
    }
}

/// Forwarding server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    #[serde(default = "defaults::proxy_bind")]
    pub bind: String,

    /// Backend the proxy forwards `/api/*` to
    #[serde(default = "defaults::backend_url")]
    pub backend_url: String,

    /// Directory served for every non-API path
    #[serde(default)]
    pub static_dir: Option<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: defaults::proxy_bind(),
            backend_url: defaults::backend_url(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

mod defaults {
    use crate::models::SAME_ORIGIN;

    // Api defaults
    pub fn origin() -> String {
        "http://127.0.0.1:8080".into()
    }
    pub fn candidates() -> Vec<String> {
        vec![
            SAME_ORIGIN.into(),
            "http://127.0.0.1:3000".into(),
            "http://localhost:3000".into(),
        ]
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; suiter/0.1)".into()
    }

    pub fn debug_capacity() -> usize {
        200
    }
    pub fn refresh_interval() -> u64 {
        5
    }

    // Proxy defaults
    pub fn proxy_bind() -> String {
        "127.0.0.1:8080".into()
    }
    pub fn backend_url() -> String {
        "http://localhost:3000".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}
