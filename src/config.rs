use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::status;

/// Main configuration for Leaddesk
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub listing: ListingConfig,
    pub followups: FollowupConfig,
    pub reports: ReportsConfig,
}

/// Configuration for the HTTP server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub bind: String,
    /// HTTP port
    pub port: u16,
    /// Directory holding the prebuilt console assets (index.html, js, css)
    pub static_dir: String,
    /// Mark the session cookie `Secure` (enable behind TLS)
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3000,
            static_dir: "public".into(),
            secure_cookies: false,
        }
    }
}

/// Connection settings for the MySQL lead database
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// MySQL server hostname
    pub host: String,
    /// MySQL server port
    pub port: u16,
    /// MySQL user
    pub user: String,
    /// Password, literal value or "env:VAR_NAME" to read from environment
    pub password: Option<String>,
    /// Database (schema) name
    pub name: String,
    /// Minimum pooled connections
    pub pool_min: usize,
    /// Maximum pooled connections
    pub pool_max: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 3306,
            user: "root".into(),
            password: Some("env:LEADDESK_DB_PASSWORD".into()),
            name: "bmw_demo".into(),
            pool_min: 1,
            pool_max: 10,
        }
    }
}

impl DatabaseConfig {
    /// Resolve the password, supporting "env:VAR_NAME" syntax
    pub fn resolve_password(&self) -> Option<String> {
        self.password.as_deref().and_then(resolve_secret)
    }
}

/// Session token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret, literal value or "env:VAR_NAME"
    pub jwt_secret: String,
    /// Session lifetime in hours (token expiry and cookie max-age)
    pub token_ttl_hours: u32,
    /// Name of the session cookie
    pub cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "env:LEADDESK_JWT_SECRET".into(),
            token_ttl_hours: 24,
            cookie_name: "session_token".into(),
        }
    }
}

impl AuthConfig {
    /// Resolve the signing secret, supporting "env:VAR_NAME" syntax
    pub fn resolve_secret(&self) -> Option<String> {
        resolve_secret(&self.jwt_secret)
    }
}

/// Pagination defaults for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Page size when `limit` is not given
    pub default_limit: u64,
    /// Upper bound for `limit`
    pub max_limit: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// Follow-up list behaviour.
///
/// The today and upcoming lists historically disagree on whether leads in a
/// terminal status are shown; both switches are exposed so the product owner
/// can settle it without a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowupConfig {
    /// Statuses after which a lead needs no further contact
    pub terminal_statuses: Vec<String>,
    /// Length of the upcoming window in days, starting tomorrow
    pub upcoming_window_days: u32,
    /// Maximum rows per lead table in the upcoming list
    pub upcoming_limit: u32,
    /// Drop terminal leads from today's list
    pub today_excludes_terminal: bool,
    /// Drop terminal leads from the upcoming list
    pub upcoming_excludes_terminal: bool,
}

impl Default for FollowupConfig {
    fn default() -> Self {
        Self {
            terminal_statuses: vec![
                status::DEAD_LEAD.into(),
                status::BOOKING_DONE.into(),
                status::NOT_INTERESTED.into(),
            ],
            upcoming_window_days: 7,
            upcoming_limit: 50,
            today_excludes_terminal: false,
            upcoming_excludes_terminal: true,
        }
    }
}

/// Aggregate report sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Number of projects in the project distribution
    pub top_projects: u32,
    /// Number of agents in the dashboard leaderboard
    pub top_agents: u32,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            top_projects: 10,
            top_agents: 5,
        }
    }
}

/// Resolve a secret value: "env:VAR" reads the environment, empty means unset.
pub fn resolve_secret(value: &str) -> Option<String> {
    if let Some(var_name) = value.strip_prefix("env:") {
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the config file if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Default config file location, relative to the working directory
    pub fn default_path() -> PathBuf {
        PathBuf::from("leaddesk.toml")
    }
}
