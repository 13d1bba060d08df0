//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/gittui/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/gittui/` (~/.config/gittui/)
//! - State/Logs: `$XDG_STATE_HOME/gittui/` (~/.local/state/gittui/)
//!
//! Fetched data is never written to disk, so there is no data directory.

use crate::analytics::{PushGranularity, TimeWindow};
use crate::error::{Error, Result};
use crate::theme::DEFAULT_THEME;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variables consulted for an API token, in priority order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Environment variable that overrides the configured theme.
pub const THEME_ENV_VAR: &str = "GITTUI_THEME";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// GitHub API access
    #[serde(default)]
    pub github: GitHubConfig,

    /// Dashboard display preferences
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub API configuration
#[derive(Debug, Deserialize, Clone)]
pub struct GitHubConfig {
    /// User shown when no username is given on the command line.
    /// Falls back to the authenticated user.
    pub username: Option<String>,

    /// Personal access token (can also use GITHUB_TOKEN / GH_TOKEN)
    pub token: Option<String>,

    /// REST API base URL. GraphQL is served from `{api_url}/graphql`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of recent events to request for the activity feed
    #[serde(default = "default_event_limit")]
    pub event_limit: u32,

    /// Max retry attempts for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            username: None,
            token: None,
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            event_limit: default_event_limit(),
            max_retries: default_max_retries(),
        }
    }
}

impl GitHubConfig {
    /// Resolve the API token: explicit config first, then the environment.
    pub fn resolve_token(&self) -> Option<String> {
        self.resolve_token_with(|key| std::env::var(key).ok())
    }

    /// Same as [`resolve_token`](Self::resolve_token) with an injectable
    /// environment lookup.
    pub fn resolve_token_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = self.token.as_deref().map(str::trim) {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
        TOKEN_ENV_VARS
            .iter()
            .filter_map(|key| lookup(key))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }

    /// GraphQL endpoint derived from the REST base URL.
    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.api_url.trim_end_matches('/'))
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "github.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.api_url.trim().is_empty() {
            return Err(Error::Config("github.api_url must not be empty".to_string()));
        }
        if matches!(self.username.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(Error::Config(
                "github.username must not be empty when set".to_string(),
            ));
        }
        if matches!(self.token.as_deref(), Some(token) if token.trim().is_empty()) {
            return Err(Error::Config(
                "github.token must not be empty when set".to_string(),
            ));
        }
        if self.event_limit == 0 || self.event_limit > 100 {
            return Err(Error::Config(
                "github.event_limit must be between 1 and 100".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_event_limit() -> u32 {
    30
}

fn default_max_retries() -> usize {
    2
}

/// Dashboard display configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    /// Initial theme name
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Initial push-rate granularity
    #[serde(default)]
    pub push_granularity: PushGranularity,

    /// Initial lookback window for the peak-hour stat
    #[serde(default)]
    pub time_window: TimeWindow,

    /// Seconds between automatic refreshes (0 = manual refresh only)
    #[serde(default)]
    pub refresh_secs: u64,

    /// Start in public-only mode when viewing your own profile
    #[serde(default)]
    pub public_only: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            push_granularity: PushGranularity::default(),
            time_window: TimeWindow::default(),
            refresh_secs: 0,
            public_only: false,
        }
    }
}

impl DisplayConfig {
    /// Theme to start with. `GITTUI_THEME` wins over the config file.
    pub fn theme_name(&self) -> String {
        std::env::var(THEME_ENV_VAR)
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.theme.clone())
    }
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.github.validate()?;
        if self.logging.max_files == 0 {
            return Err(Error::Config(
                "logging.max_files must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/gittui/config.toml` (~/.config/gittui/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("gittui").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/gittui/` (~/.local/state/gittui/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("gittui")
    }

    /// Returns today's log file path
    ///
    /// `$XDG_STATE_HOME/gittui/gittui.YYYY-MM-DD.log`, rotated daily on UTC dates.
    pub fn log_path() -> PathBuf {
        let day = chrono::Utc::now().format("%Y-%m-%d");
        Self::state_dir().join(format!("gittui.{}.log", day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.username.is_none());
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.timeout_secs, 10);
        assert_eq!(config.display.theme, "github-dark");
        assert_eq!(config.display.push_granularity, PushGranularity::Day);
        assert_eq!(config.display.time_window, TimeWindow::ThisWeek);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[github]
username = "octocat"
timeout_secs = 5

[display]
theme = "nord"
push_granularity = "week"
time_window = "this_month"
refresh_secs = 300

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.github.username.as_deref(), Some("octocat"));
        assert_eq!(config.github.timeout_secs, 5);
        assert_eq!(config.github.event_limit, 30);
        assert_eq!(config.display.theme, "nord");
        assert_eq!(config.display.push_granularity, PushGranularity::Week);
        assert_eq!(config.display.time_window, TimeWindow::ThisMonth);
        assert_eq!(config.display.refresh_secs, 300);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = GitHubConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_blank_username() {
        let config = GitHubConfig {
            username: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_token_prefers_config() {
        let config = GitHubConfig {
            token: Some("from-config".to_string()),
            ..Default::default()
        };
        let token = config.resolve_token_with(|_| Some("from-env".to_string()));
        assert_eq!(token.as_deref(), Some("from-config"));
    }

    #[test]
    fn test_resolve_token_env_order() {
        let config = GitHubConfig::default();
        let token = config.resolve_token_with(|key| match key {
            "GITHUB_TOKEN" => Some("  ".to_string()),
            "GH_TOKEN" => Some("gh-token".to_string()),
            _ => None,
        });
        assert_eq!(token.as_deref(), Some("gh-token"));

        assert!(config.resolve_token_with(|_| None).is_none());
    }

    #[test]
    fn test_graphql_url() {
        let config = GitHubConfig {
            api_url: "https://ghe.example.com/api/v3/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.graphql_url(), "https://ghe.example.com/api/v3/graphql");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\ntheme = \"dracula\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.display.theme, "dracula");
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[github]\ntimeout_secs = \"soon\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }
}
