//! Configuration for the TestDino MCP server.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::TestDinoResult;

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local uploader settings.
    #[serde(default)]
    pub uploader: UploaderConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root URL of the TestDino API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// API key read from the environment at startup. Never written to disk.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl ApiConfig {
    /// Request timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: None,
            api_key: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.testdino.com/".to_string()
}

fn default_api_key_env() -> String {
    "TESTDINO_API_KEY".to_string()
}

/// Local uploader settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploaderConfig {
    /// Program to execute.
    #[serde(default = "default_uploader_command")]
    pub command: String,

    /// Arguments placed before the `upload` subcommand.
    #[serde(default = "default_uploader_args")]
    pub args: Vec<String>,

    /// Report directory used when the caller gives none.
    #[serde(default = "default_report_dir")]
    pub default_report_dir: String,

    /// Upload timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl UploaderConfig {
    /// Upload timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Human readable invocation, e.g. `npx tdpw`.
    pub fn invocation(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            command: default_uploader_command(),
            args: default_uploader_args(),
            default_report_dir: default_report_dir(),
            timeout_secs: None,
        }
    }
}

fn default_uploader_command() -> String {
    "npx".to_string()
}

fn default_uploader_args() -> Vec<String> {
    vec!["tdpw".to_string()]
}

fn default_report_dir() -> String {
    "./playwright-report".to_string()
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> TestDinoResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> TestDinoResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            api: ApiConfig::default(),
            uploader: UploaderConfig::default(),
        }
    }

    /// Loads `path` if it exists, then the per-user config file, then defaults.
    pub fn load_or_default(path: &Path) -> Self {
        let candidates = std::iter::once(path.to_path_buf()).chain(Self::user_config_path());

        for candidate in candidates {
            if !candidate.exists() {
                continue;
            }
            match Self::load(&candidate) {
                Ok(config) => return config,
                Err(e) => {
                    eprintln!(
                        "Warning: ignoring invalid config {}: {}",
                        candidate.display(),
                        e
                    );
                }
            }
        }

        Self::default_config()
    }

    /// `<config dir>/testdino/testdino.toml`.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("testdino").join("testdino.toml"))
    }

    /// Reads the API key from the configured environment variable.
    #[must_use]
    pub fn with_environment(mut self) -> Self {
        self.api.api_key = std::env::var(&self.api.api_key_env)
            .ok()
            .filter(|key| !key.is_empty());
        self
    }

    /// Sets the API key directly.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api.api_key = Some(api_key.into());
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// Checks values that serde cannot.
    pub fn validate(&self) -> TestDinoResult<()> {
        url::Url::parse(&self.api.base_url)?;

        if self.uploader.command.trim().is_empty() {
            return Err(crate::TestDinoError::config("uploader.command must not be empty"));
        }
        if self.api.api_key_env.trim().is_empty() {
            return Err(crate::TestDinoError::config("api.api_key_env must not be empty"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
