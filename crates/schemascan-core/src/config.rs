//! Configuration management for schemascan.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Environment variable holding the OpenAI API credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Main application configuration.
///
/// This is loaded from `~/.config/schemascan/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Scan behavior settings
    pub scan: ScanConfig,
    /// LLM integration settings
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `OPENAI_API_KEY`: API credential for the analysis backend
    /// - `SCHEMASCAN_PORT`: Override the HTTP listen port
    /// - `SCHEMASCAN_HEADLESS`: Override browser headless mode (true/false)
    /// - `SCHEMASCAN_MODEL`: Override the analysis model name
    /// - `SCHEMASCAN_MAX_VISIBLE_CHARS`: Override the visible-text cap
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides to an already-loaded config.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.llm.api_key = Some(key);
            }
        }

        if let Ok(val) = std::env::var("SCHEMASCAN_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
                tracing::debug!("Override server.port from env: {}", port);
            }
        }

        if let Ok(val) = std::env::var("SCHEMASCAN_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("SCHEMASCAN_MODEL") {
            if !val.is_empty() {
                tracing::debug!("Override llm.model from env: {}", val);
                self.llm.model = val;
            }
        }

        if let Ok(val) = std::env::var("SCHEMASCAN_MAX_VISIBLE_CHARS") {
            if let Ok(cap) = val.parse() {
                self.scan.max_visible_chars = cap;
                tracing::debug!("Override scan.max_visible_chars from env: {}", cap);
            }
        }
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist. The API credential
    /// is never written (it is `#[serde(skip)]`).
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/schemascan/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("io", "schemascan", "schemascan").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Hard navigation timeout in seconds
    pub navigation_timeout_secs: u64,
    /// Best-effort post-navigation quiescence wait in seconds (non-fatal)
    pub quiescence_timeout_secs: u64,
    /// Best-effort wait for a JSON-LD script tag to attach, in seconds (non-fatal)
    pub schema_wait_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            navigation_timeout_secs: 30,
            quiescence_timeout_secs: 5,
            schema_wait_timeout_secs: 3,
        }
    }
}

/// Scan behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum visible-text characters forwarded to the analysis backend
    pub max_visible_chars: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_visible_chars: 10_000,
        }
    }
}

/// LLM integration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier for the analysis backend
    pub model: String,
    /// Sampling temperature (kept low for reproducible judgments)
    pub temperature: f32,
    /// Maximum tokens for completions
    pub max_tokens: u32,
    /// API credential (env-only, never persisted to disk)
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.2,
            max_tokens: 1024,
            api_key: None,
        }
    }
}

impl LlmConfig {
    /// Get the API credential, or fail with a config error naming the
    /// environment variable to set.
    ///
    /// Absence of the credential is a startup error, not a per-request one.
    pub fn require_api_key(&self) -> ConfigResult<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingCredential {
                env_var: API_KEY_ENV.to_string(),
            })
    }
}
