//! # Configuration
//!
//! Server settings are read from a YAML file (path in `BUDGETWISE_CONFIG`,
//! default `budgetwise.yaml`). Every field has a default, so a missing file
//! still yields a runnable development configuration. Provider secrets can be
//! supplied through the environment instead of the file.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CONFIG_PATH_ENV: &str = "BUDGETWISE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "budgetwise.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub llm: LlmConfig,
    pub recaptcha: RecaptchaConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Origin of the browser UI allowed by CORS
    pub cors_origin: String,
    /// Built UI served for every non-API path
    pub static_dir: Option<PathBuf>,
    /// Lifetime of a sign-in session
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            cors_origin: "http://localhost:8080".to_string(),
            static_dir: None,
            session_ttl_secs: 12 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:budgetwise.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub api_key: String,
    pub base_url: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Which reCAPTCHA flavour guards sign-in and sign-up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum RecaptchaConfig {
    #[default]
    Disabled,
    /// reCAPTCHA Enterprise assessment API
    Enterprise {
        project_id: String,
        site_key: String,
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        min_score: Option<f64>,
    },
    /// Classic `siteverify` endpoint
    Classic {
        #[serde(default)]
        secret_key: String,
        #[serde(default)]
        min_score: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    /// The file was absent and defaults were used
    Defaults(PathBuf),
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Configuration loaded from {:?}", path),
            ConfigSource::Defaults(path) => warn!("Config file {:?} not found, using defaults", path),
        }
    }
}

impl AppConfig {
    /// Read and parse a YAML config file
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
        Ok(config)
    }

    /// Like [`AppConfig::load`], but a missing file means defaults
    pub fn load_or_default(config_path: &Path) -> Result<(Self, ConfigSource)> {
        if !config_path.exists() {
            return Ok((Self::default(), ConfigSource::Defaults(config_path.to_path_buf())));
        }
        let config = Self::load(config_path)?;
        Ok((config, ConfigSource::File(config_path.to_path_buf())))
    }

    /// Resolve the config path from the environment, load it, apply secret
    /// overrides and validate the result.
    ///
    /// Runs before logging is set up, so nothing is logged here; call
    /// [`ConfigSource::log`] once the subscriber is installed.
    pub fn from_env() -> Result<(Self, ConfigSource)> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let (mut config, source) = Self::load_or_default(Path::new(&path))?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok((config, source))
    }

    /// Overlay secrets from the environment. `lookup` is injectable for tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("BUDGETWISE_IDENTITY_API_KEY") {
            self.identity.api_key = key;
        }
        if let Some(key) = lookup("BUDGETWISE_LLM_API_KEY") {
            self.llm.api_key = key;
        }
        match &mut self.recaptcha {
            RecaptchaConfig::Enterprise { api_key, .. } => {
                if let Some(key) = lookup("BUDGETWISE_RECAPTCHA_API_KEY") {
                    *api_key = key;
                }
            }
            RecaptchaConfig::Classic { secret_key, .. } => {
                if let Some(key) = lookup("BUDGETWISE_RECAPTCHA_SECRET") {
                    *secret_key = key;
                }
            }
            RecaptchaConfig::Disabled => {}
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.server
            .bind_address
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid bind address '{}'", self.server.bind_address))?;
        if self.server.cors_origin.trim().is_empty() {
            return Err(anyhow!("server.cors_origin cannot be empty"));
        }
        if self.server.session_ttl_secs == 0 {
            return Err(anyhow!("server.session_ttl_secs must be greater than zero"));
        }
        if self.llm.timeout_secs == 0 {
            return Err(anyhow!("llm.timeout_secs must be greater than zero"));
        }
        let min_score = match &self.recaptcha {
            RecaptchaConfig::Enterprise { min_score, .. } | RecaptchaConfig::Classic { min_score, .. } => *min_score,
            RecaptchaConfig::Disabled => None,
        };
        if let Some(score) = min_score {
            if !(0.0..=1.0).contains(&score) {
                return Err(anyhow!("recaptcha.min_score must be between 0.0 and 1.0, got {}", score));
            }
        }
        Ok(())
    }
}
