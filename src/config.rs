use crate::constants::{API_BASE_ENV, DEFAULT_API_BASE, DEFAULT_CONFIG_FILE};
use crate::error::{ContextError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub sites: SiteConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_seconds: 10,
        }
    }
}

impl ApiConfig {
    /// `<base_url>/match`, tolerating a trailing slash on the base.
    pub fn match_url(&self) -> Result<String> {
        let base = self.base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(ContextError::Config("API base URL is empty".to_string()));
        }
        Ok(format!("{}/match", base))
    }
}

/// Per-host switches. Hosts are compared exactly, case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub disabled_hosts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the daily JSON log file; console only when unset.
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Load `path`, or `ticket_context.toml` from the working directory when
    /// no path is given. A missing default file yields the defaults; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !config_path.exists() {
            debug!("Config: no {} found, using defaults", DEFAULT_CONFIG_FILE);
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ContextError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply `TICKET_CONTEXT_API_BASE` when it is set and non-blank.
    pub fn with_env_overrides(self) -> Self {
        let base = std::env::var(API_BASE_ENV).ok();
        self.with_api_base_override(base)
    }

    pub fn with_api_base_override(mut self, base_url: Option<String>) -> Self {
        if let Some(base) = base_url.filter(|b| !b.trim().is_empty()) {
            self.api.base_url = base.trim().to_string();
        }
        self
    }

    pub fn is_host_enabled(&self, host: &str) -> bool {
        let host = host.trim();
        !self
            .sites
            .disabled_hosts
            .iter()
            .any(|disabled| disabled.trim().eq_ignore_ascii_case(host))
    }

    pub fn match_url(&self) -> Result<String> {
        self.api.match_url()
    }
}
