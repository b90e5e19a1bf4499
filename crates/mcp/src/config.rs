// Connection and startup configuration for the MCP server

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Connection settings handed to the executor by value
#[derive(Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Prefix every resolved path is appended to, e.g. `https://api.haven.app/v1`
    pub base_url: String,
    /// Bearer credential sent on every request
    pub api_key: String,
}

impl ExecutorConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for ExecutorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .finish()
    }
}

/// Settings read from the optional TOML file, then overridden by CLI/env
#[derive(Clone, Default, Deserialize)]
pub struct McpConfig {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// JSON file with extra tool definitions
    #[serde(default)]
    pub tools_file: Option<PathBuf>,
}

impl McpConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::info!(path = %config_path.display(), "Configuration file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read configuration file {}", config_path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {}", config_path.display()))
    }

    /// Apply CLI/env values on top of the file values
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        api_key: Option<String>,
        tools_file: Option<PathBuf>,
    ) -> Self {
        if base_url.is_some() {
            self.base_url = base_url;
        }
        if api_key.is_some() {
            self.api_key = api_key;
        }
        if tools_file.is_some() {
            self.tools_file = tools_file;
        }
        self
    }

    pub fn tools_file(&self) -> Option<&Path> {
        self.tools_file.as_deref()
    }

    pub fn executor_config(&self) -> Result<ExecutorConfig> {
        let base_url = self
            .base_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .context("No base URL configured; pass --base-url or set HAVEN_BASE_URL")?;
        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .context("No API key configured; pass --api-key or set HAVEN_API_KEY")?;

        Ok(ExecutorConfig::new(base_url, api_key))
    }
}

impl fmt::Debug for McpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McpConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("tools_file", &self.tools_file)
            .finish()
    }
}
