//! Main client for the Haven SDK.

use crate::api::*;
use crate::config::{ClientConfig, RetryConfig};
use crate::error::{HavenError, HavenResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Main client for interacting with the Haven API.
#[derive(Debug, Clone)]
pub struct HavenClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl HavenClient {
    /// Create a new client builder.
    pub fn builder() -> HavenClientBuilder {
        HavenClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> HavenResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the health API.
    pub fn health(&self) -> HealthApi<'_> {
        HealthApi::new(self)
    }

    /// Get the families API.
    pub fn families(&self) -> FamiliesApi<'_> {
        FamiliesApi::new(self)
    }

    /// Get the children API.
    pub fn children(&self) -> ChildrenApi<'_> {
        ChildrenApi::new(self)
    }

    /// Get the devices API.
    pub fn devices(&self) -> DevicesApi<'_> {
        DevicesApi::new(self)
    }

    /// Get the platforms API.
    pub fn platforms(&self) -> PlatformsApi<'_> {
        PlatformsApi::new(self)
    }
}

/// Builder for creating a HavenClient.
pub struct HavenClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl HavenClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
        }
    }

    /// Set the base URL of the Haven API, including any version prefix.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Build the client.
    pub fn build(self) -> HavenResult<HavenClient> {
        let base_url_str = self
            .base_url
            .ok_or_else(|| HavenError::Config("base_url is required".to_string()))?;

        let mut config = ClientConfig::new(Url::parse(&base_url_str)?);
        config.api_key = self.api_key;
        config.timeout = self.timeout;
        config.retry_config = self.retry_config;

        HavenClient::from_config(config)
    }
}

impl Default for HavenClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
