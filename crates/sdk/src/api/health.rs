//! Health API endpoints.

use crate::client::HavenClient;
use crate::error::HavenResult;
use serde::{Deserialize, Serialize};

/// Health API for checking server status.
pub struct HealthApi<'a> {
    client: &'a HavenClient,
}

impl<'a> HealthApi<'a> {
    pub(crate) fn new(client: &'a HavenClient) -> Self {
        Self { client }
    }

    /// Check basic health status.
    pub async fn check(&self) -> HavenResult<HealthCheck> {
        self.client.http.get("/health").await
    }
}

/// Basic health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
