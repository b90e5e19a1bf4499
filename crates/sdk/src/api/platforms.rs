//! Platforms API endpoints.

use crate::client::HavenClient;
use crate::error::HavenResult;
use haven_core::types::{Platform, PlatformCategory, PlatformId};

/// Platforms API for browsing the catalogue of apps and services.
pub struct PlatformsApi<'a> {
    client: &'a HavenClient,
}

impl<'a> PlatformsApi<'a> {
    pub(crate) fn new(client: &'a HavenClient) -> Self {
        Self { client }
    }

    /// List catalogued platforms.
    pub async fn list(&self) -> HavenResult<Vec<Platform>> {
        self.client.http.get("/platforms").await
    }

    /// List catalogued platforms in one category.
    pub async fn by_category(&self, category: PlatformCategory) -> HavenResult<Vec<Platform>> {
        self.client
            .http
            .get_with_query("/platforms/by-category", &[("category", category.as_str())])
            .await
    }

    /// Get a platform by ID.
    pub async fn get(&self, platform_id: &PlatformId) -> HavenResult<Platform> {
        self.client
            .http
            .get(&format!("/platforms/{}", platform_id))
            .await
    }
}
