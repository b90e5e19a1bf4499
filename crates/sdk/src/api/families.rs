//! Families API endpoints.

use crate::client::HavenClient;
use crate::error::HavenResult;
use haven_core::types::{Family, FamilyId};
use serde::{Deserialize, Serialize};

/// Families API for managing family accounts.
pub struct FamiliesApi<'a> {
    client: &'a HavenClient,
}

impl<'a> FamiliesApi<'a> {
    pub(crate) fn new(client: &'a HavenClient) -> Self {
        Self { client }
    }

    /// List the families visible to this API key.
    pub async fn list(&self) -> HavenResult<Vec<Family>> {
        self.client.http.get("/families").await
    }

    /// Get a specific family by ID.
    pub async fn get(&self, family_id: &FamilyId) -> HavenResult<Family> {
        self.client.http.get(&format!("/families/{}", family_id)).await
    }

    /// Create a family.
    pub async fn create(&self, request: &CreateFamilyRequest) -> HavenResult<Family> {
        self.client.http.post("/families", request).await
    }

    /// Update a family's name or timezone.
    pub async fn update(
        &self,
        family_id: &FamilyId,
        request: &UpdateFamilyRequest,
    ) -> HavenResult<Family> {
        self.client
            .http
            .put(&format!("/families/{}", family_id), request)
            .await
    }

    /// Delete a family and everything under it.
    pub async fn delete(&self, family_id: &FamilyId) -> HavenResult<()> {
        self.client
            .http
            .delete_no_response(&format!("/families/{}", family_id))
            .await
    }
}

/// Request to create a family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFamilyRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl CreateFamilyRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timezone: None,
        }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

/// Request to update a family. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFamilyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}
