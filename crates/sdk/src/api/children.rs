//! Children API endpoints, including per-child policy.

use crate::client::HavenClient;
use crate::error::HavenResult;
use chrono::NaiveDate;
use haven_core::types::{Child, ChildId, ChildPolicy, FamilyId};
use serde::{Deserialize, Serialize};

/// Children API for managing child profiles and their policies.
pub struct ChildrenApi<'a> {
    client: &'a HavenClient,
}

impl<'a> ChildrenApi<'a> {
    pub(crate) fn new(client: &'a HavenClient) -> Self {
        Self { client }
    }

    /// List the children in a family.
    pub async fn list(&self, family_id: &FamilyId) -> HavenResult<Vec<Child>> {
        self.client
            .http
            .get(&format!("/families/{}/children", family_id))
            .await
    }

    /// Add a child to a family.
    pub async fn create(
        &self,
        family_id: &FamilyId,
        request: &CreateChildRequest,
    ) -> HavenResult<Child> {
        self.client
            .http
            .post(&format!("/families/{}/children", family_id), request)
            .await
    }

    /// Get a child profile by ID.
    pub async fn get(&self, child_id: &ChildId) -> HavenResult<Child> {
        self.client.http.get(&format!("/children/{}", child_id)).await
    }

    /// Update a child's name or birth date.
    pub async fn update(
        &self,
        child_id: &ChildId,
        request: &UpdateChildRequest,
    ) -> HavenResult<Child> {
        self.client
            .http
            .put(&format!("/children/{}", child_id), request)
            .await
    }

    /// Remove a child profile.
    pub async fn delete(&self, child_id: &ChildId) -> HavenResult<()> {
        self.client
            .http
            .delete_no_response(&format!("/children/{}", child_id))
            .await
    }

    /// Get the screen-time and content policy for a child.
    pub async fn policy(&self, child_id: &ChildId) -> HavenResult<ChildPolicy> {
        self.client
            .http
            .get(&format!("/children/{}/policy", child_id))
            .await
    }

    /// Replace the policy for a child.
    pub async fn update_policy(&self, policy: &ChildPolicy) -> HavenResult<ChildPolicy> {
        self.client
            .http
            .put(&format!("/children/{}/policy", policy.child_id), policy)
            .await
    }
}

/// Request to add a child.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChildRequest {
    pub name: String,
    pub birth_date: NaiveDate,
}

/// Request to update a child. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateChildRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}
