//! Devices API endpoints.

use crate::client::HavenClient;
use crate::error::HavenResult;
use haven_core::types::{ChildId, Device, DeviceId, DevicePlatform};
use serde::{Deserialize, Serialize};

/// Devices API for enrolling and controlling a child's devices.
pub struct DevicesApi<'a> {
    client: &'a HavenClient,
}

impl<'a> DevicesApi<'a> {
    pub(crate) fn new(client: &'a HavenClient) -> Self {
        Self { client }
    }

    /// List the devices enrolled for a child.
    pub async fn list(&self, child_id: &ChildId) -> HavenResult<Vec<Device>> {
        self.client
            .http
            .get(&format!("/children/{}/devices", child_id))
            .await
    }

    /// Enroll a device for a child.
    pub async fn register(
        &self,
        child_id: &ChildId,
        request: &RegisterDeviceRequest,
    ) -> HavenResult<Device> {
        self.client
            .http
            .post(&format!("/children/{}/devices", child_id), request)
            .await
    }

    /// Get a device by ID.
    pub async fn get(&self, device_id: &DeviceId) -> HavenResult<Device> {
        self.client.http.get(&format!("/devices/{}", device_id)).await
    }

    /// Partially update a device.
    pub async fn update(
        &self,
        device_id: &DeviceId,
        request: &UpdateDeviceRequest,
    ) -> HavenResult<Device> {
        self.client
            .http
            .patch(&format!("/devices/{}", device_id), request)
            .await
    }

    /// Pause all access on a device.
    pub async fn pause(&self, device_id: &DeviceId) -> HavenResult<Device> {
        self.update(device_id, &UpdateDeviceRequest::paused(true)).await
    }

    /// Resume access on a paused device.
    pub async fn resume(&self, device_id: &DeviceId) -> HavenResult<Device> {
        self.update(device_id, &UpdateDeviceRequest::paused(false)).await
    }

    /// Unenroll a device.
    pub async fn remove(&self, device_id: &DeviceId) -> HavenResult<()> {
        self.client
            .http
            .delete_no_response(&format!("/devices/{}", device_id))
            .await
    }
}

/// Request to enroll a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDeviceRequest {
    pub name: String,
    pub platform: DevicePlatform,
}

/// Partial device update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDeviceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
}

impl UpdateDeviceRequest {
    fn paused(paused: bool) -> Self {
        Self {
            paused: Some(paused),
            ..Default::default()
        }
    }
}
