//! Per-resource API handles.

mod children;
mod devices;
mod families;
mod health;
mod platforms;

pub use children::{ChildrenApi, CreateChildRequest, UpdateChildRequest};
pub use devices::{DevicesApi, RegisterDeviceRequest, UpdateDeviceRequest};
pub use families::{CreateFamilyRequest, FamiliesApi, UpdateFamilyRequest};
pub use health::{HealthApi, HealthCheck};
pub use platforms::PlatformsApi;

#[cfg(test)]
pub(crate) fn test_client(base_url: &str) -> crate::HavenClient {
    crate::HavenClient::builder()
        .base_url(base_url)
        .api_key("sk-test")
        .retry_config(crate::RetryConfig::no_retry())
        .build()
        .unwrap()
}
