//! # Haven SDK
//!
//! Rust client for the Haven family-safety API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use haven_sdk::{HavenClient, HavenResult};
//!
//! #[tokio::main]
//! async fn main() -> HavenResult<()> {
//!     // Build client
//!     let client = HavenClient::builder()
//!         .base_url("https://api.haven.example.com/v1")
//!         .api_key("sk-your-api-key")
//!         .build()?;
//!
//!     // Check health
//!     let health = client.health().check().await?;
//!     println!("Server status: {}", health.status);
//!
//!     // List families
//!     let families = client.families().list().await?;
//!     println!("Found {} families", families.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! Non-success responses surface as typed [`HavenError`] variants. Requests
//! that hit a retryable status (429 and 5xx by default) are retried with
//! exponential backoff, honouring `Retry-After` when the server sends it.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

// Re-export main client
pub use client::{HavenClient, HavenClientBuilder};
pub use config::{ClientConfig, RetryConfig};
pub use error::{HavenError, HavenResult};

// Re-export core types for convenience
pub use haven_core::types::{
    Bedtime, Child, ChildId, ChildPolicy, ContentRating, Device, DeviceId, DevicePlatform, Family,
    FamilyId, Platform, PlatformCategory, PlatformId,
};
