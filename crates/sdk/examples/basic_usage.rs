//! Basic SDK usage example.
//!
//! Connects to a Haven API, lists families and their children, and prints
//! each child's policy and devices.
//!
//! Run with: HAVEN_API_KEY=sk-... cargo run --example basic_usage

use haven_sdk::{HavenClient, HavenError, HavenResult};
use std::time::Duration;

#[tokio::main]
async fn main() -> HavenResult<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    let base_url =
        std::env::var("HAVEN_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let api_key = std::env::var("HAVEN_API_KEY")
        .map_err(|_| HavenError::Config("HAVEN_API_KEY is not set".to_string()))?;

    let client = HavenClient::builder()
        .base_url(base_url)
        .api_key(api_key)
        .timeout(Duration::from_secs(30))
        .build()?;

    // Check server health
    println!("Checking server health...");
    let health = client.health().check().await?;
    println!("Server status: {}", health.status);

    println!("\nListing families...");
    let families = client.families().list().await?;
    println!("Found {} families", families.len());

    let today = chrono::Utc::now().date_naive();

    for family in families.iter().take(5) {
        println!("  Family: {} ({})", family.name, family.id);

        for child in client.children().list(&family.id).await? {
            println!("    Child: {} (age {})", child.name, child.age_on(today));

            match client.children().policy(&child.id).await {
                Ok(policy) => println!(
                    "      Max rating: {:?}, daily minutes: {:?}",
                    policy.max_rating, policy.daily_screen_minutes
                ),
                Err(HavenError::NotFound(_)) => println!("      No policy set"),
                Err(e) => return Err(e),
            }

            for device in client.devices().list(&child.id).await? {
                let state = if device.paused { "paused" } else { "active" };
                println!("      Device: {} [{:?}, {}]", device.name, device.platform, state);
            }
        }
    }

    println!("\nBasic usage example completed successfully!");
    Ok(())
}
