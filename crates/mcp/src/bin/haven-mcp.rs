// Standalone MCP server binary

use anyhow::Result;
use clap::Parser;
use haven_mcp::{McpConfig, McpServer, ToolExecutor, ToolRegistry};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "haven-mcp")]
#[command(about = "MCP server exposing the Haven API as tools", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "haven-mcp.toml")]
    config: PathBuf,

    /// Haven API key
    #[arg(long, env = "HAVEN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Haven API base URL, e.g. https://api.haven.app/v1
    #[arg(long, env = "HAVEN_BASE_URL")]
    base_url: Option<String>,

    /// JSON file with extra tool definitions
    #[arg(long)]
    tools_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "haven_mcp=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    tracing::info!("Haven MCP server starting...");

    let config = McpConfig::load(&args.config)?.with_overrides(
        args.base_url,
        args.api_key,
        args.tools_file,
    );

    let mut registry = ToolRegistry::with_catalog();
    if let Some(path) = config.tools_file() {
        let loaded = registry.load_json_file(path)?;
        tracing::info!(path = %path.display(), "Loaded {} extra tool definitions", loaded);
    }

    tracing::info!("Registered {} tools", registry.len());

    let executor = ToolExecutor::new(config.executor_config()?)?;

    let server = McpServer::new(registry, Arc::new(executor));
    server.start().await?;

    Ok(())
}
