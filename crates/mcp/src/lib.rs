// MCP (Model Context Protocol) server for the Haven API
// Maps MCP tool calls 1:1 onto Haven REST endpoints

pub mod config;
pub mod executor;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::{ExecutorConfig, McpConfig};
pub use executor::{CallResult, ExecutorError, ToolCaller, ToolExecutor};
pub use server::McpServer;
pub use tools::ToolRegistry;
