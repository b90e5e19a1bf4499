// Core types and tool resolution for the Haven API tooling

pub mod resolve;
pub mod tool;
pub mod types;

pub use resolve::{resolve, ResolveError, ResolvedRequest};
pub use tool::{HttpMethod, HttpSpec, ToolDefinition};
pub use types::*;
