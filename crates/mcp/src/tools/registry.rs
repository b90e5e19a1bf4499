// Tool registry: name -> definition lookup for the MCP server

use crate::protocol::ToolSchema;
use anyhow::{Context, Result};
use haven_core::ToolDefinition;
use std::collections::HashMap;
use std::path::Path;

/// Tool registry for managing available tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDefinition>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registry pre-filled with every Haven API tool
    pub fn with_catalog() -> Self {
        let mut registry = Self::new();
        for tool in super::catalog::tools() {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool, replacing any earlier tool with the same name
    pub fn register(&mut self, tool: ToolDefinition) {
        if self.tools.contains_key(&tool.name) {
            tracing::debug!(tool = %tool.name, "Replacing existing tool definition");
        }
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Register every definition in a JSON array file. Returns how many were loaded.
    pub fn load_json_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tool definitions from {}", path.display()))?;
        let tools: Vec<ToolDefinition> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse tool definitions in {}", path.display()))?;

        let count = tools.len();
        for tool in tools {
            self.register(tool);
        }
        Ok(count)
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// List all tool schemas, sorted by name
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(ToolSchema::from).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_integer(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "integer",
        "description": description
    })
}

pub fn json_schema_boolean(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "boolean",
        "description": description
    })
}

pub fn json_schema_array(items: serde_json::Value, description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "items": items,
        "description": description
    })
}

pub fn json_schema_enum(values: &[&str], description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "enum": values,
        "description": description
    })
}
