// Declarative tool definitions: one per callable REST operation

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP verb a tool maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Whether leftover input fields travel as a JSON body.
    /// GET and DELETE carry them in the query string instead.
    pub fn carries_body(&self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method and path template of a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSpec {
    pub method: HttpMethod,
    /// Path template, e.g. `/families/{familyId}/children`
    pub path: String,
}

/// Static description of one callable operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON Schema for the tool input. Documentation only; the resolver
    /// does not enforce it.
    #[serde(default = "empty_object_schema")]
    pub input_schema: serde_json::Value,
    pub http: HttpSpec,
}

fn empty_object_schema() -> serde_json::Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        method: HttpMethod,
        path: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            http: HttpSpec {
                method,
                path: path.into(),
            },
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.http.method
    }

    /// Placeholder names in the path template, in order of appearance
    pub fn path_params(&self) -> Vec<String> {
        crate::resolve::extract_placeholders(&self.http.path)
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }
}
