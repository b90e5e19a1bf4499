// Tool input resolution: path template substitution and query/body partitioning

use crate::tool::ToolDefinition;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// Concrete path/query/body triple ready for transport
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRequest {
    pub path: String,
    pub query: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,
}

/// Caller errors detected while resolving a tool call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("missing path parameter '{name}' for {template}")]
    MissingPathParam { name: String, template: String },

    #[error("path parameter '{name}' must be a string, number or boolean")]
    NonScalarPathParam { name: String },
}

/// Resolve a tool call into a request descriptor.
///
/// Every `{name}` placeholder in the path template is replaced by the
/// matching input field and that field is consumed. The remaining fields go
/// to the query string for GET and DELETE, and to the JSON body for the other
/// methods. Fails before any I/O if a placeholder has no scalar input value.
pub fn resolve(
    tool: &ToolDefinition,
    input: &Map<String, Value>,
) -> Result<ResolvedRequest, ResolveError> {
    let template = tool.http.path.as_str();
    let mut path = String::with_capacity(template.len());
    let mut consumed: HashSet<&str> = HashSet::new();

    let mut rest = template;
    while let Some((before, name, after)) = next_placeholder(rest) {
        let value = input
            .get(name)
            .ok_or_else(|| ResolveError::MissingPathParam {
                name: name.to_string(),
                template: template.to_string(),
            })?;

        path.push_str(before);
        path.push_str(&path_segment(name, value)?);
        consumed.insert(name);
        rest = after;
    }
    path.push_str(rest);

    let leftovers = input
        .iter()
        .filter(|(key, _)| !consumed.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()));

    if tool.method().carries_body() {
        let body: Map<String, Value> = leftovers.collect();
        Ok(ResolvedRequest {
            path,
            query: BTreeMap::new(),
            body: (!body.is_empty()).then_some(body),
        })
    } else {
        Ok(ResolvedRequest {
            path,
            query: leftovers.collect(),
            body: None,
        })
    }
}

/// Placeholder names in a path template, in order of appearance
pub(crate) fn extract_placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some((_, name, after)) = next_placeholder(rest) {
        names.push(name);
        rest = after;
    }
    names
}

/// Split `text` around its first `{name}` placeholder.
/// An opening brace without a closing one is not a placeholder.
fn next_placeholder(text: &str) -> Option<(&str, &str, &str)> {
    let open = text.find('{')?;
    let after_open = &text[open + 1..];
    let close = after_open.find('}')?;
    Some((&text[..open], &after_open[..close], &after_open[close + 1..]))
}

fn path_segment(name: &str, value: &Value) -> Result<String, ResolveError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            Err(ResolveError::NonScalarPathParam {
                name: name.to_string(),
            })
        }
    }
}
