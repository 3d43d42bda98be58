//! Tool parameter → JSON schema normalization.
//!
//! Vendors consume tool definitions as JSON-schema-like documents. This
//! module builds one [`ToolSchema`] per offered tool, applying the
//! normalization rules every vendor's function-calling endpoint expects:
//!
//! - `integer` parameters become `number` (the vendors' numeric type),
//! - `array` parameters default their item type to `string` when the tool
//!   left it unspecified,
//! - enumerations pass through verbatim,
//! - required parameter names are collected into a `required` list.
//!
//! The loop calls [`tool_schemas`] exactly once per call, before the first
//! round.

use serde_json::{Map, Value, json};

use crate::tool::Tool;

/// A vendor-neutral tool definition: name, description, and a normalized
/// JSON-schema document for the parameters. Vendor adapters wrap this into
/// their native tool structure without re-deriving the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSchema {
    /// The tool's name.
    pub name: String,
    /// The tool's description.
    pub description: String,
    /// A JSON-schema object: `{"type":"object","properties":…,"required":…}`.
    pub parameters: Value,
}

/// Builds the normalized definition for a single tool.
pub fn tool_schema(tool: &dyn Tool) -> ToolSchema {
    let mut properties = Map::new();
    let mut required: Vec<Value> = Vec::new();

    // Deterministic property order keeps request bodies stable across runs.
    let mut params: Vec<_> = tool.parameters().into_iter().collect();
    params.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, spec) in params {
        let mut prop = Map::new();
        prop.insert("description".into(), Value::String(spec.description));

        let param_type = if spec.param_type == "integer" {
            "number".to_string()
        } else {
            spec.param_type
        };
        prop.insert("type".into(), Value::String(param_type.clone()));

        if param_type == "array" {
            let item_type = spec
                .items
                .filter(|i| !i.item_type.is_empty())
                .map_or_else(|| "string".to_string(), |i| i.item_type);
            prop.insert("items".into(), json!({ "type": item_type }));
        }

        if let Some(values) = spec.enum_values {
            prop.insert("enum".into(), Value::Array(values));
        }

        if spec.required {
            required.push(Value::String(name.clone()));
        }
        properties.insert(name, Value::Object(prop));
    }

    ToolSchema {
        name: tool.name().to_string(),
        description: tool.description().to_string(),
        parameters: json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }),
    }
}

/// Builds definitions for every offered tool, in offer order.
pub fn tool_schemas(tools: &[std::sync::Arc<dyn Tool>]) -> Vec<ToolSchema> {
    tools.iter().map(|t| tool_schema(t.as_ref())).collect()
}
