use serde_json::{json, Map, Value};

use crate::ai_codec_core::SdkError;
use crate::ai_codec_types::Tool;

fn project_tool(tool: &Tool) -> Value {
    let mut function = Map::new();
    function.insert("name".into(), Value::String(tool.name.clone()));
    if let Some(description) = &tool.description {
        function.insert("description".into(), Value::String(description.clone()));
    }
    function.insert("parameters".into(), tool.parameters.clone());
    if let Some(strict) = tool.strict {
        function.insert("strict".into(), Value::Bool(strict));
    }
    json!({"type": "function", "function": function})
}

/// Project the `tools` option onto the wire tool list.
///
/// Entries may be canonical tool definitions or already in wire shape
/// (`{"type": "function", "function": {...}}`); both come out in wire shape.
pub fn encode_tools(tools: &[Value]) -> Result<Vec<Value>, SdkError> {
    tools
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let source = match raw.get("function") {
                Some(inner) if raw.get("type").and_then(Value::as_str) == Some("function") => inner,
                _ => raw,
            };
            let tool: Tool = serde_json::from_value(source.clone()).map_err(|e| {
                SdkError::invalid_parameter(format!("tools[{i}] is not a valid tool definition: {e}"))
            })?;
            if tool.name.trim().is_empty() {
                return Err(SdkError::invalid_parameter(format!("tools[{i}] has an empty name")));
            }
            Ok(project_tool(&tool))
        })
        .collect()
}

/// Map `tool_choice` onto the wire. Mode strings pass through, any other
/// string names the function to force.
pub fn encode_tool_choice(choice: &Value) -> Value {
    match choice {
        Value::String(mode) if matches!(mode.as_str(), "auto" | "none" | "required") => choice.clone(),
        Value::String(name) => json!({"type": "function", "function": {"name": name}}),
        Value::Object(map) if !map.contains_key("type") => match map.get("name") {
            Some(name) => json!({"type": "function", "function": {"name": name}}),
            None => choice.clone(),
        },
        other => other.clone(),
    }
}
