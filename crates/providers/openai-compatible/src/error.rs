use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAICompatibleInnerError {
    pub message: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub param: Option<JsonValue>,
    #[serde(default)]
    pub code: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAICompatibleErrorData {
    pub error: OpenAICompatibleInnerError,
}

/// Message of an in-band `{"error": ...}` payload, as sent mid-stream by
/// several servers. Returns `None` when the payload carries no error.
pub fn error_message(payload: &JsonValue) -> Option<String> {
    let error = payload.get("error").filter(|e| !e.is_null())?;
    if let Ok(data) = serde_json::from_value::<OpenAICompatibleErrorData>(payload.clone()) {
        return Some(match data.error.r#type {
            Some(kind) if !kind.is_empty() => format!("{kind}: {}", data.error.message),
            _ => data.error.message,
        });
    }
    Some(match error {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    })
}
