use serde_json::{Map as JsonMap, Value};

/// Parse a JSON value from a possibly noisy string.
///
/// A strict parse is tried first. Failing that, parsing restarts at the first
/// `{` or `[` and stops after one complete value, so leading chatter and
/// trailing markers (for example `<|tool_call_end|>`) are ignored.
pub fn parse_json_loose(s: &str) -> Option<Value> {
    if let Ok(v) = serde_json::from_str::<Value>(s) {
        return Some(v);
    }
    let start = s.find(['{', '['])?;
    let mut values = serde_json::Deserializer::from_str(&s[start..]).into_iter::<Value>();
    values.next()?.ok()
}

/// Decode tool-call arguments as sent on the wire.
///
/// Backends send arguments either as JSON text or as an already-decoded
/// object. Text that does not parse (a partial stream fragment, or plain
/// garbage) degrades to an empty map instead of failing.
pub fn decode_tool_arguments(raw: Option<&Value>) -> Value {
    match raw {
        Some(Value::String(s)) => match parse_json_loose(s) {
            Some(v @ Value::Object(_)) => v,
            _ => Value::Object(JsonMap::new()),
        },
        Some(v @ Value::Object(_)) => v.clone(),
        _ => Value::Object(JsonMap::new()),
    }
}

/// Encode tool-call arguments as the JSON text most servers expect.
pub fn encode_tool_arguments(arguments: &Value) -> String {
    match arguments {
        Value::String(s) => s.clone(),
        Value::Null => "{}".to_string(),
        other => other.to_string(),
    }
}
