use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token accounting for one call. Counts default to zero when the backend
/// leaves them out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_tokens: Option<u64>,
}

impl Usage {
    pub fn new(input_tokens: u64, output_tokens: u64, total_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
            reasoning_tokens: None,
            cached_tokens: None,
        }
    }
}

fn count(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> u64 {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_u64))
        .unwrap_or(0)
}

/// Parse an OpenAI-style usage object.
///
/// Accepts both Chat Completions (`prompt_tokens`/`completion_tokens`) and
/// Responses (`input_tokens`/`output_tokens`) field names. Returns `None` only
/// when `u` is not an object; individual missing fields read as zero.
pub fn from_openai(u: &Value) -> Option<Usage> {
    let obj = u.as_object()?;
    let reasoning_tokens = obj
        .get("completion_tokens_details")
        .or_else(|| obj.get("output_tokens_details"))
        .and_then(|d| d.get("reasoning_tokens"))
        .and_then(Value::as_u64);
    let cached_tokens = obj
        .get("prompt_tokens_details")
        .or_else(|| obj.get("input_tokens_details"))
        .and_then(|d| d.get("cached_tokens"))
        .and_then(Value::as_u64);
    Some(Usage {
        input_tokens: count(obj, &["prompt_tokens", "input_tokens"]),
        output_tokens: count(obj, &["completion_tokens", "output_tokens"]),
        total_tokens: count(obj, &["total_tokens"]),
        reasoning_tokens,
        cached_tokens,
    })
}
