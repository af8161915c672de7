use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use serde_json::{Map, Value};

use crate::ai_codec_core::json::insert_present;
use crate::ai_codec_core::SdkError;
use crate::ai_codec_options::{OptionSet, EMBEDDING_PROVIDER_KEYS, PROVIDER_OPTIONS_KEY};
use crate::ai_codec_types::embedding::{Embedding, EmbeddingResponse};
use crate::ai_codec_types::usage::from_openai;
use crate::ai_codec_types::Model;

/// Build a `/embeddings` body.
pub fn encode_embedding_body(model: &Model, input: &[String], options: &OptionSet) -> Result<Map<String, Value>, SdkError> {
    if input.is_empty() {
        return Err(SdkError::invalid_parameter("embedding input must not be empty"));
    }
    let mut body = Map::new();
    body.insert("model".into(), Value::String(model.name.clone()));
    body.insert(
        "input".into(),
        Value::Array(input.iter().cloned().map(Value::String).collect()),
    );
    if let Some(Value::Object(provider)) = options.get(PROVIDER_OPTIONS_KEY) {
        for field in EMBEDDING_PROVIDER_KEYS {
            insert_present(&mut body, field, provider.get(*field));
        }
    }
    insert_present(&mut body, "user", options.get("user"));
    Ok(body)
}

/// Vectors come back either as float arrays or, with
/// `encoding_format: "base64"`, as little-endian f32 bytes.
fn decode_vector(raw: &Value) -> Option<Embedding> {
    match raw {
        Value::Array(items) => items.iter().map(|v| v.as_f64().map(|f| f as f32)).collect(),
        Value::String(encoded) => {
            let bytes = B64.decode(encoded).ok()?;
            if bytes.len() % 4 != 0 {
                return None;
            }
            Some(
                bytes
                    .chunks_exact(4)
                    .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            )
        }
        _ => None,
    }
}

/// Decode an `/embeddings` reply, ordering vectors by their `index`.
pub fn decode_embedding_response(status: u16, body: &[u8], model: &Model) -> Result<EmbeddingResponse, SdkError> {
    let text = String::from_utf8_lossy(body);
    if !(200..300).contains(&status) {
        return Err(SdkError::api_response(status, text));
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| SdkError::malformed_response(status, &*text, &e.to_string()))?;
    let Some(data) = value.get("data").and_then(Value::as_array) else {
        return Err(SdkError::malformed_response(status, text, "missing data"));
    };

    let mut indexed: Vec<(u64, Embedding)> = Vec::with_capacity(data.len());
    for (position, item) in data.iter().enumerate() {
        let index = item
            .get("index")
            .and_then(Value::as_u64)
            .unwrap_or(position as u64);
        let Some(vector) = item.get("embedding").and_then(decode_vector) else {
            return Err(SdkError::malformed_response(
                status,
                text,
                &format!("data[{position}].embedding is not a vector"),
            ));
        };
        indexed.push((index, vector));
    }
    indexed.sort_by_key(|(index, _)| *index);

    Ok(EmbeddingResponse {
        model: value
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(&model.name)
            .to_string(),
        embeddings: indexed.into_iter().map(|(_, v)| v).collect(),
        usage: value.get("usage").and_then(from_openai).unwrap_or_default(),
    })
}
