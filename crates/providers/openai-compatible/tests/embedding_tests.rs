use crate::ai_codec_core::SdkError;
use crate::ai_codec_types::Model;
use crate::provider_openai_compatible::embedding::{
    decode_embedding_response, encode_embedding_body,
};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use serde_json::{json, Map};

fn model() -> Model {
    Model::new("openai", "text-embedding-3-small")
}

#[test]
fn body_carries_input_and_provider_fields() {
    let mut options = Map::new();
    options.insert(
        "provider_options".into(),
        json!({"dimensions": 256, "logprobs": true}),
    );
    options.insert("user".into(), json!("u-1"));
    let body = encode_embedding_body(&model(), &["a".into(), "b".into()], &options).unwrap();
    assert_eq!(
        serde_json::Value::Object(body),
        json!({
            "model": "text-embedding-3-small",
            "input": ["a", "b"],
            "dimensions": 256,
            "user": "u-1"
        })
    );
}

#[test]
fn empty_input_is_rejected() {
    let err = encode_embedding_body(&model(), &[], &Map::new()).unwrap_err();
    assert!(matches!(err, SdkError::InvalidParameter { .. }));
}

#[test]
fn vectors_are_ordered_by_index() {
    let body = json!({
        "data": [
            {"index": 1, "embedding": [0.5, 0.25]},
            {"index": 0, "embedding": [1.0, 2.0]}
        ],
        "model": "text-embedding-3-small",
        "usage": {"prompt_tokens": 4, "total_tokens": 4}
    });
    let resp = decode_embedding_response(200, body.to_string().as_bytes(), &model()).unwrap();
    assert_eq!(resp.embeddings, vec![vec![1.0, 2.0], vec![0.5, 0.25]]);
    assert_eq!(resp.usage.input_tokens, 4);
}

#[test]
fn base64_vectors_are_decoded() {
    let bytes: Vec<u8> = [1.5f32, -2.0]
        .iter()
        .flat_map(|f| f.to_le_bytes())
        .collect();
    let body = json!({"data": [{"index": 0, "embedding": B64.encode(bytes)}]});
    let resp = decode_embedding_response(200, body.to_string().as_bytes(), &model()).unwrap();
    assert_eq!(resp.embeddings, vec![vec![1.5, -2.0]]);
    assert_eq!(resp.model, "text-embedding-3-small");
}

#[test]
fn error_status_and_bad_shapes() {
    let err = decode_embedding_response(401, b"nope", &model()).unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.raw_body(), Some("nope"));

    let err = decode_embedding_response(200, br#"{"data":[{"embedding":"x"}]}"#, &model())
        .unwrap_err();
    assert!(err.to_string().contains("data[0].embedding"), "{err}");
}
