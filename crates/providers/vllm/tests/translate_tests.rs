use crate::ai_codec_options::OptionSet;
use crate::ai_codec_provider::{ProviderAdapter, ProviderConfig, ProviderRegistry, RequestInput};
use crate::ai_codec_types::{Model, Operation};
use crate::provider_vllm::VllmProvider;
use serde_json::json;
use std::sync::Arc;

fn options(value: serde_json::Value) -> OptionSet {
    value.as_object().cloned().unwrap()
}

#[test]
fn only_the_first_guided_mode_survives() {
    let model = Model::new("vllm", "meta-llama/Llama-3.1-8B-Instruct");
    let out = VllmProvider
        .translate_options(
            Operation::Chat,
            &model,
            options(json!({"provider_options": {
                "guided_regex": "[a-z]+",
                "guided_choice": ["yes", "no"],
                "min_p": 0.05
            }})),
        )
        .unwrap();
    assert_eq!(
        out.options["provider_options"],
        json!({"guided_regex": "[a-z]+", "min_p": 0.05})
    );
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].contains("guided_choice"));
    assert!(out.warnings[0].contains("keeping `guided_regex`"));
}

#[test]
fn single_guided_mode_passes_without_warning() {
    let model = Model::new("vllm", "m");
    let out = VllmProvider
        .translate_options(
            Operation::Chat,
            &model,
            options(json!({"provider_options": {"guided_json": {"type": "object"}}})),
        )
        .unwrap();
    assert!(out.warnings.is_empty());
}

#[test]
fn keyless_request_to_local_server() {
    std::env::remove_var("VLLM_API_KEY");
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(VllmProvider));
    let model = Model::new("vllm", "m");
    let provider = registry.resolve(&model).unwrap();
    let processed = provider
        .process(
            Operation::Chat,
            &model,
            options(json!({"top_k": 20, "provider_options": {"best_of": 2}})),
        )
        .unwrap();
    let prepared = provider
        .adapter()
        .prepare_request(
            Operation::Chat,
            &model,
            "hi".into(),
            &processed,
            &ProviderConfig::default(),
        )
        .unwrap();
    assert_eq!(prepared.request.url, "http://localhost:8000/v1/chat/completions");
    assert!(prepared.request.header("authorization").is_none());
    assert_eq!(prepared.request.body["top_k"], 20);
    assert_eq!(prepared.request.body["best_of"], 2);
}

#[test]
fn embeddings_go_to_the_embeddings_route() {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(VllmProvider));
    let model = Model::new("vllm", "BAAI/bge-m3");
    let provider = registry.resolve(&model).unwrap();
    let processed = provider
        .process(Operation::Embedding, &model, OptionSet::new())
        .unwrap();
    let prepared = provider
        .adapter()
        .prepare_request(
            Operation::Embedding,
            &model,
            RequestInput::Texts(vec!["a".into(), "b".into()]),
            &processed,
            &ProviderConfig::default().with_base_url("http://gpu-box:9000/v1/"),
        )
        .unwrap();
    assert_eq!(prepared.request.url, "http://gpu-box:9000/v1/embeddings");
    assert_eq!(prepared.request.body["input"], json!(["a", "b"]));
}

#[test]
fn embedding_size_reaches_the_embeddings_body() {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(VllmProvider));
    let model = Model::new("vllm", "BAAI/bge-m3");
    let provider = registry.resolve(&model).unwrap();
    let processed = provider
        .process(
            Operation::Embedding,
            &model,
            options(json!({"provider_options": {
                "dimensions": 256,
                "encoding_format": "base64",
                "guided_regex": "x"
            }})),
        )
        .unwrap();
    assert_eq!(processed.warnings.len(), 1);
    assert!(processed.warnings[0].contains("guided_regex"));
    let prepared = provider
        .adapter()
        .prepare_request(
            Operation::Embedding,
            &model,
            RequestInput::Texts(vec!["a".into()]),
            &processed,
            &ProviderConfig::default(),
        )
        .unwrap();
    assert_eq!(prepared.request.body["dimensions"], 256);
    assert_eq!(prepared.request.body["encoding_format"], "base64");
}

#[test]
fn embedding_size_is_dropped_from_chat() {
    let out = VllmProvider
        .translate_options(
            Operation::Chat,
            &Model::new("vllm", "m"),
            options(json!({"provider_options": {"dimensions": 256, "min_p": 0.1}})),
        )
        .unwrap();
    assert_eq!(out.options["provider_options"], json!({"min_p": 0.1}));
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].contains("provider_options.dimensions"));
}
