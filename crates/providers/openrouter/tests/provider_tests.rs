use crate::ai_codec_options::OptionSet;
use crate::ai_codec_provider::{PreparedRequest, ProviderConfig, ProviderRegistry};
use crate::ai_codec_types::{Model, Operation};
use crate::provider_openrouter::OpenRouterProvider;
use serde_json::json;
use std::sync::Arc;

fn prepare(options: serde_json::Value) -> PreparedRequest {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(OpenRouterProvider));
    let model = Model::parse("openrouter:anthropic/claude-3.5-sonnet").unwrap();
    let provider = registry.resolve(&model).unwrap();
    let options: OptionSet = options.as_object().cloned().unwrap();
    let processed = provider.process(Operation::Chat, &model, options).unwrap();
    assert!(processed.warnings.is_empty(), "{:?}", processed.warnings);
    provider
        .adapter()
        .prepare_request(
            Operation::Chat,
            &model,
            "hi".into(),
            &processed,
            &ProviderConfig::default().with_api_key("or-key"),
        )
        .unwrap()
}

#[test]
fn routing_hints_and_top_k_reach_the_body() {
    let prepared = prepare(json!({
        "top_k": 40,
        "provider_options": {
            "models": ["a/b", "c/d"],
            "route": "fallback",
            "min_p": 0.1
        }
    }));
    let body = &prepared.request.body;
    assert_eq!(body["model"], "anthropic/claude-3.5-sonnet");
    assert_eq!(body["top_k"], 40);
    assert_eq!(body["models"], json!(["a/b", "c/d"]));
    assert_eq!(body["route"], "fallback");
    assert_eq!(body["min_p"], 0.1);
    assert_eq!(
        prepared.request.url,
        "https://openrouter.ai/api/v1/chat/completions"
    );
    assert_eq!(prepared.request.header("authorization"), Some("Bearer or-key"));
}

#[test]
fn attribution_options_become_headers_only() {
    let prepared = prepare(json!({
        "provider_options": {"app_referer": "https://example.dev", "app_title": "Demo"}
    }));
    assert_eq!(
        prepared.request.header("http-referer"),
        Some("https://example.dev")
    );
    assert_eq!(prepared.request.header("x-title"), Some("Demo"));
    assert!(prepared.request.body.get("app_referer").is_none());
    assert!(prepared.request.body.get("app_title").is_none());
}

#[test]
fn unknown_nested_option_gets_a_suggestion() {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(OpenRouterProvider));
    let model = Model::new("openrouter", "x");
    let options: OptionSet = json!({"provider_options": {"transform": ["middle-out"]}})
        .as_object()
        .cloned()
        .unwrap();
    let err = registry.resolve(&model).unwrap().validate(&options).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("provider_options.transform"), "{msg}");
    assert!(msg.contains("transforms"), "{msg}");
}
