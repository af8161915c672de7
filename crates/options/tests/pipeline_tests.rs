use crate::ai_codec_core::error::{SdkError, ValidationError};
use crate::ai_codec_options::pipeline::normalize_aliases;
use crate::ai_codec_options::{
    compose, core_schema, process, validate, OnUnsupported, OptionSet, Translated,
};
use crate::ai_codec_types::{Model, Operation};
use serde_json::{json, Value};

fn opts(v: Value) -> OptionSet {
    match v {
        Value::Object(m) => m,
        other => panic!("expected object, got {other}"),
    }
}

fn passthrough(_: Operation, _: &Model, options: OptionSet) -> Result<Translated, SdkError> {
    Ok(Translated::passthrough(options))
}

fn drop_top_k(_: Operation, _: &Model, options: OptionSet) -> Result<Translated, SdkError> {
    let mut t = Translated::passthrough(options);
    t.drop_option("top_k", "not supported by this backend");
    Ok(t)
}

#[test]
fn invalid_option_is_wrapped_by_process_but_raw_from_validate() {
    let composed = compose(&core_schema(), None);
    let model = Model::new("openai", "gpt-4o");
    let options = opts(json!({"temperature": "invalid"}));

    let err = process(&composed, Operation::Chat, &model, options.clone(), passthrough).unwrap_err();
    assert!(matches!(
        err,
        SdkError::Validation(ValidationError::InvalidType { .. })
    ));

    let raw = validate(&options, &composed).unwrap_err();
    assert!(matches!(raw, ValidationError::InvalidType { .. }));
}

#[test]
fn streaming_alias_becomes_stream() {
    let mut options = opts(json!({"streaming": true}));
    normalize_aliases(&mut options);
    assert_eq!(Value::Object(options), json!({"stream": true}));

    let mut both = opts(json!({"streaming": true, "stream": false}));
    normalize_aliases(&mut both);
    assert_eq!(Value::Object(both), json!({"stream": false}));
}

#[test]
fn warn_policy_returns_warnings() {
    let composed = compose(&core_schema(), None);
    let model = Model::new("groq", "llama-3.1-8b-instant");
    let out = process(
        &composed,
        Operation::Chat,
        &model,
        opts(json!({"top_k": 4, "temperature": 0.3})),
        drop_top_k,
    )
    .unwrap();
    assert!(!out.options.contains_key("top_k"));
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].contains("top_k"));
}

#[test]
fn error_policy_raises_unsupported() {
    let composed = compose(&core_schema(), None);
    let model = Model::new("groq", "llama-3.1-8b-instant");
    let err = process(
        &composed,
        Operation::Chat,
        &model,
        opts(json!({"top_k": 4, "on_unsupported": "error"})),
        drop_top_k,
    )
    .unwrap_err();
    match err {
        SdkError::Validation(ValidationError::Unsupported { warnings }) => {
            assert_eq!(warnings.len(), 1)
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn error_policy_without_warnings_succeeds() {
    let composed = compose(&core_schema(), None);
    let model = Model::new("groq", "llama-3.1-8b-instant");
    let out = process(
        &composed,
        Operation::Chat,
        &model,
        opts(json!({"temperature": 1.0, "on_unsupported": "error"})),
        drop_top_k,
    )
    .unwrap();
    assert!(out.warnings.is_empty());
}

#[test]
fn ignore_policy_discards_warnings() {
    assert_eq!(
        OnUnsupported::Ignore.apply(vec!["x".into()]).unwrap(),
        Vec::<String>::new()
    );
    assert_eq!(
        OnUnsupported::from_options(&opts(json!({"on_unsupported": "ignore"}))),
        OnUnsupported::Ignore
    );
    assert_eq!(OnUnsupported::from_options(&OptionSet::new()), OnUnsupported::Warn);
}

#[test]
fn context_option_is_checked_and_reattached() {
    let composed = compose(&core_schema(), None);
    let model = Model::new("openai", "gpt-4o");
    let raw_context = json!([
        {"role": "user", "content": [{"type": "text", "text": "hi"}]}
    ]);
    let out = process(
        &composed,
        Operation::Chat,
        &model,
        opts(json!({"context": raw_context.clone(), "temperature": 0.2})),
        passthrough,
    )
    .unwrap();
    assert_eq!(out.options["context"], raw_context);
    assert_eq!(out.context.map(|c| c.len()), Some(1));
}

#[test]
fn malformed_context_is_invalid_parameter() {
    let composed = compose(&core_schema(), None);
    let model = Model::new("openai", "gpt-4o");
    for bad in [json!("not a conversation"), json!([{"role": "tool", "content": []}])] {
        let err = process(
            &composed,
            Operation::Chat,
            &model,
            opts(json!({"context": bad})),
            passthrough,
        )
        .unwrap_err();
        match err {
            SdkError::InvalidParameter { message } => assert!(message.contains("context"), "{message}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

#[test]
fn rename_onto_an_existing_key_reports_a_drop() {
    let mut t = Translated::passthrough(opts(json!({
        "max_tokens": 10,
        "max_completion_tokens": 20
    })));
    t.rename_option("max_tokens", "max_completion_tokens", "reasoning model");
    assert_eq!(Value::Object(t.options), json!({"max_completion_tokens": 20}));
    assert_eq!(t.warnings.len(), 1);
    assert!(t.warnings[0].contains("`max_tokens` dropped"), "{}", t.warnings[0]);
    assert!(!t.warnings[0].contains("renamed"));
}

#[test]
fn embedding_calls_drop_chat_only_options() {
    let composed = compose(&core_schema(), None);
    let model = Model::new("openai", "text-embedding-3-small");
    let out = process(
        &composed,
        Operation::Embedding,
        &model,
        opts(json!({
            "temperature": 0.5,
            "user": "u-1",
            "provider_options": {"dimensions": 8, "logprobs": true}
        })),
        passthrough,
    )
    .unwrap();
    assert_eq!(
        Value::Object(out.options),
        json!({
            "user": "u-1",
            "provider_options": {"dimensions": 8},
            "on_unsupported": "warn"
        })
    );
    assert_eq!(out.warnings.len(), 2);
    assert!(out.warnings.iter().any(|w| w.contains("`temperature`")));
    assert!(out.warnings.iter().any(|w| w.contains("provider_options.logprobs")));
}

#[test]
fn embedding_calls_honor_the_error_policy() {
    let composed = compose(&core_schema(), None);
    let model = Model::new("openai", "text-embedding-3-small");
    let err = process(
        &composed,
        Operation::Embedding,
        &model,
        opts(json!({"temperature": 0.5, "on_unsupported": "error"})),
        passthrough,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SdkError::Validation(ValidationError::Unsupported { .. })
    ));
}
