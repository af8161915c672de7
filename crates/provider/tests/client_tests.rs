use crate::ai_codec_core::error::TransportError;
use crate::ai_codec_core::transport::{
    HttpTransport, StreamingWireResponse, TransportConfig, WireRequest, WireResponse,
};
use crate::ai_codec_core::{collect_stream_to_response, SdkError, StreamCollectorConfig};
use crate::ai_codec_options::OptionSet;
use crate::ai_codec_provider::{Client, ProviderConfig, ProviderRegistry};
use crate::ai_codec_types::{Context, FinishReason, Message, Model, StreamChunk};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use serde_json::json;
use std::sync::{Arc, Mutex};

struct TestTransport {
    status: u16,
    response_json: serde_json::Value,
    stream_chunks: Mutex<Vec<Result<Bytes, TransportError>>>,
    last_request: Mutex<Option<WireRequest>>,
}

impl TestTransport {
    fn new(status: u16, response_json: serde_json::Value) -> Self {
        Self {
            status,
            response_json,
            stream_chunks: Mutex::new(vec![]),
            last_request: Mutex::new(None),
        }
    }

    fn with_stream(self, frames: &[&str]) -> Self {
        *self.stream_chunks.lock().unwrap() = frames
            .iter()
            .map(|f| Ok(Bytes::from(f.to_string())))
            .collect();
        self
    }

    fn last_request(&self) -> WireRequest {
        self.last_request
            .lock()
            .unwrap()
            .clone()
            .expect("a request was sent")
    }
}

#[async_trait]
impl HttpTransport for TestTransport {
    async fn send(
        &self,
        request: &WireRequest,
        _cfg: &TransportConfig,
    ) -> Result<WireResponse, TransportError> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(WireResponse {
            status: self.status,
            headers: vec![],
            body: Bytes::from(self.response_json.to_string()),
        })
    }

    async fn send_stream(
        &self,
        request: &WireRequest,
        _cfg: &TransportConfig,
    ) -> Result<StreamingWireResponse, TransportError> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        let chunks = std::mem::take(&mut *self.stream_chunks.lock().unwrap());
        Ok(StreamingWireResponse {
            status: self.status,
            headers: vec![("content-type".into(), "text/event-stream".into())],
            body: Box::pin(stream::iter(chunks)),
        })
    }
}

fn client(transport: TestTransport) -> Client<TestTransport> {
    Client::with_transport(Arc::new(ProviderRegistry::with_builtin()), transport)
        .with_provider_config("openai", ProviderConfig::default().with_api_key("sk-test"))
}

fn options(value: serde_json::Value) -> OptionSet {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn generate_text_round_trip() {
    let transport = TestTransport::new(
        200,
        json!({
            "id": "chatcmpl-7",
            "choices": [{"message": {"role": "assistant", "content": "Hi there"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5}
        }),
    );
    let client = client(transport);
    let model = Model::parse("openai:gpt-4o-mini").unwrap();
    let ctx = Context::new(vec![Message::user("Hello")]);

    let out = client
        .generate_text(&model, ctx.clone(), options(json!({"temperature": 0.2})))
        .await
        .unwrap();

    assert!(out.warnings.is_empty());
    assert_eq!(out.output.text(), "Hi there");
    assert_eq!(out.output.id, "chatcmpl-7");
    assert_eq!(out.output.context.len(), ctx.len() + 1);
    assert_eq!(ctx.len(), 1);

    let sent = client.transport().last_request();
    assert_eq!(sent.url, "https://api.openai.com/v1/chat/completions");
    assert_eq!(sent.header("authorization"), Some("Bearer sk-test"));
    assert_eq!(sent.body["temperature"], 0.2);
}

#[tokio::test]
async fn warnings_are_returned_with_the_output() {
    let transport = TestTransport::new(
        200,
        json!({"choices": [{"message": {"content": "ok"}}]}),
    );
    let client = client(transport);
    let model = Model::parse("openai:o1-preview").unwrap();
    let out = client
        .generate_text(&model, "think", options(json!({"max_tokens": 1000})))
        .await
        .unwrap();
    assert_eq!(out.warnings.len(), 1);
    let sent = client.transport().last_request();
    assert_eq!(sent.body["max_completion_tokens"], 1000);
    assert!(sent.body.get("max_tokens").is_none());
}

#[tokio::test]
async fn api_errors_keep_status_and_body() {
    let transport = TestTransport::new(401, json!({"error": {"message": "bad key"}}));
    let client = client(transport);
    let model = Model::parse("openai:gpt-4o").unwrap();
    let err = client
        .generate_text(&model, "hi", OptionSet::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.raw_body().unwrap().contains("bad key"));
}

#[tokio::test]
async fn validation_fails_before_any_request() {
    let transport = TestTransport::new(200, json!({}));
    let client = client(transport);
    let model = Model::parse("openai:gpt-4o").unwrap();
    let err = client
        .generate_text(&model, "hi", options(json!({"temperature": "hot"})))
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Validation(_)));
    assert!(client.transport().last_request.lock().unwrap().is_none());
}

#[tokio::test]
async fn buffered_calls_reject_stream_flag() {
    let client = client(TestTransport::new(200, json!({})));
    let model = Model::parse("openai:gpt-4o-mini").unwrap();
    for opts in [json!({"stream": true}), json!({"streaming": true})] {
        let err = client
            .generate_text(&model, "hi", options(opts))
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::InvalidParameter { .. }));
        assert!(err.to_string().contains("stream_text"), "{err}");
    }
    assert!(client.transport().last_request.lock().unwrap().is_none());
}

#[tokio::test]
async fn buffered_calls_send_a_plain_request_when_stream_is_false() {
    let transport = TestTransport::new(
        200,
        json!({"choices": [{"message": {"content": "ok"}}]}),
    );
    let client = client(transport);
    let model = Model::parse("openai:gpt-4o-mini").unwrap();
    client
        .generate_text(&model, "hi", options(json!({"streaming": false})))
        .await
        .unwrap();
    let sent = client.transport().last_request();
    assert!(sent.body.get("stream").is_none());
    assert!(sent.body.get("stream_options").is_none());
    assert_eq!(sent.header("accept"), Some("application/json"));
}

#[tokio::test]
async fn stream_text_decodes_sse_frames() {
    let transport = TestTransport::new(200, json!({})).with_stream(&[
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n",
        "\ndata: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
        "data: [DONE]\n\n",
    ]);
    let client = client(transport);
    let model = Model::parse("openai:gpt-4o-mini").unwrap();

    let out = client
        .stream_text(&model, "hi", OptionSet::new())
        .await
        .unwrap();
    let chunks: Vec<StreamChunk> = out
        .output
        .map(|c| c.unwrap())
        .collect()
        .await;
    assert_eq!(
        chunks,
        vec![
            StreamChunk::content("Hel"),
            StreamChunk::content("lo"),
            StreamChunk::Finish {
                reason: FinishReason::Stop
            },
        ]
    );

    let sent = client.transport().last_request();
    assert_eq!(sent.body["stream"], true);
    assert_eq!(sent.header("accept"), Some("text/event-stream"));
}

#[tokio::test]
async fn streamed_chunks_collect_into_a_response() {
    let transport = TestTransport::new(200, json!({})).with_stream(&[
        "data: {\"choices\":[{\"delta\":{\"content\":\"4\"}}]}\n\n",
        "data: {\"choices\":[],\"usage\":{\"prompt_tokens\":2,\"completion_tokens\":1,\"total_tokens\":3}}\n\n",
    ]);
    let client = client(transport);
    let model = Model::parse("openai:gpt-4o-mini").unwrap();
    let out = client
        .stream_text(&model, "2+2?", options(json!({"streaming": true})))
        .await
        .unwrap();
    let resp = collect_stream_to_response(
        out.output,
        StreamCollectorConfig::default(),
        &model.name,
        &Context::default(),
    )
    .await
    .unwrap();
    assert_eq!(resp.text(), "4");
    assert_eq!(resp.usage.total_tokens, 3);
}

#[tokio::test]
async fn stream_error_status_reads_the_body() {
    let transport = TestTransport::new(503, json!({}))
        .with_stream(&["{\"error\":\"overloaded\"}"]);
    let client = client(transport);
    let model = Model::parse("openai:gpt-4o-mini").unwrap();
    let err = match client.stream_text(&model, "hi", OptionSet::new()).await {
        Ok(_) => panic!("stream call should fail"),
        Err(err) => err,
    };
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.raw_body(), Some("{\"error\":\"overloaded\"}"));
}

#[tokio::test]
async fn embed_orders_vectors() {
    let transport = TestTransport::new(
        200,
        json!({
            "data": [
                {"index": 1, "embedding": [0.0, 1.0]},
                {"index": 0, "embedding": [1.0, 0.0]}
            ],
            "usage": {"prompt_tokens": 2, "total_tokens": 2}
        }),
    );
    let client = client(transport);
    let model = Model::parse("openai:text-embedding-3-small").unwrap();
    let out = client
        .embed(
            &model,
            vec!["a".into(), "b".into()],
            options(json!({"provider_options": {"dimensions": 2}})),
        )
        .await
        .unwrap();
    assert_eq!(out.output.embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    let sent = client.transport().last_request();
    assert_eq!(sent.url, "https://api.openai.com/v1/embeddings");
    assert_eq!(sent.body["dimensions"], 2);
}

#[tokio::test]
async fn embed_reports_chat_only_options() {
    let transport = TestTransport::new(
        200,
        json!({"data": [{"index": 0, "embedding": [0.5]}]}),
    );
    let client = client(transport);
    let model = Model::parse("openai:text-embedding-3-small").unwrap();
    let out = client
        .embed(
            &model,
            vec!["a".into()],
            options(json!({"temperature": 0.5, "top_k": 3, "tools": [{"name": "f"}]})),
        )
        .await
        .unwrap();
    assert_eq!(out.warnings.len(), 3);
    assert!(out.warnings.iter().any(|w| w.contains("`temperature`")));
    let sent = client.transport().last_request();
    assert_eq!(
        sent.body,
        json!({"model": "text-embedding-3-small", "input": ["a"]})
    );
}

#[tokio::test]
async fn embed_with_error_policy_rejects_chat_only_options() {
    let client = client(TestTransport::new(200, json!({})));
    let model = Model::parse("openai:text-embedding-3-small").unwrap();
    let err = client
        .embed(
            &model,
            vec!["a".into()],
            options(json!({"temperature": 0.5, "on_unsupported": "error"})),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Validation(_)));
    assert!(err.to_string().contains("temperature"), "{err}");
    assert!(client.transport().last_request.lock().unwrap().is_none());
}

#[tokio::test]
async fn embedding_on_a_chat_only_provider_fails_fast() {
    let client = client(TestTransport::new(200, json!({})));
    let model = Model::parse("groq:llama-3.1-8b-instant").unwrap();
    let err = client
        .embed(&model, vec!["a".into()], OptionSet::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::InvalidParameter { .. }));
}
