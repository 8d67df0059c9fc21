//! Integration tests against a mocked Upstage API

use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use upstage_solar::catalog::{ModelCatalog, FALLBACK_MODELS};
use upstage_solar::chat::{ChatClient, ChatMessage, ChatModel, ChatOptions};
use upstage_solar::config::{ChatConfig, EmbeddingConfig, ProviderConfig, RetryConfig};
use upstage_solar::embedding::{EmbeddingClient, EmbeddingProvider};
use upstage_solar::error::{ProviderError, SolarError, ValidationError};
use upstage_solar::nodes::{EmbeddingsInput, EmbeddingsNode, EmbeddingsParams, ExecutionMode, NodeItem};
use upstage_solar::provider::ProviderClient;
use upstage_solar::retry::RetryPolicy;

const API_KEY: &str = "test-key";

fn provider(server: &ServerGuard) -> ProviderClient {
    ProviderClient::new(ProviderConfig {
        base_url: server.url(),
        timeout_secs: 5,
        ..ProviderConfig::with_api_key(API_KEY)
    })
    .unwrap()
}

fn embeddings(server: &ServerGuard, batch_size: usize) -> EmbeddingClient {
    EmbeddingClient::new(
        provider(server),
        EmbeddingConfig {
            batch_size,
            ..EmbeddingConfig::default()
        },
    )
    .unwrap()
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(&RetryConfig {
        max_retries: 3,
        base_delay_ms: 1,
        max_delay_ms: 5,
    })
}

/// Embeddings response whose item `i` has vector `[i]`, listed in `order`
fn embedding_body(order: &[usize]) -> String {
    let data: Vec<Value> = order
        .iter()
        .map(|&i| json!({ "object": "embedding", "index": i, "embedding": [i as f32] }))
        .collect();
    json!({
        "object": "list",
        "model": "embedding-query",
        "data": data,
        "usage": { "prompt_tokens": order.len(), "total_tokens": order.len() }
    })
    .to_string()
}

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_single_text_is_sent_as_bare_string_with_bearer_auth() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::Json(json!({ "model": "embedding-query", "input": "hello world" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(embedding_body(&[0]))
        .create_async()
        .await;

    let client = embeddings(&server, 100);
    let vector = client.embed_one("hello\n\n  world").await.unwrap();

    assert_eq!(vector, vec![0.0]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_out_of_order_items_are_reassembled() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .match_body(Matcher::Json(json!({ "model": "embedding-query", "input": ["a", "b", "c"] })))
        .with_status(200)
        .with_body(embedding_body(&[2, 0, 1]))
        .create_async()
        .await;

    let client = embeddings(&server, 100);
    let output = client.embed_many_with_usage(&texts(&["a", "b", "c"])).await.unwrap();

    assert_eq!(output.embeddings, vec![vec![0.0], vec![1.0], vec![2.0]]);
    assert_eq!(output.usage.total_tokens, 3);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_batches_preserve_global_order() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("POST", "/embeddings")
        .match_body(Matcher::PartialJson(json!({ "input": ["t0", "t1"] })))
        .with_status(200)
        .with_body(embedding_body(&[1, 0]))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("POST", "/embeddings")
        .match_body(Matcher::PartialJson(json!({ "input": ["t2", "t3"] })))
        .with_status(200)
        .with_body(
            json!({ "data": [
                { "index": 0, "embedding": [2.0] },
                { "index": 1, "embedding": [3.0] }
            ] })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let third = server
        .mock("POST", "/embeddings")
        .match_body(Matcher::PartialJson(json!({ "input": "t4" })))
        .with_status(200)
        .with_body(json!({ "data": [{ "index": 0, "embedding": [4.0] }] }).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = embeddings(&server, 2);
    let vectors = client
        .embed_many(&texts(&["t0", "t1", "t2", "t3", "t4"]))
        .await
        .unwrap();

    assert_eq!(vectors, vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0], vec![4.0]]);
    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[tokio::test]
async fn test_result_is_independent_of_batch_size() {
    let inputs = texts(&["t0", "t1", "t2", "t3", "t4"]);
    let expected: Vec<Vec<f32>> = (0..inputs.len()).map(|i| vec![i as f32]).collect();
    let positions: Vec<usize> = (0..inputs.len()).collect();

    for batch_size in [1, 2, 3, 5] {
        let mut server = Server::new_async().await;
        let mut mocks = Vec::new();

        for batch in positions.chunks(batch_size) {
            let input = if batch.len() == 1 {
                json!(inputs[batch[0]])
            } else {
                json!(batch.iter().map(|&i| inputs[i].as_str()).collect::<Vec<_>>())
            };
            // items come back in reverse order, carrying the global position as the vector
            let data: Vec<Value> = batch
                .iter()
                .enumerate()
                .rev()
                .map(|(local, &global)| json!({ "index": local, "embedding": [global as f32] }))
                .collect();

            let mock = server
                .mock("POST", "/embeddings")
                .match_body(Matcher::Json(json!({ "model": "embedding-query", "input": input })))
                .with_status(200)
                .with_body(json!({ "data": data }).to_string())
                .expect(1)
                .create_async()
                .await;
            mocks.push(mock);
        }

        let vectors = embeddings(&server, batch_size).embed_many(&inputs).await.unwrap();

        assert_eq!(vectors, expected, "batch size {}", batch_size);
        assert_eq!(mocks.len(), inputs.len().div_ceil(batch_size));
        for mock in &mocks {
            mock.assert_async().await;
        }
    }
}

#[tokio::test]
async fn test_embed_one_matches_embed_many_of_one() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .match_body(Matcher::Json(json!({ "model": "embedding-query", "input": "same" })))
        .with_status(200)
        .with_body(json!({ "data": [{ "index": 0, "embedding": [0.1, 0.2, 0.3] }] }).to_string())
        .expect(2)
        .create_async()
        .await;

    let client = embeddings(&server, 100);
    let one = client.embed_one("same").await.unwrap();
    let many = client.embed_many(&texts(&["same"])).await.unwrap();

    assert_eq!(one, many[0]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_adapter_batch_limit() {
    let mut server = Server::new_async().await;
    let order: Vec<usize> = (0..100).collect();
    let mock = server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_body(embedding_body(&order))
        .expect(1)
        .create_async()
        .await;

    let client = embeddings(&server, 100);

    let hundred: Vec<String> = (0..100).map(|i| format!("text {}", i)).collect();
    let (vectors, _) = client.request_batch(&hundred).await.unwrap();
    assert_eq!(vectors.len(), 100);
    assert_eq!(vectors[99], vec![99.0]);

    let too_many: Vec<String> = (0..101).map(|i| format!("text {}", i)).collect();
    let err = client.request_batch(&too_many).await.unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Validation(ValidationError::BatchTooLarge { size: 101, max_size: 100 })
    ));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_count_mismatch_is_protocol_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_body(embedding_body(&[0]))
        .create_async()
        .await;

    let client = embeddings(&server, 100);
    let err = client.embed_many(&texts(&["a", "b"])).await.unwrap_err();

    assert!(matches!(err, SolarError::Embedding(ProviderError::Protocol(_))));
    assert!(err.to_string().starts_with("Failed to generate embeddings:"));
}

#[tokio::test]
async fn test_missing_data_array_is_protocol_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/embeddings")
        .with_status(200)
        .with_body(r#"{"result": []}"#)
        .create_async()
        .await;

    let err = embeddings(&server, 100).embed_one("a").await.unwrap_err();
    assert!(matches!(err, SolarError::Embedding(ProviderError::Protocol(_))));
}

#[tokio::test]
async fn test_error_status_carries_status_and_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/embeddings")
        .with_status(401)
        .with_body(r#"{"error":{"message":"invalid api key"}}"#)
        .create_async()
        .await;

    let err = embeddings(&server, 100).embed_one("a").await.unwrap_err();
    match err {
        SolarError::Embedding(ProviderError::Api { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid api key"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_catalog_ranks_and_filters() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/models")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_body(
            json!({ "data": [
                { "id": "solar-pro-240101" },
                { "id": "embedding-query" },
                { "id": "solar-pro2-250601" },
                { "id": "solar-mini-250101" },
                { "id": "solar-pro2-250601" }
            ] })
            .to_string(),
        )
        .create_async()
        .await;

    let catalog = ModelCatalog::new(provider(&server));

    let ids: Vec<String> = catalog.fetch().await.unwrap().into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec!["solar-pro2-250601", "solar-mini-250101", "solar-pro-240101"]);

    assert_eq!(catalog.resolve(None).await, "solar-pro2-250601");
    assert_eq!(catalog.resolve(Some("solar-mini")).await, "solar-mini");
}

#[tokio::test]
async fn test_catalog_falls_back_when_listing_fails() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let catalog = ModelCatalog::new(provider(&server));

    assert_eq!(catalog.resolve(None).await, FALLBACK_MODELS[0]);
    let options = catalog.options().await;
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].value, "solar-mini");
}

#[tokio::test]
async fn test_credential_check() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/models")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .create_async()
        .await;

    assert!(provider(&server).test_credential().await.ok);

    let rejected = ProviderClient::new(ProviderConfig {
        base_url: server.url(),
        ..ProviderConfig::with_api_key("")
    })
    .unwrap()
    .test_credential()
    .await;
    assert!(!rejected.ok);
}

fn chat_client(server: &ServerGuard) -> ChatClient {
    ChatClient::new(provider(server), "solar-pro2", ChatConfig::default(), fast_retry())
}

fn chat_body() -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_720_000_000,
        "model": "solar-pro2-250710",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": "Hi there" }, "finish_reason": "stop" }],
        "usage": { "prompt_tokens": 8, "completion_tokens": 3, "total_tokens": 11 }
    })
    .to_string()
}

#[tokio::test]
async fn test_chat_completion_request_and_response() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::Json(json!({
            "model": "solar-pro2",
            "messages": [{ "role": "user", "content": "Hello" }],
            "temperature": 0.5
        })))
        .with_status(200)
        .with_body(chat_body())
        .create_async()
        .await;

    let options = ChatOptions {
        temperature: Some(0.5),
        ..ChatOptions::default()
    };
    let completion = chat_client(&server)
        .complete(&[ChatMessage::user("Hello")], &options)
        .await
        .unwrap();

    assert_eq!(completion.content, "Hi there");
    assert_eq!(completion.usage.total_tokens, 11);
    assert_eq!(completion.model.as_deref(), Some("solar-pro2-250710"));
    assert_eq!(completion.created, Some(1_720_000_000));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_chat_retries_transient_failures() {
    let mut server = Server::new_async().await;
    let unavailable = server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body("busy")
        .expect(1)
        .create_async()
        .await;
    let ok = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(chat_body())
        .expect(1)
        .create_async()
        .await;

    let completion = chat_client(&server).prompt("Hello").await.unwrap();

    assert_eq!(completion.content, "Hi there");
    unavailable.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn test_chat_does_not_retry_client_errors() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(400)
        .with_body("bad request")
        .expect(1)
        .create_async()
        .await;

    let err = chat_client(&server).prompt("Hello").await.unwrap_err();

    assert!(matches!(err, SolarError::Chat(ProviderError::Api { status: 400, .. })));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_chat_streaming_is_aggregated() {
    let mut server = Server::new_async().await;
    let stream = [
        r#"data: {"id":"c1","model":"solar-pro2","created":1,"choices":[{"index":0,"delta":{"role":"assistant","content":"Hi"}}]}"#,
        r#"data: {"id":"c1","choices":[{"index":0,"delta":{"content":" there"},"finish_reason":"stop"}]}"#,
        r#"data: {"id":"c1","choices":[],"usage":{"prompt_tokens":8,"completion_tokens":2,"total_tokens":10}}"#,
        "data: [DONE]",
    ]
    .join("\n\n");

    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({ "stream": true })))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(stream)
        .create_async()
        .await;

    let options = ChatOptions {
        stream: true,
        ..ChatOptions::default()
    };
    let completion = chat_client(&server)
        .complete(&[ChatMessage::user("Hello")], &options)
        .await
        .unwrap();

    assert_eq!(completion.content, "Hi there");
    assert_eq!(completion.usage.total_tokens, 10);
}

#[tokio::test]
async fn test_embeddings_node_continue_on_fail() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/embeddings")
        .match_body(Matcher::PartialJson(json!({ "input": ["first", "second"] })))
        .with_status(200)
        .with_body(embedding_body(&[0, 1]))
        .create_async()
        .await;
    server
        .mock("POST", "/embeddings")
        .match_body(Matcher::PartialJson(json!({ "input": "from item" })))
        .with_status(200)
        .with_body(embedding_body(&[0]))
        .create_async()
        .await;

    let node = EmbeddingsNode::new(provider(&server), EmbeddingConfig::default());
    let items = vec![
        NodeItem::new(
            json!({}),
            EmbeddingsParams {
                input: EmbeddingsInput::Multiple("first\n\nsecond\n".to_string()),
                show_usage: true,
                ..EmbeddingsParams::default()
            },
        ),
        NodeItem::new(
            json!({}),
            EmbeddingsParams {
                input: EmbeddingsInput::Multiple("\n  \n".to_string()),
                ..EmbeddingsParams::default()
            },
        ),
        NodeItem::new(
            json!({ "body": "from item" }),
            EmbeddingsParams {
                input_field: Some("body".to_string()),
                ..EmbeddingsParams::default()
            },
        ),
    ];

    let outputs = node.execute(&items, ExecutionMode::ContinueOnFail).await.unwrap();

    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[0].json["count"], 2);
    assert_eq!(outputs[0].json["embeddings"][1]["text"], "second");
    assert_eq!(outputs[0].json["usage"]["total_tokens"], 2);
    assert!(outputs[1].is_error());
    assert_eq!(outputs[1].paired_item, 1);
    assert_eq!(outputs[2].json["text"], "from item");
    assert_eq!(outputs[2].json["dimension"], 1);

    let err = node.execute(&items, ExecutionMode::FailFast).await.unwrap_err();
    assert!(matches!(
        err,
        SolarError::Embedding(ProviderError::Validation(ValidationError::EmptyInput))
    ));
}
