//! Integration tests for the gateway request flows.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use inference_gateway::api::create_router;
use inference_gateway::app::AppState;
use inference_gateway::domain::{
    CompletionResponse, DecodeResponse, EmbeddingResponse, EncodeResponse, MessageCipher,
    TokenCountResponse, TraceIngestResponse,
};
use inference_gateway::infra::{RouteToggles, RsaMessageCipher};
use inference_gateway::test_utils::{MockEngineClient, keys::write_key_pair, test_state};

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_root_greeting_body() {
    let router = create_router(test_state(), &RouteToggles::all_enabled());

    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], &b"<h1>hello world</h1>"[..]);
}

#[tokio::test]
async fn test_completion_flow() {
    let router = create_router(test_state(), &RouteToggles::all_enabled());

    let response = router
        .oneshot(post_json(
            "/inference/completions",
            serde_json::json!({"prompt": "Once upon a time", "max_tokens": 8}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let completion: CompletionResponse = body_json(response).await;
    assert_eq!(completion.text, "echo: Once upon a time");
    assert_eq!(completion.usage.prompt_tokens, 4);
}

#[tokio::test]
async fn test_embedding_flow() {
    let router = create_router(test_state(), &RouteToggles::all_enabled());

    let response = router
        .oneshot(post_json(
            "/embedding",
            serde_json::json!({"input": "hello world"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let embedding: EmbeddingResponse = body_json(response).await;
    assert_eq!(embedding.dimension, embedding.embedding.len());
}

#[tokio::test]
async fn test_embedding_dataset_flow() {
    let router = create_router(test_state(), &RouteToggles::all_enabled());

    let response = router
        .oneshot(post_json(
            "/embedding/dataset",
            serde_json::json!({
                "name": "corpus",
                "rows": [
                    {"id": "a", "text": "first row"},
                    {"text": "second row"}
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let summary: serde_json::Value = body_json(response).await;
    assert_eq!(summary["rows"], 2);
    assert_eq!(summary["name"], "corpus");
}

#[tokio::test]
async fn test_token_count_flow() {
    let router = create_router(test_state(), &RouteToggles::all_enabled());

    let response = router
        .oneshot(post_json(
            "/token/count",
            serde_json::json!({"input": "one two three four"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let count: TokenCountResponse = body_json(response).await;
    assert_eq!(count.count, 4);
}

#[tokio::test]
async fn test_encoder_decoder_flow() {
    let router = create_router(test_state(), &RouteToggles::all_enabled());

    let response = router
        .clone()
        .oneshot(post_json(
            "/encoder",
            serde_json::json!({"input": "alpha beta"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let encoded: EncodeResponse = body_json(response).await;
    assert_eq!(encoded.tokens.len(), 2);

    let response = router
        .oneshot(post_json(
            "/decoder",
            serde_json::json!({"tokens": encoded.tokens}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let decoded: DecodeResponse = body_json(response).await;
    assert!(!decoded.text.is_empty());
}

#[tokio::test]
async fn test_tracing_ingest_flow() {
    let router = create_router(test_state(), &RouteToggles::all_enabled());

    let response = router
        .oneshot(post_json(
            "/tracing",
            serde_json::json!({
                "events": [
                    {"name": "prompt_sent"},
                    {"name": "response_received", "attributes": {"latency_ms": 42}}
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let ack: TraceIngestResponse = body_json(response).await;
    assert_eq!(ack.accepted, 2);
}

#[tokio::test]
async fn test_disabled_route_returns_not_found_without_invoking_handler() {
    let engine = Arc::new(MockEngineClient::new());
    let state = Arc::new(AppState::new(
        engine.clone(),
        Arc::new(inference_gateway::test_utils::MockCipher::new()),
    ));

    // Only the token module is enabled.
    let toggles = RouteToggles::from_spec("token.count").unwrap();
    let router = create_router(state, &toggles);

    let response = router
        .clone()
        .oneshot(post_json(
            "/embedding",
            serde_json::json!({"input": "hello"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(engine.embed_calls().is_empty());

    let response = router
        .oneshot(post_json(
            "/inference/completions",
            serde_json::json!({"prompt": "hello"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(engine.complete_calls().is_empty());
}

#[tokio::test]
async fn test_sealed_input_flow_with_real_cipher() {
    let dir = tempfile::tempdir().unwrap();
    write_key_pair(dir.path(), 1024);
    let cipher = Arc::new(RsaMessageCipher::new(dir.path()));

    let engine = Arc::new(MockEngineClient::new());
    let state = Arc::new(AppState::new(engine.clone(), cipher.clone()));
    let router = create_router(state, &RouteToggles::all_enabled());

    let sealed = cipher.seal("secret prompt").unwrap();
    let response = router
        .oneshot(post_json(
            "/embedding",
            serde_json::json!({"sealed_input": sealed}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The engine saw the recovered plaintext, never the envelope.
    assert_eq!(engine.embed_calls(), vec!["secret prompt".to_string()]);
}

#[tokio::test]
async fn test_bad_envelope_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_key_pair(dir.path(), 1024);
    let cipher = Arc::new(RsaMessageCipher::new(dir.path()));

    let engine = Arc::new(MockEngineClient::new());
    let state = Arc::new(AppState::new(engine.clone(), cipher));
    let router = create_router(state, &RouteToggles::all_enabled());

    let response = router
        .oneshot(post_json(
            "/embedding",
            serde_json::json!({"sealed_input": "%%% not base64 %%%"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(engine.embed_calls().is_empty());
}

#[tokio::test]
async fn test_both_input_variants_is_bad_request() {
    let router = create_router(test_state(), &RouteToggles::all_enabled());

    let response = router
        .oneshot(post_json(
            "/embedding",
            serde_json::json!({"input": "a", "sealed_input": "b"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_engine_failure_maps_to_bad_gateway() {
    let engine = Arc::new(MockEngineClient::failing("engine down"));
    let state = Arc::new(AppState::new(
        engine,
        Arc::new(inference_gateway::test_utils::MockCipher::new()),
    ));
    let router = create_router(state, &RouteToggles::all_enabled());

    let response = router
        .oneshot(post_json(
            "/inference/completions",
            serde_json::json!({"prompt": "hello"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_readiness_reflects_engine_health() {
    let unhealthy = Arc::new(AppState::new(
        Arc::new(MockEngineClient::failing("down")),
        Arc::new(inference_gateway::test_utils::MockCipher::new()),
    ));
    let router = create_router(unhealthy, &RouteToggles::all_enabled());

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
