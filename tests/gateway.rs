mod common;

use serde_json::json;

use codemaster::config::{DEFAULT_FAST_MODEL, DEFAULT_PRO_MODEL, DEFAULT_THINKING_BUDGET};
use codemaster::error::GatewayError;
use codemaster::image::ImageUpload;
use codemaster::state::{ChatMessage, Citation};

use common::GeminiMockServer;

#[tokio::test]
async fn test_chat_sends_history_then_message() {
    let server = GeminiMockServer::new().await;
    server.mock_fast_text("Use useMemo for that.", 1).await;
    let gateway = server.gateway();

    let history = vec![
        ChatMessage::model("Hello! I am your AI coding assistant. Ask me anything about your code."),
        ChatMessage::user("What is a hook?"),
        ChatMessage::model("A function that starts with use."),
    ];
    let reply = gateway.chat(&history, "How do I memoize?").await.unwrap();
    assert_eq!(reply, "Use useMemo for that.");

    let bodies = server.request_bodies().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({
            "contents": [
                { "role": "model", "parts": [{ "text": "Hello! I am your AI coding assistant. Ask me anything about your code." }] },
                { "role": "user", "parts": [{ "text": "What is a hook?" }] },
                { "role": "model", "parts": [{ "text": "A function that starts with use." }] },
                { "role": "user", "parts": [{ "text": "How do I memoize?" }] }
            ]
        })
    );
    server.verify().await;
}

#[tokio::test]
async fn test_grounded_search_returns_chunks() {
    let server = GeminiMockServer::new().await;
    server
        .mock_grounded(
            "ES2024 adds Object.groupBy.",
            json!([
                { "web": { "uri": "https://x", "title": "X" } },
                { "retrievedContext": { "uri": "gs://bucket/doc" } },
                { "web": { "uri": "https://y", "title": "" } }
            ]),
        )
        .await;

    let result = server
        .gateway()
        .grounded_search("What are the latest features in ECMAScript?")
        .await
        .unwrap();

    assert_eq!(result.text, "ES2024 adds Object.groupBy.");
    assert_eq!(result.chunks.len(), 3);
    assert_eq!(
        result.citations(),
        vec![
            Citation { label: "X".to_string(), uri: "https://x".to_string() },
            Citation { label: "https://y".to_string(), uri: "https://y".to_string() },
        ]
    );
    server.verify().await;
}

#[tokio::test]
async fn test_complex_query_uses_pro_model_and_thinking_budget() {
    let server = GeminiMockServer::new().await;
    server.mock_pro_text("Start with bounded contexts.", 1).await;

    let reply = server
        .gateway()
        .complex_query("Design a scalable microservices architecture")
        .await
        .unwrap();
    assert_eq!(reply, "Start with bounded contexts.");

    let bodies = server.request_bodies().await;
    assert_eq!(
        bodies[0]["generationConfig"]["thinkingConfig"]["thinkingBudget"],
        json!(DEFAULT_THINKING_BUDGET)
    );
    assert!(bodies[0].get("tools").is_none());
    server.verify().await;
}

#[tokio::test]
async fn test_code_operations_pick_their_tier() {
    let server = GeminiMockServer::new().await;
    server.mock_text(DEFAULT_FAST_MODEL, "It counts clicks.", 1).await;
    server.mock_text(DEFAULT_PRO_MODEL, "```js\nconst x = 1;\n```", 1).await;
    let gateway = server.gateway();

    assert_eq!(gateway.explain_code("let x = 1;").await.unwrap(), "It counts clicks.");
    assert_eq!(
        gateway.refactor_code("var x = 1;").await.unwrap(),
        "```js\nconst x = 1;\n```"
    );

    let bodies = server.request_bodies().await;
    let explain_prompt = bodies[0]["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(explain_prompt.contains("let x = 1;"));
    server.verify().await;
}

#[tokio::test]
async fn test_analyze_image_sends_inline_data_then_prompt() {
    let server = GeminiMockServer::new().await;
    server.mock_fast_text("A layered architecture diagram.", 1).await;

    let upload = ImageUpload::from_bytes("diagram.png", "image/png", b"\x89PNG").unwrap();
    let reply = server
        .gateway()
        .analyze_image("Explain this architecture diagram", &upload)
        .await
        .unwrap();
    assert_eq!(reply, "A layered architecture diagram.");

    let bodies = server.request_bodies().await;
    assert_eq!(
        bodies[0]["contents"][0]["parts"],
        json!([
            { "inlineData": { "mimeType": "image/png", "data": "iVBORw==" } },
            { "text": "Explain this architecture diagram" }
        ])
    );
    server.verify().await;
}

#[tokio::test]
async fn test_thought_parts_are_not_part_of_the_reply() {
    let server = GeminiMockServer::new().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "weighing options...", "thought": true },
                        { "text": "Use a queue." }
                    ]
                }
            }]
        })))
        .mount(server.inner())
        .await;

    let reply = server.gateway().complex_query("How to decouple?").await.unwrap();
    assert_eq!(reply, "Use a queue.");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = GeminiMockServer::new().await;
    server.mock_status(429, "quota exceeded").await;

    let err = server.gateway().chat(&[], "hi").await.unwrap_err();
    match err {
        GatewayError::Status { status, body } => {
            assert_eq!(status.as_u16(), 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_candidates_is_an_error() {
    let server = GeminiMockServer::new().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(server.inner())
        .await;

    let err = server.gateway().explain_code("x").await.unwrap_err();
    assert!(matches!(err, GatewayError::EmptyResponse));
}
