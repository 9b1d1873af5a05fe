mod common;

use std::time::Duration;

use serde_json::json;

use codemaster::app::App;
use codemaster::courses;
use codemaster::panel::PanelStatus;
use codemaster::panels::chat::{CHAT_FALLBACK, GREETING};
use codemaster::panels::EditorAction;
use codemaster::state::{ChatRole, Citation};
use codemaster::tool::Tool;

use common::GeminiMockServer;

#[tokio::test]
async fn test_research_assistant_shows_answer_and_citation() {
    let server = GeminiMockServer::new().await;
    server
        .mock_grounded(
            "ES2024 adds Array grouping and Promise.withResolvers.",
            json!([{ "web": { "uri": "https://x", "title": "X" } }]),
        )
        .await;

    let mut app = App::new(server.gateway(), "React Hooks");
    app.select_tool("Research Assistant".parse::<Tool>().unwrap());
    app.search.input.set("What are the latest features in ECMAScript?");
    assert!(app.submit_active_tool());
    assert!(app.is_tool_loading(Tool::Search));

    app.search.request.wait().await;

    let result = app.search.request.result().expect("search result");
    assert_eq!(result.text, "ES2024 adds Array grouping and Promise.withResolvers.");
    assert_eq!(
        result.citations(),
        vec![Citation { label: "X".to_string(), uri: "https://x".to_string() }]
    );
    server.verify().await;
}

#[tokio::test]
async fn test_switching_course_replaces_code_and_clears_response() {
    let server = GeminiMockServer::new().await;
    server.mock_fast_text("This hook tracks a counter.", 1).await;

    let mut app = App::new(server.gateway(), "React Hooks");
    assert!(app.run_editor(EditorAction::Explain));
    app.editor.request.wait().await;
    assert_eq!(
        app.editor.request.status(),
        &PanelStatus::Ready("This hook tracks a counter.".to_string())
    );

    app.select_course("CSS Grid Mastery");
    assert_eq!(app.editor.course(), "CSS Grid Mastery");
    assert_eq!(app.editor.code.value(), courses::sample_for("CSS Grid Mastery"));
    assert_eq!(app.editor.request.status(), &PanelStatus::Idle);
    server.verify().await;
}

#[tokio::test]
async fn test_chat_failure_appends_fallback() {
    let server = GeminiMockServer::new().await;
    server.mock_status(500, "internal").await;

    let mut app = App::new(server.gateway(), "React Hooks");
    app.chat.input.set("Why does my effect run twice?");
    assert!(app.submit_active_tool());
    app.chat.wait().await;

    let messages = app.chat.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].text, GREETING);
    assert_eq!(messages[1].role, ChatRole::User);
    assert_eq!(messages[1].text, "Why does my effect run twice?");
    assert_eq!(messages[2].role, ChatRole::Model);
    assert_eq!(messages[2].text, CHAT_FALLBACK);
    assert!(!app.chat.is_loading());
}

#[tokio::test]
async fn test_second_submit_while_awaiting_makes_no_call() {
    let server = GeminiMockServer::new().await;
    server
        .mock_slow_fast_text("Deep answer.", Duration::from_millis(300), 1)
        .await;

    let mut app = App::new(server.gateway(), "React Hooks");
    app.select_tool(Tool::Search);
    app.search.input.set("What is new in Node 22?");

    assert!(app.submit_active_tool());
    assert!(!app.submit_active_tool());
    assert!(!app.submit_active_tool());

    app.search.request.wait().await;
    assert_eq!(
        app.search.request.result().map(|r| r.text.as_str()),
        Some("Deep answer.")
    );
    server.verify().await;
}

#[tokio::test]
async fn test_tool_switch_keeps_request_alive() {
    let server = GeminiMockServer::new().await;
    server
        .mock_slow_fast_text("Still arrives.", Duration::from_millis(200), 1)
        .await;

    let mut app = App::new(server.gateway(), "React Hooks");
    app.chat.input.set("hello");
    assert!(app.submit_active_tool());

    app.select_tool(Tool::Thinking);
    app.select_tool(Tool::Chat);
    app.chat.wait().await;

    let last = app.chat.messages().last().expect("reply");
    assert_eq!(last.role, ChatRole::Model);
    assert_eq!(last.text, "Still arrives.");
    server.verify().await;
}

#[tokio::test]
async fn test_chat_history_grows_across_turns() {
    let server = GeminiMockServer::new().await;
    server.mock_fast_text("Sure.", 2).await;

    let mut app = App::new(server.gateway(), "React Hooks");
    for prompt in ["first", "second"] {
        app.chat.input.set(prompt);
        assert!(app.submit_active_tool());
        app.chat.wait().await;
    }

    let bodies = server.request_bodies().await;
    assert_eq!(bodies[0]["contents"].as_array().unwrap().len(), 2);
    assert_eq!(bodies[1]["contents"].as_array().unwrap().len(), 4);
    assert_eq!(bodies[1]["contents"][3]["parts"][0]["text"], "second");
    server.verify().await;
}
