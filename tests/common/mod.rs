#![allow(dead_code)]

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

use codemaster::config::{GatewaySettings, DEFAULT_FAST_MODEL, DEFAULT_PRO_MODEL};
use codemaster::gateway::Gateway;

pub const TEST_API_KEY: &str = "test-api-key";

/// Mock Gemini `generateContent` endpoint
pub struct GeminiMockServer {
    server: MockServer,
}

impl GeminiMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn gateway(&self) -> Gateway {
        let settings = GatewaySettings::new(TEST_API_KEY).with_base_url(self.uri());
        Gateway::new(&settings).expect("gateway")
    }

    pub fn model_path(model: &str) -> String {
        format!("/models/{}:generateContent", model)
    }

    /// Successful text reply on the fast model, expected exactly `times` times
    pub async fn mock_fast_text(&self, text: &str, times: u64) {
        self.mock_text(DEFAULT_FAST_MODEL, text, times).await;
    }

    pub async fn mock_pro_text(&self, text: &str, times: u64) {
        self.mock_text(DEFAULT_PRO_MODEL, text, times).await;
    }

    pub async fn mock_text(&self, model: &str, text: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path(Self::model_path(model)))
            .and(header("x-goog-api-key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response(text)))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Same as `mock_fast_text`, but the reply is held back so a request stays in flight
    pub async fn mock_slow_fast_text(&self, text: &str, delay: Duration, times: u64) {
        Mock::given(method("POST"))
            .and(path(Self::model_path(DEFAULT_FAST_MODEL)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(text_response(text))
                    .set_delay(delay),
            )
            .expect(times)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_grounded(&self, text: &str, chunks: Value) {
        Mock::given(method("POST"))
            .and(path(Self::model_path(DEFAULT_FAST_MODEL)))
            .and(body_partial_json(json!({ "tools": [{ "googleSearch": {} }] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": text }] },
                    "groundingMetadata": { "groundingChunks": chunks }
                }]
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_status(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every request the server has seen, in arrival order
    pub async fn request_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|req| req.body_json::<Value>().expect("json body"))
            .collect()
    }

    pub async fn verify(&self) {
        self.server.verify().await;
    }
}

pub fn text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    })
}
