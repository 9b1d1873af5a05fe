use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GatewayError;
use crate::state::GroundingChunk;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GeminiContent {
    pub role: String,
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    pub fn user_text(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![GeminiPart::text(text)],
        }
    }
}

/// A request part is either text or inline binary data
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum GeminiPart {
    Text { text: String },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiBlob,
    },
}

impl GeminiPart {
    pub fn text(text: &str) -> Self {
        GeminiPart::Text { text: text.to_string() }
    }

    pub fn inline_data(mime_type: &str, data_base64: &str) -> Self {
        GeminiPart::InlineData {
            inline_data: GeminiBlob {
                mime_type: mime_type.to_string(),
                data: data_base64.to_string(),
            },
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GeminiBlob {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GeminiTool {
    #[serde(rename = "googleSearch")]
    pub google_search: GoogleSearch,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct GoogleSearch {}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    #[serde(rename = "thinkingConfig")]
    pub thinking_config: ThinkingConfig,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ThinkingConfig {
    #[serde(rename = "thinkingBudget")]
    pub thinking_budget: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<GeminiTool>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
    pub fn new(contents: Vec<GeminiContent>) -> Self {
        Self {
            contents,
            tools: None,
            generation_config: None,
        }
    }

    pub fn with_google_search(mut self) -> Self {
        self.tools = Some(vec![GeminiTool { google_search: GoogleSearch {} }]);
        self
    }

    pub fn with_thinking_budget(mut self, thinking_budget: u32) -> Self {
        self.generation_config = Some(GenerationConfig {
            thinking_config: ThinkingConfig { thinking_budget },
        });
        self
    }
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    error: Option<GeminiErrorBody>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize, Debug)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

impl GeminiResponseContent {
    /// Joined text parts, without thought summaries
    fn into_text(self) -> String {
        self.parts
            .into_iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text)
            .collect()
    }
}

#[derive(Deserialize, Debug)]
struct GeminiResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize, Debug)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize, Debug)]
struct GeminiErrorBody {
    message: String,
}

/// Text and citations from the first candidate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Generation {
    pub text: String,
    pub chunks: Vec<GroundingChunk>,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<Generation, GatewayError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!(model, turns = request.contents.len(), "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        let gemini_response: GenerateResponse = response.json().await?;
        if let Some(error) = gemini_response.error {
            return Err(GatewayError::Service(error.message));
        }

        let candidate = gemini_response
            .candidates
            .into_iter()
            .next()
            .ok_or(GatewayError::EmptyResponse)?;

        let text = candidate
            .content
            .map(GeminiResponseContent::into_text)
            .unwrap_or_default();

        let chunks = candidate
            .grounding_metadata
            .map(|metadata| metadata.grounding_chunks)
            .unwrap_or_default();

        debug!(model, chars = text.len(), sources = chunks.len(), "generateContent finished");
        Ok(Generation { text, chunks })
    }
}
