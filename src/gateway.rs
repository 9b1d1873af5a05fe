//! Named model operations
//!
//! Each operation is exactly one `generateContent` round trip with a fixed model tier and
//! request shape. Nothing is retried and no state is kept between calls beyond the client.

use std::time::Duration;

use tracing::info;

use crate::ai::gemini::{GeminiContent, GeminiPart, GenerateRequest};
use crate::ai::GeminiClient;
use crate::config::GatewaySettings;
use crate::error::GatewayError;
use crate::image::ImageUpload;
use crate::state::{ChatMessage, SearchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Low latency model for everyday requests
    Fast,
    /// High-capability model for reasoning-heavy requests
    Pro,
}

#[derive(Clone)]
pub struct Gateway {
    client: GeminiClient,
    fast_model: String,
    pro_model: String,
    thinking_budget: u32,
}

impl Gateway {
    pub fn new(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        let client = GeminiClient::new(
            &settings.base_url,
            &settings.api_key,
            Duration::from_secs(settings.timeout_secs),
        )?;

        Ok(Self {
            client,
            fast_model: settings.fast_model.clone(),
            pro_model: settings.pro_model.clone(),
            thinking_budget: settings.thinking_budget,
        })
    }

    pub fn model(&self, tier: Tier) -> &str {
        match tier {
            Tier::Fast => &self.fast_model,
            Tier::Pro => &self.pro_model,
        }
    }

    /// One chat turn. `history` goes out in order, followed by `message` as the newest user turn.
    pub async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String, GatewayError> {
        let mut contents: Vec<GeminiContent> = history
            .iter()
            .map(|msg| GeminiContent {
                role: msg.role.as_str().to_string(),
                parts: vec![GeminiPart::text(&msg.text)],
            })
            .collect();
        contents.push(GeminiContent::user_text(message));

        info!(turns = contents.len(), "chat turn");
        self.text(Tier::Fast, GenerateRequest::new(contents)).await
    }

    pub async fn analyze_image(
        &self,
        prompt: &str,
        image: &ImageUpload,
    ) -> Result<String, GatewayError> {
        let contents = vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![
                GeminiPart::inline_data(&image.mime_type, &image.data_base64),
                GeminiPart::text(prompt),
            ],
        }];

        info!(mime = %image.mime_type, bytes = image.size, "image analysis");
        self.text(Tier::Fast, GenerateRequest::new(contents)).await
    }

    pub async fn grounded_search(&self, prompt: &str) -> Result<SearchResult, GatewayError> {
        let request =
            GenerateRequest::new(vec![GeminiContent::user_text(prompt)]).with_google_search();

        info!("grounded search");
        let generation = self.client.generate(self.model(Tier::Fast), &request).await?;
        Ok(SearchResult {
            text: generation.text,
            chunks: generation.chunks,
        })
    }

    pub async fn complex_query(&self, prompt: &str) -> Result<String, GatewayError> {
        let request = GenerateRequest::new(vec![GeminiContent::user_text(prompt)])
            .with_thinking_budget(self.thinking_budget);

        info!(budget = self.thinking_budget, "complex query");
        self.text(Tier::Pro, request).await
    }

    pub async fn explain_code(&self, code: &str) -> Result<String, GatewayError> {
        info!("explain code");
        self.prompt(Tier::Fast, &explain_prompt(code)).await
    }

    pub async fn refactor_code(&self, code: &str) -> Result<String, GatewayError> {
        info!("refactor code");
        self.prompt(Tier::Pro, &refactor_prompt(code)).await
    }

    async fn prompt(&self, tier: Tier, prompt: &str) -> Result<String, GatewayError> {
        self.text(tier, GenerateRequest::new(vec![GeminiContent::user_text(prompt)]))
            .await
    }

    async fn text(&self, tier: Tier, request: GenerateRequest) -> Result<String, GatewayError> {
        let generation = self.client.generate(self.model(tier), &request).await?;
        Ok(generation.text)
    }
}

pub fn explain_prompt(code: &str) -> String {
    format!(
        "Explain the following code snippet. Provide a clear, concise explanation suitable for a developer learning this concept. Use markdown for formatting.\n\n```\n{}\n```",
        code
    )
}

pub fn refactor_prompt(code: &str) -> String {
    format!(
        "Refactor the following code for better performance, readability, and adherence to best practices. Return only the refactored code block in markdown format.\n\n```\n{}\n```",
        code
    )
}
