//! UI-agnostic conversation and result types
//!
//! Shared by the gateway, the panels, and the one-shot CLI. Nothing here depends on ratatui.

use serde::{Deserialize, Serialize};

/// A chat message in the assistant conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: ChatRole::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: ChatRole::Model, text: text.into() }
    }
}

/// The role of a chat message sender, named the way the Gemini API names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// Web source attached to a grounded answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub title: String,
}

/// Citation metadata returned by a search-grounded call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

/// A renderable source link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub label: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResult {
    pub text: String,
    pub chunks: Vec<GroundingChunk>,
}

impl SearchResult {
    /// Web citations in service order. Chunks without a web source are skipped and an empty
    /// title falls back to the URI.
    pub fn citations(&self) -> Vec<Citation> {
        self.chunks
            .iter()
            .filter_map(|chunk| chunk.web.as_ref())
            .map(|web| Citation {
                label: if web.title.is_empty() { web.uri.clone() } else { web.title.clone() },
                uri: web.uri.clone(),
            })
            .collect()
    }
}
