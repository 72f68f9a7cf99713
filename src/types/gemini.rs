use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One text part of a content entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// A turn in the `contents` list; role is `user` or `model`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

/// Candidate returned by `generateContent`.
#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(default)]
    pub finishReason: Option<String>,
}

/// `generateContent` response payload. Only `candidates` is relied upon.
#[derive(Debug, Clone, Deserialize)]
#[allow(non_snake_case)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usageMetadata: Option<Value>,
    #[serde(default)]
    pub modelVersion: Option<String>,
    #[serde(default)]
    pub promptFeedback: Option<Value>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if any.
    pub fn reply_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }
}
