use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum InsightsError {
    #[error("{0} not configured")]
    MissingConfig(&'static str),

    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid service account credential: {0}")]
    InvalidCredential(String),

    #[error("Malformed private key: {0}")]
    MalformedKey(String),

    #[error("Private key is not valid base64: {0}")]
    KeyEncoding(#[from] base64::DecodeError),

    #[error("JWT signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Token exchange failed with status {status}: {body}")]
    TokenExchange { status: StatusCode, body: String },

    #[error("Missing access token in token response")]
    MissingAccessToken,

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("Gemini API error: {}", .0.error.message)]
    GeminiServerError(GeminiError),
}

impl InsightsError {
    /// Short caller-facing message. Upstream bodies and key material stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            InsightsError::MissingConfig(_) => self.to_string(),
            InsightsError::InvalidCredential(_)
            | InsightsError::MalformedKey(_)
            | InsightsError::KeyEncoding(_)
            | InsightsError::Jwt(_)
            | InsightsError::TokenExchange { .. }
            | InsightsError::MissingAccessToken => {
                "Failed to authenticate with Google service account".to_string()
            }
            InsightsError::GeminiServerError(_) | InsightsError::UpstreamStatus(_) => {
                "Failed to get response from Gemini".to_string()
            }
            InsightsError::Reqwest(_) | InsightsError::UrlParse(_) => {
                "Upstream service is unavailable".to_string()
            }
            InsightsError::Json(_) => "Unexpected response from upstream service".to_string(),
            InsightsError::Figment(_) | InsightsError::Io(_) => {
                "Server configuration error".to_string()
            }
        }
    }
}

/// Gemini API error response structure
#[derive(Deserialize, Debug)]
pub struct GeminiError {
    pub error: GeminiErrorBody,
}

#[derive(Deserialize, Debug)]
pub struct GeminiErrorBody {
    pub code: u32,
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
