use crate::error::{GeminiError, InsightsError};
use crate::types::gemini::{GenerateContentRequest, GenerateContentResponse};
use tracing::error;
use url::Url;

pub struct GeminiApi;

impl GeminiApi {
    /// POST `models/{model}:generateContent`. A non-success status is an error; no retries.
    pub async fn generate_content(
        client: &reqwest::Client,
        base: &Url,
        model: &str,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, InsightsError> {
        let url = base.join(&format!("models/{model}:generateContent"))?;

        let resp = client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let bytes = resp.bytes().await.unwrap_or_default();
            error!(
                %status,
                body = %String::from_utf8_lossy(&bytes),
                "Gemini API error"
            );
            return Err(match serde_json::from_slice::<GeminiError>(&bytes) {
                Ok(gemini_err) => InsightsError::GeminiServerError(gemini_err),
                Err(_) => InsightsError::UpstreamStatus(status),
            });
        }

        Ok(resp.json().await?)
    }
}
