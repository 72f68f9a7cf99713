use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info, warn};

use crate::api::gemini_api::GeminiApi;
use crate::error::InsightsError;
use crate::middleware::chat_request::ChatPayload;
use crate::router::AppState;
use crate::service::{context, prompt};
use crate::types::chat::{ChatErrorResponse, ChatResponse, ConversationMessage};

/// POST /chat-with-sheets -> `{reply}`, or `{error, reply}` with the apology text.
pub async fn chat_with_sheets_handler(
    State(state): State<AppState>,
    ChatPayload(request): ChatPayload,
) -> Response {
    match answer(&state, &request.messages).await {
        Ok(reply) => {
            info!("Successfully generated response");
            Json(ChatResponse { reply }).into_response()
        }
        Err(e) => {
            error!(error = %e, "Error in chat-with-sheets");
            chat_failure(StatusCode::INTERNAL_SERVER_ERROR, e.user_message())
        }
    }
}

pub fn chat_failure(status: StatusCode, error: String) -> Response {
    (
        status,
        Json(ChatErrorResponse {
            error,
            reply: prompt::ERROR_REPLY.to_string(),
        }),
    )
        .into_response()
}

async fn answer(state: &AppState, history: &[ConversationMessage]) -> Result<String, InsightsError> {
    let api_key = state
        .config
        .gemini_api_key()
        .ok_or(InsightsError::MissingConfig("GEMINI_API_KEY"))?;

    info!(messages = history.len(), "Processing chat request");

    let digest = sheet_digest(state).await;
    let request = prompt::build_request(&digest, history);

    let response = GeminiApi::generate_content(
        &state.client,
        &state.config.gemini_api_base,
        &state.config.gemini_model,
        api_key,
        &request,
    )
    .await?;

    Ok(prompt::reply_or_fallback(&response))
}

/// Sheet context for the prompt; any pipeline failure means answering without data.
async fn sheet_digest(state: &AppState) -> String {
    let Some(source) = state.config.sheet_source() else {
        debug!("Google credentials or folder not configured; answering without sheet context");
        return String::new();
    };

    match state.pipeline().load(source).await {
        Ok(sheets) => context::text_digest(&sheets),
        Err(e) => {
            warn!(error = %e, "Error accessing Google Sheets; answering without sheet context");
            String::new()
        }
    }
}
