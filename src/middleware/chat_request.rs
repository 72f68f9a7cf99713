use axum::{
    Json,
    extract::{FromRequest, Request},
    response::Response,
};
use tracing::warn;

use crate::handlers::chat::chat_failure;
use crate::types::chat::ChatRequest;

/// Chat body extractor. Rejections keep their status but use the chat error
/// shape, so the UI always gets `{error, reply}`.
pub struct ChatPayload(pub ChatRequest);

impl<S> FromRequest<S> for ChatPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<ChatRequest>::from_request(req, state).await {
            Ok(Json(body)) => Ok(ChatPayload(body)),
            Err(rejection) => {
                let status = rejection.status();
                let reason = rejection.body_text();
                warn!(%status, %reason, "Rejected chat request body");
                Err(chat_failure(status, reason))
            }
        }
    }
}
