use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use crate::error::InsightsError;
use crate::router::AppState;
use crate::service::context;
use crate::types::sheets::{SheetTable, SheetsErrorResponse, SheetsResponse};

/// POST /get-sheet-data -> `{sheets}` for chart widgets. The request body is ignored.
pub async fn get_sheet_data_handler(State(state): State<AppState>) -> Response {
    match load_tables(&state).await {
        Ok(sheets) => {
            info!(count = sheets.len(), "Successfully processed sheets data");
            Json(SheetsResponse { sheets }).into_response()
        }
        Err(e) => {
            error!(error = %e, "Error in get-sheet-data");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SheetsErrorResponse {
                    error: e.user_message(),
                    sheets: Vec::new(),
                }),
            )
                .into_response()
        }
    }
}

async fn load_tables(state: &AppState) -> Result<Vec<SheetTable>, InsightsError> {
    let source = state
        .config
        .sheet_source()
        .ok_or(InsightsError::MissingConfig("Google credentials or folder ID"))?;

    info!("Fetching sheet data for charts");
    let sheets = state.pipeline().load(source).await?;
    Ok(context::structured_tables(&sheets))
}
