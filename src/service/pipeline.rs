use crate::api::drive_api::DriveApi;
use crate::config::{Config, SheetSource};
use crate::error::InsightsError;
use crate::google_oauth::credentials::ServiceCredential;
use crate::google_oauth::service::GoogleOauthService;
use crate::service::fanout;
use crate::types::sheets::FetchedSheet;
use std::sync::Arc;
use tracing::{info, warn};

/// Credential-to-sheets pipeline. Everything it derives lives for one call.
pub struct SheetPipeline {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl SheetPipeline {
    pub fn new(client: reqwest::Client, config: Arc<Config>) -> Self {
        Self { client, config }
    }

    /// Token → folder listing → concurrent fetch → populated sheets in discovery order.
    ///
    /// Credential and token failures are returned. A failed listing counts as
    /// an empty folder; a failed sheet is dropped.
    pub async fn load(&self, source: SheetSource<'_>) -> Result<Vec<FetchedSheet>, InsightsError> {
        let credential = ServiceCredential::from_json(source.credentials_json)?;
        let token = GoogleOauthService::new(
            self.client.clone(),
            self.config.google_token_uri.clone(),
        )
        .access_token(&credential)
        .await?;

        let files = DriveApi::list_spreadsheets(
            &self.client,
            &self.config.drive_api_base,
            source.folder_id,
            &token,
        )
        .await
        .unwrap_or_else(|e| {
            warn!(folder_id = %source.folder_id, error = %e, "Listing spreadsheets failed; treating folder as empty");
            Vec::new()
        });
        info!(count = files.len(), "Found sheets");
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let outcomes =
            fanout::fetch_all(&self.client, &self.config.sheets_api_base, &files, &token).await;
        let sheets = fanout::retain_populated(outcomes);
        info!(
            fetched = sheets.len(),
            skipped = files.len() - sheets.len(),
            "Loaded sheet data"
        );
        Ok(sheets)
    }
}
