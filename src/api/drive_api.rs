use crate::config::SPREADSHEET_MIME_TYPE;
use crate::error::InsightsError;
use crate::google_oauth::credentials::AccessToken;
use crate::types::sheets::SheetFile;
use serde::Deserialize;
use tracing::debug;
use url::Url;

const FILE_FIELDS: &str = "nextPageToken,files(id,name)";
const PAGE_SIZE: &str = "1000";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<SheetFile>,
    next_page_token: Option<String>,
}

pub struct DriveApi;

impl DriveApi {
    /// List every Google Sheets file directly inside `folder_id`, in API order.
    pub async fn list_spreadsheets(
        client: &reqwest::Client,
        base: &Url,
        folder_id: &str,
        token: &AccessToken,
    ) -> Result<Vec<SheetFile>, InsightsError> {
        let url = base.join("files")?;
        let query = spreadsheet_query(folder_id);

        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut req = client
                .get(url.clone())
                .bearer_auth(token.secret())
                .query(&[
                    ("q", query.as_str()),
                    ("fields", FILE_FIELDS),
                    ("pageSize", PAGE_SIZE),
                ]);
            if let Some(page) = page_token.as_deref() {
                req = req.query(&[("pageToken", page)]);
            }

            let page: FileList = req.send().await?.error_for_status()?.json().await?;
            debug!(page_files = page.files.len(), "Drive files page received");
            files.extend(page.files);

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }
        Ok(files)
    }
}

/// Drive `q` expression: spreadsheets whose parent is `folder_id`.
pub fn spreadsheet_query(folder_id: &str) -> String {
    let escaped = folder_id.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}' in parents and mimeType='{SPREADSHEET_MIME_TYPE}'")
}
