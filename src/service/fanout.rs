use crate::api::sheets_api::SheetsApi;
use crate::error::InsightsError;
use crate::google_oauth::credentials::AccessToken;
use crate::types::sheets::{FetchedSheet, SheetFile};
use futures::future::join_all;
use std::future::Future;
use tracing::{debug, warn};
use url::Url;

/// A single spreadsheet that could not be fetched.
#[derive(Debug)]
pub struct FetchFailure {
    pub file: SheetFile,
    pub reason: InsightsError,
}

pub type FetchOutcome = Result<FetchedSheet, FetchFailure>;

/// Run `fetch` for every file at once and wait for all of them.
/// Outcomes come back in `files` order whatever the completion order.
pub async fn fan_out<F, Fut>(files: &[SheetFile], fetch: F) -> Vec<FetchOutcome>
where
    F: Fn(SheetFile) -> Fut,
    Fut: Future<Output = Result<FetchedSheet, InsightsError>>,
{
    let pending = files.iter().cloned().map(|file| {
        let fetching = fetch(file.clone());
        async move { fetching.await.map_err(|reason| FetchFailure { file, reason }) }
    });
    join_all(pending).await
}

/// Fetch the value range of every file from the Sheets API.
pub async fn fetch_all(
    client: &reqwest::Client,
    sheets_base: &Url,
    files: &[SheetFile],
    token: &AccessToken,
) -> Vec<FetchOutcome> {
    fan_out(files, |file| async move {
        SheetsApi::fetch_values(client, sheets_base, &file, token).await
    })
    .await
}

/// Drop failed fetches and sheets whose range came back empty, keeping order.
/// A header-only sheet is kept.
pub fn retain_populated(outcomes: Vec<FetchOutcome>) -> Vec<FetchedSheet> {
    outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            Ok(sheet) if sheet.has_rows() => Some(sheet),
            Ok(sheet) => {
                debug!(sheet = %sheet.name(), id = %sheet.file.id, "Sheet range is empty; skipping");
                None
            }
            Err(failure) => {
                warn!(
                    sheet = %failure.file.name,
                    id = %failure.file.id,
                    error = %failure.reason,
                    "Error fetching sheet; skipping"
                );
                None
            }
        })
        .collect()
}
