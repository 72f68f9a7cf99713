use crate::config::SHEET_VALUE_RANGE;
use crate::error::InsightsError;
use crate::google_oauth::credentials::AccessToken;
use crate::types::sheets::{FetchedSheet, SheetFile};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

pub struct SheetsApi;

impl SheetsApi {
    /// Fetch the fixed `A1:Z1000` range of the spreadsheet's first sheet.
    pub async fn fetch_values(
        client: &reqwest::Client,
        base: &Url,
        file: &SheetFile,
        token: &AccessToken,
    ) -> Result<FetchedSheet, InsightsError> {
        let url = base.join(&format!(
            "spreadsheets/{}/values/{}",
            file.id, SHEET_VALUE_RANGE
        ))?;

        let range: ValueRange = client
            .get(url)
            .bearer_auth(token.secret())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(FetchedSheet {
            file: file.clone(),
            values: range
                .values
                .into_iter()
                .map(|row| row.into_iter().map(cell_text).collect())
                .collect(),
        })
    }
}

/// Cells normally arrive as formatted strings; anything else keeps its JSON text.
fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
