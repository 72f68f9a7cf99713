use crate::error::InsightsError;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
pub const SHEET_SCOPES: [&str; 2] = [DRIVE_READONLY_SCOPE, SHEETS_READONLY_SCOPE];

pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";
pub const SHEET_VALUE_RANGE: &str = "A1:Z1000";

pub static GOOGLE_TOKEN_URI: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://oauth2.googleapis.com/token").expect("invalid fixed URL for token endpoint")
});

pub static DRIVE_API_BASE: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://www.googleapis.com/drive/v3/").expect("invalid fixed URL for Drive API")
});

pub static SHEETS_API_BASE: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://sheets.googleapis.com/v4/").expect("invalid fixed URL for Sheets API")
});

pub static GEMINI_API_BASE: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://generativelanguage.googleapis.com/v1beta/")
        .expect("invalid fixed URL for Gemini API")
});

/// Environment keys read by [`Config::load`]. Matching is case-insensitive.
const ENV_KEYS: [&str; 13] = [
    "listen_addr",
    "loglevel",
    "proxy",
    "gemini_api_key",
    "gemini_model",
    "google_credentials",
    "google_credentials_file",
    "google_drive_folder_id",
    "google_token_uri",
    "drive_api_base",
    "sheets_api_base",
    "gemini_api_base",
    "http_timeout_secs",
];

/// Process configuration, loaded once at start-up and shared read-only.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub loglevel: String,
    pub proxy: Option<Url>,
    pub http_timeout_secs: u64,

    #[serde(deserialize_with = "lenient_string")]
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,

    /// Raw service-account JSON.
    #[serde(deserialize_with = "lenient_string")]
    pub google_credentials: Option<String>,
    pub google_credentials_file: Option<PathBuf>,
    #[serde(deserialize_with = "lenient_string")]
    pub google_drive_folder_id: Option<String>,

    pub google_token_uri: Url,
    pub drive_api_base: Url,
    pub sheets_api_base: Url,
    pub gemini_api_base: Url,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            proxy: None,
            http_timeout_secs: 30,
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash-exp".to_string(),
            google_credentials: None,
            google_credentials_file: None,
            google_drive_folder_id: None,
            google_token_uri: GOOGLE_TOKEN_URI.clone(),
            drive_api_base: DRIVE_API_BASE.clone(),
            sheets_api_base: SHEETS_API_BASE.clone(),
            gemini_api_base: GEMINI_API_BASE.clone(),
        }
    }
}

/// Where the sheet pipeline reads from. Only available when both halves are configured.
#[derive(Clone, Copy)]
pub struct SheetSource<'a> {
    pub credentials_json: &'a str,
    pub folder_id: &'a str,
}

impl Config {
    /// Defaults overlaid with the process environment.
    pub fn load() -> Result<Self, InsightsError> {
        let figment =
            Figment::from(Serialized::defaults(Config::default())).merge(Env::raw().only(&ENV_KEYS));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self, InsightsError> {
        let mut cfg: Config = figment.extract()?;
        cfg.resolve_credentials_file()?;
        // endpoint paths are joined onto these, which needs a trailing slash
        for base in [
            &mut cfg.drive_api_base,
            &mut cfg.sheets_api_base,
            &mut cfg.gemini_api_base,
        ] {
            ensure_trailing_slash(base);
        }
        Ok(cfg)
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        non_blank(self.gemini_api_key.as_deref())
    }

    pub fn google_credentials(&self) -> Option<&str> {
        non_blank(self.google_credentials.as_deref())
    }

    pub fn drive_folder_id(&self) -> Option<&str> {
        non_blank(self.google_drive_folder_id.as_deref())
    }

    pub fn sheet_source(&self) -> Option<SheetSource<'_>> {
        Some(SheetSource {
            credentials_json: self.google_credentials()?,
            folder_id: self.drive_folder_id()?,
        })
    }

    fn resolve_credentials_file(&mut self) -> Result<(), InsightsError> {
        if self.google_credentials().is_some() {
            return Ok(());
        }
        if let Some(path) = self.google_credentials_file.as_ref() {
            self.google_credentials = Some(std::fs::read_to_string(path)?);
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("listen_addr", &self.listen_addr)
            .field("loglevel", &self.loglevel)
            .field("proxy", &self.proxy.as_ref().map(Url::as_str))
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("gemini_api_key", &redacted(self.gemini_api_key()))
            .field("gemini_model", &self.gemini_model)
            .field("google_credentials", &redacted(self.google_credentials()))
            .field("google_drive_folder_id", &self.drive_folder_id())
            .field("google_token_uri", &self.google_token_uri.as_str())
            .field("drive_api_base", &self.drive_api_base.as_str())
            .field("sheets_api_base", &self.sheets_api_base.as_str())
            .field("gemini_api_base", &self.gemini_api_base.as_str())
            .finish()
    }
}

fn redacted(value: Option<&str>) -> &'static str {
    match value {
        Some(_) => "<set>",
        None => "<none>",
    }
}

fn ensure_trailing_slash(url: &mut Url) {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// The env provider parses values, so a numeric folder id or a JSON credential
/// may arrive as a number or a map. Fold everything back into a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
