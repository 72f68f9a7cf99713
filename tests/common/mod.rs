#![allow(dead_code)]

use alpha_insights::Config;
use alpha_insights::router::{AppState, insights_router};
use axum::{
    Form, Json, Router,
    body::{Body, Bytes, to_bytes},
    extract::{Path, Query, State},
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{self, get},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

pub const PRIVATE_KEY: &str = include_str!("../fixtures/service_account_key.pem");
pub const PUBLIC_KEY: &str = include_str!("../fixtures/service_account_key.pub.pem");

pub const CLIENT_EMAIL: &str = "reader@alpha-insights.iam.gserviceaccount.com";
pub const FOLDER_ID: &str = "folder-123";
pub const ACCESS_TOKEN: &str = "ya29.test-access-token";
pub const GEMINI_KEY: &str = "test-gemini-key";
pub const GEMINI_CALL: &str = "gemini-2.0-flash-exp:generateContent";
pub const MODEL_REPLY: &str = "A planilha Vendas mostra receita total de 300.";

pub const FALLBACK_REPLY: &str = "Desculpe, não consegui gerar uma resposta.";
pub const ERROR_REPLY: &str =
    "Desculpe, ocorreu um erro ao processar sua mensagem. Por favor, tente novamente.";

pub fn credentials_json() -> String {
    json!({
        "type": "service_account",
        "project_id": "alpha-insights",
        "private_key_id": "0123456789abcdef",
        "private_key": PRIVATE_KEY,
        "client_email": CLIENT_EMAIL,
        "token_uri": "https://oauth2.googleapis.com/token"
    })
    .to_string()
}

/// Scripted stand-in for the OAuth, Drive, Sheets and Gemini endpoints.
#[derive(Default)]
pub struct MockUpstream {
    files: Vec<(String, String)>,
    sheets: HashMap<String, Value>,
    failing_sheets: HashSet<String>,
    malformed_sheets: HashSet<String>,
    drive_page_size: Option<usize>,
    reject_token: bool,
    fail_drive: bool,
    gemini_status: Option<StatusCode>,
    gemini_body: Option<Value>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, id: &str, name: &str, values: Value) -> Self {
        self.files.push((id.to_string(), name.to_string()));
        self.sheets.insert(id.to_string(), values);
        self
    }

    pub fn failing_sheet(mut self, id: &str, name: &str) -> Self {
        self.files.push((id.to_string(), name.to_string()));
        self.failing_sheets.insert(id.to_string());
        self
    }

    pub fn malformed_sheet(mut self, id: &str, name: &str) -> Self {
        self.files.push((id.to_string(), name.to_string()));
        self.malformed_sheets.insert(id.to_string());
        self
    }

    pub fn drive_page_size(mut self, size: usize) -> Self {
        self.drive_page_size = Some(size);
        self
    }

    pub fn reject_token(mut self) -> Self {
        self.reject_token = true;
        self
    }

    pub fn fail_drive(mut self) -> Self {
        self.fail_drive = true;
        self
    }

    pub fn gemini_status(mut self, status: StatusCode) -> Self {
        self.gemini_status = Some(status);
        self
    }

    pub fn gemini_body(mut self, body: Value) -> Self {
        self.gemini_body = Some(body);
        self
    }

    pub async fn spawn(self) -> RunningUpstream {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock upstream");
        let addr = listener.local_addr().expect("mock upstream has no address");
        let state = Arc::new(MockState {
            script: self,
            token_uri: format!("http://{addr}/token"),
            hits: AtomicUsize::new(0),
            sheet_fetches: AtomicUsize::new(0),
            gemini_requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/token", routing::post(token))
            .route("/drive/v3/files", get(drive_files))
            .route("/sheets/v4/spreadsheets/{id}/values/{range}", get(sheet_values))
            .route("/gemini/v1beta/models/{call}", routing::post(gemini))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("mock upstream stopped");
        });

        RunningUpstream { addr, state }
    }
}

struct MockState {
    script: MockUpstream,
    token_uri: String,
    hits: AtomicUsize,
    sheet_fetches: AtomicUsize,
    gemini_requests: Mutex<Vec<Value>>,
}

pub struct RunningUpstream {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl RunningUpstream {
    /// Config pointing every upstream at this mock, with all secrets set.
    pub fn config(&self) -> Config {
        let base = format!("http://{}", self.addr);
        let url = |path: &str| Url::parse(&format!("{base}{path}")).expect("valid mock url");
        Config {
            gemini_api_key: Some(GEMINI_KEY.to_string()),
            google_credentials: Some(credentials_json()),
            google_drive_folder_id: Some(FOLDER_ID.to_string()),
            google_token_uri: url("/token"),
            drive_api_base: url("/drive/v3/"),
            sheets_api_base: url("/sheets/v4/"),
            gemini_api_base: url("/gemini/v1beta/"),
            http_timeout_secs: 10,
            ..Config::default()
        }
    }

    pub fn app(&self) -> Router {
        self.app_with(self.config())
    }

    pub fn app_with(&self, config: Config) -> Router {
        let state = AppState::new(Arc::new(config)).expect("failed to build app state");
        insights_router(state)
    }

    /// Total requests received by any mocked endpoint.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn sheet_fetches(&self) -> usize {
        self.state.sheet_fetches.load(Ordering::SeqCst)
    }

    pub fn gemini_requests(&self) -> Vec<Value> {
        self.state
            .gemini_requests
            .lock()
            .expect("gemini request log poisoned")
            .clone()
    }

    /// Text of the instruction turn of the only Gemini request seen.
    pub fn sent_instruction(&self) -> String {
        let requests = self.gemini_requests();
        assert_eq!(requests.len(), 1, "expected exactly one Gemini call");
        requests[0]["contents"][0]["parts"][0]["text"]
            .as_str()
            .expect("instruction text")
            .to_string()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ACCESS_TOKEN}"))
}

async fn token(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if state.script.reject_token {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant", "error_description": "Invalid JWT Signature."})),
        )
            .into_response();
    }
    if form.get("grant_type").map(String::as_str)
        != Some("urn:ietf:params:oauth:grant-type:jwt-bearer")
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "unsupported_grant_type"})),
        )
            .into_response();
    }
    let Some(assertion) = form.get("assertion") else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_request"}))).into_response();
    };

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[state.token_uri.as_str()]);
    let key = DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).expect("fixture public key");
    match decode::<Value>(assertion, &key, &validation) {
        Ok(data) if claims_look_right(&data.claims) => {
            Json(json!({
                "access_token": ACCESS_TOKEN,
                "expires_in": 3599,
                "token_type": "Bearer"
            }))
            .into_response()
        }
        _ => (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant"}))).into_response(),
    }
}

fn claims_look_right(claims: &Value) -> bool {
    let lifetime = claims["exp"]
        .as_i64()
        .zip(claims["iat"].as_i64())
        .map(|(exp, iat)| exp - iat);
    claims["iss"] == CLIENT_EMAIL
        && lifetime == Some(3600)
        && claims["scope"]
            == "https://www.googleapis.com/auth/drive.readonly https://www.googleapis.com/auth/spreadsheets.readonly"
}

async fn drive_files(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if state.script.fail_drive {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": 404, "message": "File not found"}})),
        )
            .into_response();
    }
    let expected_q = format!(
        "'{FOLDER_ID}' in parents and mimeType='application/vnd.google-apps.spreadsheet'"
    );
    if query.get("q") != Some(&expected_q) {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let files = &state.script.files;
    let start: usize = query
        .get("pageToken")
        .and_then(|t| t.parse().ok())
        .unwrap_or(0);
    let size = state.script.drive_page_size.unwrap_or(files.len().max(1));
    let end = (start + size).min(files.len());
    let page: Vec<Value> = files[start.min(end)..end]
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name}))
        .collect();

    let mut body = json!({ "files": page });
    if end < files.len() {
        body["nextPageToken"] = json!(end.to_string());
    }
    Json(body).into_response()
}

async fn sheet_values(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path((id, range)): Path<(String, String)>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.sheet_fetches.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if range != "A1:Z1000" {
        return StatusCode::BAD_REQUEST.into_response();
    }
    if state.script.failing_sheets.contains(&id) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"code": 500, "message": "backend error"}})),
        )
            .into_response();
    }
    if state.script.malformed_sheets.contains(&id) {
        return (StatusCode::OK, "<html>not json</html>").into_response();
    }
    match state.script.sheets.get(&id) {
        Some(values) => Json(json!({
            "range": format!("Sheet1!{range}"),
            "majorDimension": "ROWS",
            "values": values
        }))
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn gemini(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(call): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state
        .gemini_requests
        .lock()
        .expect("gemini request log poisoned")
        .push(body);

    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(GEMINI_KEY) {
        return StatusCode::FORBIDDEN.into_response();
    }
    if call != GEMINI_CALL {
        return StatusCode::NOT_FOUND.into_response();
    }
    if let Some(status) = state.script.gemini_status {
        return (
            status,
            Json(json!({"error": {"code": status.as_u16(), "message": "model unavailable", "status": "UNAVAILABLE"}})),
        )
            .into_response();
    }
    let body = state.script.gemini_body.clone().unwrap_or_else(|| {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": MODEL_REPLY}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"totalTokenCount": 42},
            "modelVersion": "gemini-2.0-flash-exp"
        })
    });
    Json(body).into_response()
}

pub async fn post(app: Router, uri: &str, body: Body, content_type: Option<&str>) -> (StatusCode, HeaderMap, Bytes) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let resp = app
        .oneshot(builder.body(body).expect("failed to build request"))
        .await
        .expect("request failed");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, headers, bytes)
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, _, bytes) = post(app, uri, Body::from(body.to_string()), Some("application/json")).await;
    let value = serde_json::from_slice(&bytes).expect("response body was not json");
    (status, value)
}

pub fn chat_body(messages: &[(&str, &str)]) -> Value {
    json!({
        "messages": messages
            .iter()
            .map(|(role, content)| json!({"role": role, "content": content}))
            .collect::<Vec<_>>()
    })
}
