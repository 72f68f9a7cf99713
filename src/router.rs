use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, Method, StatusCode, header},
    routing::post,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::InsightsError;
use crate::handlers::chat::chat_with_sheets_handler;
use crate::handlers::sheets::get_sheet_data_handler;
use crate::service::pipeline::SheetPipeline;

const BODY_LIMIT: usize = 2 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: reqwest::Client,
}

impl AppState {
    /// Build shared state with a preconfigured HTTP client.
    pub fn new(config: Arc<Config>) -> Result<Self, InsightsError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("alpha-insights/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(config.http_timeout_secs.max(1)));
        builder = match config.proxy.as_ref() {
            Some(proxy_url) => builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?),
            // proxying is explicit configuration only
            None => builder.no_proxy(),
        };
        let client = builder.build()?;
        Ok(Self { config, client })
    }

    pub fn pipeline(&self) -> SheetPipeline {
        SheetPipeline::new(self.client.clone(), self.config.clone())
    }
}

pub fn insights_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/chat-with-sheets",
            post(chat_with_sheets_handler).options(preflight_handler),
        )
        .route(
            "/get-sheet-data",
            post(get_sheet_data_handler).options(preflight_handler),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}
