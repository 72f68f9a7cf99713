pub mod api;
pub mod config;
pub mod error;
pub mod google_oauth;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod types;

pub use config::Config;
pub use error::InsightsError;
pub use google_oauth::credentials::ServiceCredential;
pub use service::pipeline::SheetPipeline;
