use crate::config::JWT_BEARER_GRANT_TYPE;
use crate::error::InsightsError;
use crate::google_oauth::credentials::AccessToken;

use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

/// Stateless Google OAuth Endpoints.
pub(super) struct GoogleOauthEndpoints;

impl GoogleOauthEndpoints {
    /// Exchange a signed assertion for a bearer token (JWT-bearer grant).
    pub(super) async fn exchange_assertion(
        assertion: &str,
        token_uri: &Url,
        http_client: &reqwest::Client,
    ) -> Result<AccessToken, InsightsError> {
        let resp = http_client
            .post(token_uri.clone())
            .header("Accept", "application/json")
            .form(&[
                ("grant_type", JWT_BEARER_GRANT_TYPE),
                ("assertion", assertion),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "token endpoint rejected service account assertion");
            return Err(InsightsError::TokenExchange { status, body });
        }

        let token: GoogleTokenResponse = resp.json().await?;
        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(InsightsError::MissingAccessToken)?;
        debug!(
            expires_in = ?token.expires_in,
            token_type = ?token.token_type,
            "Access token issued for service account"
        );
        Ok(AccessToken::new(access_token))
    }
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    token_type: Option<String>,
}
