use super::endpoints::GoogleOauthEndpoints;
use crate::config::SHEET_SCOPES;
use crate::error::InsightsError;
use crate::google_oauth::credentials::{AccessToken, ServiceCredential};
use crate::google_oauth::jwt::{JwtClaims, sign_assertion};
use tracing::{debug, info};
use url::Url;

/// Composes assertion signing and token exchange for one request.
/// Tokens are handed back to the caller and never cached here.
pub struct GoogleOauthService {
    http_client: reqwest::Client,
    token_uri: Url,
}

impl GoogleOauthService {
    pub fn new(http_client: reqwest::Client, token_uri: Url) -> Self {
        Self {
            http_client,
            token_uri,
        }
    }

    /// Fresh access token scoped for Drive listing and Sheets reads.
    pub async fn access_token(
        &self,
        credential: &ServiceCredential,
    ) -> Result<AccessToken, InsightsError> {
        let claims = JwtClaims::issued_now(credential, &SHEET_SCOPES, self.token_uri.as_str());
        let assertion = sign_assertion(&claims, &credential.private_key)?;
        debug!(iss = %claims.iss, iat = claims.iat, exp = claims.exp, "Signed service account assertion");

        let token =
            GoogleOauthEndpoints::exchange_assertion(&assertion, &self.token_uri, &self.http_client)
                .await?;
        info!(client_email = %credential.client_email, "Service account token obtained");
        Ok(token)
    }
}
