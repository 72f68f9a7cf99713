use crate::error::InsightsError;
use serde::Deserialize;
use std::fmt;

/// Service-account identity taken from the Google JSON key file.
/// Other fields of the key file are ignored.
#[derive(Clone, Deserialize)]
pub struct ServiceCredential {
    pub client_email: String,
    pub private_key: String,
}

impl ServiceCredential {
    pub fn from_json(raw: &str) -> Result<Self, InsightsError> {
        let cred: ServiceCredential = serde_json::from_str(raw)
            .map_err(|e| InsightsError::InvalidCredential(e.to_string()))?;
        if cred.client_email.trim().is_empty() {
            return Err(InsightsError::InvalidCredential(
                "client_email is empty".to_string(),
            ));
        }
        if cred.private_key.trim().is_empty() {
            return Err(InsightsError::InvalidCredential(
                "private_key is empty".to_string(),
            ));
        }
        Ok(cred)
    }
}

impl fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredential")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Bearer token for the current request only.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}
