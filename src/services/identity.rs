// SPDX-License-Identifier: MIT

//! Identity provider client (Google Identity Toolkit REST API).
//!
//! Handles:
//! - Email+password sign-up and sign-in
//! - Display name updates
//! - Current-user lookup by id token
//!
//! Credential pairs go in, an opaque identity record comes out. No
//! retries; every failure is surfaced verbatim to the initiating form.

use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

/// Opaque identity record returned by the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable uid assigned by the provider.
    #[serde(alias = "localId")]
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    /// Provider-issued token for follow-up profile calls.
    #[serde(default)]
    pub id_token: String,
}

/// Identity provider API client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IdentityClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Create a new account. The provider's ambient current-user changes
    /// on success.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        self.post_json("accounts:signUp", &body).await
    }

    /// Sign in with an email+password credential pair.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        self.post_json("accounts:signInWithPassword", &body).await
    }

    /// Update the display name on the provider's profile.
    pub async fn update_display_name(&self, id_token: &str, name: &str) -> Result<(), AppError> {
        let body = json!({
            "idToken": id_token,
            "displayName": name,
            "returnSecureToken": false,
        });
        let _: Identity = self.post_json("accounts:update", &body).await?;
        Ok(())
    }

    /// Current-user lookup for a provider-issued token.
    pub async fn lookup(&self, id_token: &str) -> Result<Identity, AppError> {
        #[derive(Deserialize)]
        struct LookupResponse {
            #[serde(default)]
            users: Vec<Identity>,
        }

        let body = json!({ "idToken": id_token });
        let response: LookupResponse = self.post_json("accounts:lookup", &body).await?;
        response
            .users
            .into_iter()
            .next()
            .ok_or(AppError::InvalidToken)
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, AppError> {
        let url = format!("{}/{}?key={}", self.base_url, endpoint, self.api_key);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Identity request failed: {}", e)))?;

        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| AppError::Upstream(format!("Identity response malformed: {}", e)));
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(map_provider_error(status, &body))
    }
}

/// Map the provider's error payload onto the application taxonomy.
fn map_provider_error(status: reqwest::StatusCode, body: &str) -> AppError {
    #[derive(Deserialize)]
    struct ProviderError {
        error: ProviderErrorBody,
    }
    #[derive(Deserialize)]
    struct ProviderErrorBody {
        #[serde(default)]
        message: String,
    }

    let message = serde_json::from_str::<ProviderError>(body)
        .map(|e| e.error.message)
        .unwrap_or_default();

    // WEAK_PASSWORD arrives with a trailing description, match on prefix
    if message == "EMAIL_EXISTS" {
        AppError::EmailInUse
    } else if message.starts_with("WEAK_PASSWORD") {
        AppError::WeakPassword
    } else if matches!(
        message.as_str(),
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
    ) {
        AppError::InvalidCredentials
    } else {
        tracing::warn!(status = %status, message = %message, "Identity provider error");
        AppError::Upstream(format!("Identity provider error: {}", status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_body(message: &str) -> String {
        format!(r#"{{"error":{{"code":400,"message":"{}"}}}}"#, message)
    }

    #[test]
    fn test_error_mapping() {
        let status = reqwest::StatusCode::BAD_REQUEST;

        assert!(matches!(
            map_provider_error(status, &provider_body("EMAIL_EXISTS")),
            AppError::EmailInUse
        ));
        assert!(matches!(
            map_provider_error(
                status,
                &provider_body("WEAK_PASSWORD : Password should be at least 6 characters")
            ),
            AppError::WeakPassword
        ));
        assert!(matches!(
            map_provider_error(status, &provider_body("INVALID_LOGIN_CREDENTIALS")),
            AppError::InvalidCredentials
        ));
        assert!(matches!(
            map_provider_error(status, &provider_body("EMAIL_NOT_FOUND")),
            AppError::InvalidCredentials
        ));
        assert!(matches!(
            map_provider_error(status, "not json"),
            AppError::Upstream(_)
        ));
    }
}
