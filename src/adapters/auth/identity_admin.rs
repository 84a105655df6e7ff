//! Identity service admin API adapter.
//!
//! Implements `IdentityProvider` against the hosted identity service's admin
//! endpoints, authenticated with the service-role key:
//!
//! - `POST {base}/admin/users` creates an account
//! - `DELETE {base}/admin/users/{id}` removes it
//!
//! Error bodies carry the reason in `msg`, `message` or `error_description`
//! depending on the failing layer; whichever is present is surfaced.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode, IdentityId};
use crate::ports::{IdentityProvider, NewIdentity};

/// Admin API client for the identity service.
pub struct IdentityAdminClient {
    base_url: String,
    service_role_key: SecretString,
    http_client: reqwest::Client,
}

impl IdentityAdminClient {
    /// Creates a client for `base_url` (for example `https://xyz.example.co/auth/v1`).
    pub fn new(base_url: impl Into<String>, service_role_key: SecretString) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_role_key,
            http_client: reqwest::Client::new(),
        }
    }

    /// Overrides the HTTP client, mostly to set timeouts.
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Builds a client with a per-request timeout.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| identity_error(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self.with_http_client(client))
    }

    fn users_url(&self) -> String {
        format!("{}/admin/users", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let key = self.service_role_key.expose_secret();
        request.header("apikey", key.as_str()).bearer_auth(key)
    }
}

#[derive(Debug, Serialize)]
struct CreateUserRequest<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
    user_metadata: UserMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct UserMetadata<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedUser {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct AdminErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Pulls a human-readable reason out of an admin API error body.
fn error_reason(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<AdminErrorBody>(body)
        .ok()
        .and_then(|b| b.msg.or(b.message).or(b.error_description))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("identity service returned {}", status))
}

fn identity_error(message: impl Into<String>) -> DomainError {
    DomainError::new(ErrorCode::IdentityProviderError, message)
}

#[async_trait]
impl IdentityProvider for IdentityAdminClient {
    async fn create_user(&self, identity: &NewIdentity) -> Result<IdentityId, DomainError> {
        let body = CreateUserRequest {
            email: &identity.email,
            password: &identity.password,
            email_confirm: identity.email_confirmed,
            user_metadata: UserMetadata {
                name: &identity.name,
            },
        };

        let response = self
            .authorize(self.http_client.post(self.users_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| identity_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let reason = error_reason(status, &text);
            tracing::error!(status = %status, reason = %reason, "Identity create_user failed");
            return Err(identity_error(reason));
        }

        let created: CreatedUser = response
            .json()
            .await
            .map_err(|e| identity_error(format!("Failed to parse identity response: {}", e)))?;

        IdentityId::new(created.id).map_err(|e| identity_error(e.to_string()))
    }

    async fn delete_user(&self, id: &IdentityId) -> Result<(), DomainError> {
        let url = format!("{}/{}", self.users_url(), id);
        let response = self
            .authorize(self.http_client.delete(&url))
            .send()
            .await
            .map_err(|e| identity_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(identity_error(error_reason(status, &text)));
        }

        Ok(())
    }
}
