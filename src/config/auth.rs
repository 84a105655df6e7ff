//! Identity service configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Identity service configuration (bearer tokens and admin API)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret the identity service signs access tokens with
    pub jwt_secret: SecretString,

    /// Expected `aud` claim on access tokens
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,

    /// Base URL of the identity admin API (e.g. `https://xyz.example.co/auth/v1`)
    pub identity_admin_url: String,

    /// Service-role key for the admin API
    pub service_role_key: SecretString,

    /// Admin API request timeout in seconds
    #[serde(default = "default_identity_timeout")]
    pub identity_timeout_secs: u64,
}

impl AuthConfig {
    /// Get admin API timeout as Duration
    pub fn identity_timeout(&self) -> Duration {
        Duration::from_secs(self.identity_timeout_secs)
    }

    /// Validate identity configuration
    ///
    /// In production, requires HTTPS for the admin API.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if self.jwt_secret.expose_secret().len() < 32 {
            return Err(ValidationError::JwtSecretTooShort);
        }
        if self.identity_admin_url.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__IDENTITY_ADMIN_URL"));
        }
        if self.service_role_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__SERVICE_ROLE_KEY"));
        }

        if *environment == Environment::Production
            && !self.identity_admin_url.starts_with("https://")
        {
            return Err(ValidationError::IdentityUrlMustBeHttps);
        }

        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::new(String::new()),
            jwt_audience: default_jwt_audience(),
            identity_admin_url: String::new(),
            service_role_key: SecretString::new(String::new()),
            identity_timeout_secs: default_identity_timeout(),
        }
    }
}

fn default_jwt_audience() -> String {
    "authenticated".to_string()
}

fn default_identity_timeout() -> u64 {
    10
}
