//! Shared-secret JWT adapter for session validation.
//!
//! The hosted identity service signs access tokens with HS256 using a
//! project secret. Validation checks:
//!
//! - **Signature**: HMAC-SHA256 with the configured secret
//! - **Audience (aud)**: must contain the configured audience
//! - **Expiry (exp)**: must be in the future
//!
//! The `sub` claim becomes the caller's identity id and `email` is required.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, IdentityId};
use crate::ports::SessionValidator;

/// JWT claims issued by the identity service.
#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    sub: String,
    #[serde(default)]
    aud: Audience,
    exp: i64,
    #[serde(default)]
    email: Option<String>,
}

/// Audience can be a single string or array of strings in JWTs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::None => false,
            Audience::Single(s) => s == expected,
            Audience::Multiple(v) => v.iter().any(|s| s == expected),
        }
    }
}

/// Validates HS256 bearer tokens against a shared secret.
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    audience: String,
}

impl JwtSessionValidator {
    pub fn new(secret: &SecretString, audience: impl Into<String>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            audience: audience.into(),
        }
    }

    fn decode_claims(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;

                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    ErrorKind::InvalidAudience => {
                        tracing::warn!("Invalid audience in token");
                        AuthError::InvalidToken
                    }
                    _ => {
                        tracing::debug!(error = %e, "Token validation failed");
                        AuthError::InvalidToken
                    }
                }
            })
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.decode_claims(token)?;

        if !claims.aud.contains(&self.audience) {
            return Err(AuthError::InvalidToken);
        }

        let email = claims.email.filter(|e| !e.trim().is_empty()).ok_or_else(|| {
            tracing::warn!("Token missing email claim");
            AuthError::InvalidToken
        })?;

        let id = IdentityId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(id, email))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "super-secret-jwt-key-for-tests";
    const AUDIENCE: &str = "authenticated";

    fn validator() -> JwtSessionValidator {
        JwtSessionValidator::new(&SecretString::new(SECRET.to_string()), AUDIENCE)
    }

    fn token(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Validation Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn valid_token_yields_user() {
        let jwt = token(
            json!({"sub": "user-1", "aud": AUDIENCE, "exp": in_one_hour(), "email": "a@b.com"}),
            SECRET,
        );

        let user = validator().validate(&jwt).await.unwrap();
        assert_eq!(user.id.as_str(), "user-1");
        assert_eq!(user.email, "a@b.com");
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let jwt = token(
            json!({"sub": "user-1", "aud": AUDIENCE, "exp": in_one_hour(), "email": "a@b.com"}),
            "another-secret",
        );
        assert!(matches!(
            validator().validate(&jwt).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn expired_token_is_reported() {
        let jwt = token(
            json!({"sub": "user-1", "aud": AUDIENCE, "exp": 1_000_000, "email": "a@b.com"}),
            SECRET,
        );
        assert!(matches!(
            validator().validate(&jwt).await,
            Err(AuthError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn wrong_audience_is_rejected() {
        let jwt = token(
            json!({"sub": "user-1", "aud": "anon", "exp": in_one_hour(), "email": "a@b.com"}),
            SECRET,
        );
        assert!(validator().validate(&jwt).await.is_err());
    }

    #[tokio::test]
    async fn missing_email_is_rejected() {
        let jwt = token(json!({"sub": "user-1", "aud": AUDIENCE, "exp": in_one_hour()}), SECRET);
        assert!(validator().validate(&jwt).await.is_err());
    }

    #[tokio::test]
    async fn garbage_is_rejected() {
        assert!(validator().validate("not-a-jwt").await.is_err());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Audience Parsing Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn audience_multiple_contains() {
        let aud = Audience::Multiple(vec!["api-1".to_string(), "authenticated".to_string()]);
        assert!(aud.contains("authenticated"));
        assert!(!aud.contains("api-3"));
    }

    #[test]
    fn audience_none_contains_nothing() {
        assert!(!Audience::None.contains("anything"));
    }

    #[test]
    fn validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JwtSessionValidator>();
    }
}
