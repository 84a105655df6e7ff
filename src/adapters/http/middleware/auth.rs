//! Authentication middleware and extractors for axum.
//!
//! - `auth_middleware` validates Bearer tokens and injects the caller into extensions
//! - `RequireAuth` extracts the caller, rejecting with 401 when absent
//!
//! The middleware uses the `SessionValidator` port, so tests swap in a mock
//! without touching the routes.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::ApiError;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Validates a Bearer token when one is present.
///
/// Requests without an `Authorization` header pass through untouched so
/// public routes (webhooks, health) keep working; handlers that need a
/// caller use `RequireAuth`. A token that is present but invalid is
/// rejected here with 401.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let Some(token) = token else {
        return next.run(request).await;
    };

    match validator.validate(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => auth_error(&e).into_response(),
    }
}

fn auth_error(err: &AuthError) -> ApiError {
    match err {
        AuthError::TokenExpired => ApiError::unauthorized("Token expired"),
        AuthError::InvalidToken => ApiError::unauthorized("Invalid token"),
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!(error = %msg, "Auth service unavailable");
            ApiError::new(
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                "Authentication service unavailable",
            )
        }
    }
}

/// Extractor that requires an authenticated caller.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => {
                ApiError::unauthorized("Missing authorization header").into_response()
            }
        }
    }
}
