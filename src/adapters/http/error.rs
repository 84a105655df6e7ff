//! HTTP error mapping.
//!
//! Every failure leaves the API as `{ "error": ..., "details"?: ... }` with
//! the status chosen here.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::billing::WebhookError;
use crate::domain::foundation::DomainError;
use crate::domain::subscription::SubscriptionError;
use crate::domain::trainer::TrainerError;

/// JSON body for error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.into(),
                details: None,
            },
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.body.details = Some(details.into());
        self
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn unauthorized(error: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error)
    }

    pub fn forbidden(error: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ErrorResponse {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<TrainerError> for ApiError {
    fn from(err: TrainerError) -> Self {
        match err {
            TrainerError::Validation(e) => ApiError::bad_request(e.to_string()),
            TrainerError::DuplicateCpf => ApiError::bad_request(err.to_string()),
            TrainerError::IdentityProvider(reason) => {
                ApiError::bad_request("Failed to create user account").with_details(reason)
            }
            TrainerError::Forbidden => ApiError::forbidden(err.to_string()),
            TrainerError::NotFound => ApiError::not_found(err.to_string()),
            TrainerError::Infrastructure(reason) => {
                tracing::error!(error = %reason, "Trainer operation failed");
                ApiError::internal("Failed to create personal trainer").with_details(reason)
            }
        }
    }
}

impl From<SubscriptionError> for ApiError {
    fn from(err: SubscriptionError) -> Self {
        match &err {
            SubscriptionError::Validation(_)
            | SubscriptionError::PlanNotFound(_)
            | SubscriptionError::PlanInactive(_) => ApiError::bad_request(err.to_string()),
            SubscriptionError::TrainerNotFound | SubscriptionError::StudentNotFound => {
                ApiError::not_found(err.to_string())
            }
            SubscriptionError::LimitReached(_) => ApiError::forbidden(err.to_string()),
            SubscriptionError::Infrastructure(reason) => {
                tracing::error!(error = %reason, "Subscription operation failed");
                ApiError::internal("Internal server error").with_details(reason.clone())
            }
        }
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        if let WebhookError::Internal(reason) = &err {
            tracing::error!(error = %reason, "Webhook processing failed");
        }
        ApiError::new(err.status_code(), err.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        tracing::error!(error = %err, "Store operation failed");
        ApiError::internal("Internal server error").with_details(err.message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request("Invalid request body").with_details(rejection.body_text())
    }
}
