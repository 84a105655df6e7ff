//! Top-level router assembly.
//!
//! ```text
//! /health                       GET
//! /functions/create-trainer     POST  (bearer, super-admin)
//! /functions/stripe-webhook     POST  (signature header)
//! /api/entitlements/:action     GET   (bearer, trainer)
//! /api/subscriptions/assign     POST  (bearer, super-admin)
//! /api/subscriptions/trial      POST  (bearer, trainer)
//! /api/students                 POST  (bearer, trainer)
//! /api/students/:id             DELETE (bearer, trainer)
//! ```

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{AllowedOrigins, ServerConfig};

use super::billing::webhook_routes;
use super::error::ApiError;
use super::middleware::auth_middleware;
use super::state::AppState;
use super::student::student_routes;
use super::subscription::subscription_routes;
use super::trainer::trainer_routes;

/// Method fallback shared by every route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Builds the CORS layer from the configured origins.
///
/// No origins, or a literal `*`, allows any origin.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let allow_origin = match config.allowed_origins() {
        AllowedOrigins::Any => AllowOrigin::from(Any),
        AllowedOrigins::List(origins) => {
            let parsed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %o, "Ignoring unparseable CORS origin");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(parsed)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-client-info"),
        ])
}

/// Assembles every route with CORS, tracing, timeouts and bearer-token
/// validation applied.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let auth = axum::middleware::from_fn_with_state(
        state.session_validator.clone(),
        auth_middleware,
    );

    Router::new()
        .route("/health", get(health).fallback(method_not_allowed))
        .nest(
            "/functions",
            trainer_routes().merge(webhook_routes()),
        )
        .nest(
            "/api",
            subscription_routes().merge(student_routes()),
        )
        .fallback(not_found)
        .layer(auth)
        .with_state(state)
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_accepts_wildcard_and_lists() {
        let wildcard = ServerConfig {
            cors_origins: Some("*".to_string()),
            ..Default::default()
        };
        let _ = cors_layer(&wildcard);

        let listed = ServerConfig {
            cors_origins: Some("http://localhost:5173, https://app.example.com".to_string()),
            ..Default::default()
        };
        let _ = cors_layer(&listed);
    }

    #[tokio::test]
    async fn method_fallback_is_json_405() {
        let err = method_not_allowed().await;
        assert_eq!(err.status(), axum::http::StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.body().error, "Method not allowed");
    }
}
