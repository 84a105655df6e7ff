//! HTTP handlers for plan assignment and entitlement checks.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{AssignPlanCommand, CheckEntitlementQuery, StartTrialCommand};
use crate::domain::foundation::{PlanId, TrainerId};
use crate::domain::subscription::{Action, ExternalRefs};

use super::dto::{AssignPlanRequest, EntitlementResponse, StartTrialRequest, SubscriptionResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/entitlements/:action - Check whether the calling trainer may act
///
/// Unknown action names are treated as unlimited actions.
pub async fn check_entitlement(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(action): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let trainer = state.caller_trainer(&user).await?;
    let action: Action = action.parse().unwrap_or(Action::Other);

    let result = state
        .check_entitlement_handler()
        .handle(CheckEntitlementQuery {
            trainer_id: trainer.id,
            action,
        })
        .await;

    Ok(Json(EntitlementResponse::from(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/subscriptions/assign - Put a trainer on a plan (super-admin only)
pub async fn assign_plan(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    payload: Result<Json<AssignPlanRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.is_super_admin(&user) {
        tracing::warn!(identity_id = %user.id, "Plan assignment attempted by non-admin");
        return Err(ApiError::forbidden("Only the administrator can assign plans"));
    }
    let Json(request) = payload?;

    let cmd = AssignPlanCommand {
        trainer_id: TrainerId::from_uuid(request.trainer_id),
        plan_id: PlanId::from_uuid(request.plan_id),
        duration_days: request.duration_days,
    };
    let result = state.assign_plan_handler().handle(cmd).await?;

    Ok(Json(SubscriptionResponse::from(result)))
}

/// POST /api/subscriptions/trial - Start a trial for the calling trainer
pub async fn start_trial(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    payload: Result<Json<StartTrialRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let trainer = state.caller_trainer(&user).await?;
    let Json(request) = payload?;

    let cmd = StartTrialCommand {
        trainer_id: trainer.id,
        plan_id: PlanId::from_uuid(request.plan_id),
        external: ExternalRefs {
            subscription_id: request.external_subscription_id,
            customer_id: request.external_customer_id,
        },
    };
    let result = state.assign_plan_handler().start_trial(cmd).await?;

    Ok((StatusCode::CREATED, Json(SubscriptionResponse::from(result))))
}
