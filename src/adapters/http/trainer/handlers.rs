//! HTTP handlers for trainer provisioning.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::IntoResponse;
use secrecy::ExposeSecret;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::CreateTrainerCommand;
use crate::domain::trainer::TrainerError;

use super::dto::{CreateTrainerRequest, CreateTrainerResponse};

/// POST /functions/create-trainer - Provision a trainer account (super-admin only)
pub async fn create_trainer(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    payload: Result<Json<CreateTrainerRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.is_super_admin(&user) {
        tracing::warn!(identity_id = %user.id, "Trainer creation attempted by non-admin");
        return Err(TrainerError::Forbidden.into());
    }
    let Json(request) = payload?;

    let handler = state.create_trainer_handler();
    let cmd = CreateTrainerCommand {
        caller: user,
        registration: request.into(),
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(CreateTrainerResponse {
        success: true,
        message: format!("Personal trainer {} created successfully", result.trainer.name),
        temp_password: result.temporary_password.expose_secret().clone(),
    }))
}
