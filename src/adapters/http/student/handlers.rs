//! HTTP handlers for the student roster.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{CreateStudentCommand, DeactivateStudentCommand};
use crate::domain::foundation::StudentId;

use super::dto::{CreateStudentRequest, StudentResponse};

/// POST /api/students - Add a student if the caller's plan has room
pub async fn create_student(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    payload: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let trainer = state.caller_trainer(&user).await?;
    let Json(request) = payload?;

    let cmd = CreateStudentCommand {
        trainer_id: trainer.id,
        name: request.name,
        email: request.email,
        phone: request.phone,
    };
    let student = state.create_student_handler().handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(StudentResponse::from(student))))
}

/// DELETE /api/students/:id - Deactivate one of the caller's students
pub async fn deactivate_student(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let student_id: StudentId = student_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid student id"))?;
    let trainer = state.caller_trainer(&user).await?;

    let cmd = DeactivateStudentCommand {
        trainer_id: trainer.id,
        student_id,
    };
    state.deactivate_student_handler().handle(cmd).await?;

    Ok(StatusCode::NO_CONTENT)
}
