// src/handlers/session.rs

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::{envelope::ApiResponse, session::StartSessionRequest},
    schedule::notifier::SessionNotifier,
    utils::jwt::AuthUser,
};

/// Starts a timed study session. An alert is raised when it ends.
pub async fn start_session(
    State(notifier): State<SessionNotifier>,
    user: AuthUser,
    Json(payload): Json<StartSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let session = notifier.schedule(
        payload.student_id,
        payload.subject_name,
        Duration::from_secs(payload.duration_seconds),
    )?;

    tracing::debug!("Session {} requested by {}", session.session_id, user.username);

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::with_message(
            "Study session started! You will be notified when it's over.",
            session,
        )),
    ))
}

/// Session-over alerts, newest first.
pub async fn list_alerts(State(notifier): State<SessionNotifier>) -> impl IntoResponse {
    Json(ApiResponse::data(notifier.recent()))
}
