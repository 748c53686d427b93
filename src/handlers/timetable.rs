// src/handlers/timetable.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::envelope::ApiResponse,
    schedule::ticker::{TimetableHub, TimetableSnapshot},
    store::{fetch_all_records, fetch_record},
};

/// Projects every record at request time.
pub async fn get_timetable(
    State(pool): State<SqlitePool>,
    State(timetable): State<TimetableHub>,
) -> Result<impl IntoResponse, AppError> {
    let records = fetch_all_records(&pool).await?;
    let snapshot = TimetableSnapshot::build(&records, timetable.now());
    Ok(Json(ApiResponse::data(snapshot)))
}

/// Projects a single record at request time.
pub async fn get_record_schedule(
    State(pool): State<SqlitePool>,
    State(timetable): State<TimetableHub>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let record = fetch_record(&pool, id).await?;
    let snapshot = TimetableSnapshot::build(std::slice::from_ref(&record), timetable.now());
    let entry = snapshot
        .entries
        .into_iter()
        .next()
        .ok_or_else(|| AppError::InternalServerError("Empty projection".to_string()))?;
    Ok(Json(ApiResponse::data(entry)))
}

/// Latest snapshot published by the background ticker.
pub async fn get_live_timetable(State(timetable): State<TimetableHub>) -> impl IntoResponse {
    let snapshot = TimetableSnapshot::clone(&timetable.latest());
    Json(ApiResponse::data(snapshot))
}
