// src/handlers/study_record.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        envelope::ApiResponse,
        study_record::{
            CreateStudyRecordRequest, ExamStatus, StudyRecord, SyllabusStatus,
            UpdateStudyRecordRequest, parse_exam_date,
        },
    },
    schedule::ticker::TimetableHub,
    store::{fetch_all_records, fetch_record},
    utils::jwt::AuthUser,
};

/// Creates a study record. New records start "Not Started" with 0 hours done.
pub async fn create_record(
    State(pool): State<SqlitePool>,
    State(timetable): State<TimetableHub>,
    user: AuthUser,
    Json(payload): Json<CreateStudyRecordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload.normalized();
    payload.validate()?;

    let (Some(student_id), Some(subject_name), Some(exam_date), Some(planned)) = (
        payload.student_id,
        payload.subject_name,
        payload.exam_date,
        payload.study_hours_planned,
    ) else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    let exam_date = parse_exam_date(&exam_date)?;
    let now = Utc::now();

    let record = sqlx::query_as::<_, StudyRecord>(
        r#"
        INSERT INTO study_records (
            student_id, subject_name, exam_date, syllabus_status,
            study_hours_planned, study_hours_completed, exam_status,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?)
        RETURNING
            id, student_id, subject_name, exam_date, syllabus_status,
            study_hours_planned, study_hours_completed, exam_status,
            created_at, updated_at
        "#,
    )
    .bind(&student_id)
    .bind(&subject_name)
    .bind(exam_date)
    .bind(SyllabusStatus::default())
    .bind(planned)
    .bind(ExamStatus::default())
    .bind(now)
    .bind(now)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to add study record: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(
        "User {} added study record {} ({})",
        user.username,
        record.id,
        record.subject_name
    );
    timetable.invalidate();

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Study record added successfully",
            record,
        )),
    ))
}

/// Lists every study record.
pub async fn list_records(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    let records = fetch_all_records(&pool).await?;
    Ok(Json(ApiResponse::data(records)))
}

pub async fn get_record(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let record = fetch_record(&pool, id).await?;
    Ok(Json(ApiResponse::data(record)))
}

/// Updates progress fields. Only the fields present in the body change.
pub async fn update_record(
    State(pool): State<SqlitePool>,
    State(timetable): State<TimetableHub>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStudyRecordRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // Nothing to change: answer with the stored record.
    if payload.is_empty() {
        let record = fetch_record(&pool, id).await?;
        return Ok(Json(ApiResponse::with_message("Updated successfully", record)));
    }

    let mut query_builder =
        QueryBuilder::<Sqlite>::new("UPDATE study_records SET updated_at = ");
    query_builder.push_bind(Utc::now());

    if let Some(status) = payload.syllabus_status {
        query_builder.push(", syllabus_status = ");
        query_builder.push_bind(status);
    }
    if let Some(hours) = payload.study_hours_completed {
        query_builder.push(", study_hours_completed = ");
        query_builder.push_bind(hours);
    }
    if let Some(status) = payload.exam_status {
        query_builder.push(", exam_status = ");
        query_builder.push_bind(status);
    }

    query_builder.push(" WHERE id = ");
    query_builder.push_bind(id);
    query_builder.push(
        r#"
        RETURNING
            id, student_id, subject_name, exam_date, syllabus_status,
            study_hours_planned, study_hours_completed, exam_status,
            created_at, updated_at
        "#,
    );

    let record = query_builder
        .build_query_as::<StudyRecord>()
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update study record {}: {:?}", id, e);
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::NotFound("Record not found".to_string()))?;

    tracing::info!("User {} updated study record {}", user.username, id);
    timetable.invalidate();

    Ok(Json(ApiResponse::with_message("Updated successfully", record)))
}

pub async fn delete_record(
    State(pool): State<SqlitePool>,
    State(timetable): State<TimetableHub>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM study_records WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Record not found".to_string()));
    }

    tracing::info!("User {} deleted study record {}", user.username, id);
    timetable.invalidate();

    Ok(Json(ApiResponse::message("Deleted successfully")))
}
