// src/store.rs

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{error::AppError, models::study_record::StudyRecord};

/// Read accessor for the current set of study records.
///
/// The timetable ticker only needs to read records, so it depends on this
/// trait rather than on the pool directly.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn load_records(&self) -> Result<Vec<StudyRecord>, AppError>;
}

#[async_trait]
impl RecordSource for SqlitePool {
    async fn load_records(&self) -> Result<Vec<StudyRecord>, AppError> {
        fetch_all_records(self).await
    }
}

/// Fetches every study record, oldest first.
pub async fn fetch_all_records(pool: &SqlitePool) -> Result<Vec<StudyRecord>, AppError> {
    let records = sqlx::query_as::<_, StudyRecord>(
        r#"
        SELECT
            id, student_id, subject_name, exam_date, syllabus_status,
            study_hours_planned, study_hours_completed, exam_status,
            created_at, updated_at
        FROM study_records
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch study records: {:?}", e);
        AppError::from(e)
    })?;

    Ok(records)
}

/// Fetches one study record by id.
pub async fn fetch_record(pool: &SqlitePool, id: i64) -> Result<StudyRecord, AppError> {
    sqlx::query_as::<_, StudyRecord>(
        r#"
        SELECT
            id, student_id, subject_name, exam_date, syllabus_status,
            study_hours_planned, study_hours_completed, exam_status,
            created_at, updated_at
        FROM study_records
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Record not found".to_string()))
}
