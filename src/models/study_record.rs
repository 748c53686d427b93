// src/models/study_record.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::trimmed;
use crate::error::AppError;

/// Self-reported syllabus coverage, edited by the student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum SyllabusStatus {
    #[default]
    #[serde(rename = "Not Started")]
    #[sqlx(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    #[sqlx(rename = "Completed")]
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ExamStatus {
    #[default]
    Upcoming,
    Completed,
}

/// Represents the 'study_records' table in the database.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyRecord {
    #[serde(rename = "_id")]
    pub id: i64,
    pub student_id: String,
    pub subject_name: String,
    pub exam_date: DateTime<Utc>,
    pub syllabus_status: SyllabusStatus,
    pub study_hours_planned: f64,
    /// Hours the student reports as done. Never derived from the schedule.
    pub study_hours_completed: f64,
    pub exam_status: ExamStatus,
    /// Start of the study window.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a study record.
///
/// `studyHoursPlanned` accepts either a JSON number or a numeric string, since
/// HTML number inputs are submitted as text.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudyRecordRequest {
    #[validate(length(min = 1, max = 64, message = "Student ID must be 1 to 64 characters."))]
    pub student_id: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Subject name must be 1 to 100 characters."))]
    pub subject_name: Option<String>,
    pub exam_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[validate(range(
        exclusive_min = 0.0,
        max = 10000.0,
        message = "Planned hours must be greater than 0 and at most 10000."
    ))]
    pub study_hours_planned: Option<f64>,
}

impl CreateStudyRecordRequest {
    /// Trims the text fields. Whitespace-only values become `None`.
    pub fn normalized(self) -> Self {
        Self {
            student_id: trimmed(self.student_id),
            subject_name: trimmed(self.subject_name),
            exam_date: trimmed(self.exam_date),
            ..self
        }
    }
}

/// DTO for updating progress on a record. Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudyRecordRequest {
    pub syllabus_status: Option<SyllabusStatus>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[validate(range(
        min = 0.0,
        max = 10000.0,
        message = "Completed hours must be between 0 and 10000."
    ))]
    pub study_hours_completed: Option<f64>,
    pub exam_status: Option<ExamStatus>,
}

impl UpdateStudyRecordRequest {
    pub fn is_empty(&self) -> bool {
        self.syllabus_status.is_none()
            && self.study_hours_completed.is_none()
            && self.exam_status.is_none()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Parses an exam date as submitted by clients.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC) and bare
/// `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_exam_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(AppError::BadRequest(format!("Invalid exam date: '{}'", raw)))
}
