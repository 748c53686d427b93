// src/schedule/projector.rs

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde::{Serialize, Serializer};

use crate::models::study_record::StudyRecord;
use crate::schedule::clock::{
    MILLIS_PER_DAY, STUDY_HOURS_PER_DAY, next_slot, round_tenths,
};

/// Whether the exam still lies ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    Active,
    ExamPassed,
}

/// Pacing state derived from the projected hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudyStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Schedule state of one record at one instant. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleProjection {
    pub status: ScheduleStatus,
    pub study_status: StudyStatus,
    /// Hours that should be done by now under linear pacing, to one decimal.
    pub current_study_hour: f64,
    pub next_study_time: Option<DateTime<FixedOffset>>,
    /// Serialized as whole milliseconds.
    #[serde(serialize_with = "serialize_millis")]
    pub time_until_next_study: Option<TimeDelta>,
    /// Percent in `0..=100`.
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_exam: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_available_hours: Option<i64>,
}

impl ScheduleProjection {
    /// Terminal projection once the exam time has been reached.
    fn exam_passed(planned: f64) -> Self {
        Self {
            status: ScheduleStatus::ExamPassed,
            study_status: StudyStatus::Completed,
            current_study_hour: planned,
            next_study_time: None,
            time_until_next_study: None,
            progress: 100,
            days_until_exam: None,
            total_available_hours: None,
        }
    }
}

/// Projects `record`'s study schedule at `now`.
///
/// Slots are anchored to `now`'s calendar day in `now`'s own offset, so the
/// caller decides which timezone "today" refers to.
///
/// The pacing fraction divides the time elapsed since the record was created
/// by the time still *remaining* until the exam, clamped to `[0, 1]`.
pub fn project(record: &StudyRecord, now: DateTime<FixedOffset>) -> ScheduleProjection {
    let planned = record.study_hours_planned;
    let now_utc = now.with_timezone(&Utc);

    let time_until_exam = (record.exam_date - now_utc).num_milliseconds();
    if time_until_exam <= 0 {
        return ScheduleProjection::exam_passed(planned);
    }
    let remaining = time_until_exam as f64;

    let days_until_exam = (remaining / MILLIS_PER_DAY).ceil() as i64;
    let total_available_hours = days_until_exam * i64::from(STUDY_HOURS_PER_DAY);

    let elapsed = (now_utc - record.created_at).num_milliseconds() as f64;
    let elapsed_fraction = (elapsed / remaining).clamp(0.0, 1.0);

    let current = if has_plan(planned) {
        (elapsed_fraction * planned).min(planned)
    } else {
        0.0
    };

    let hours_today = (current % f64::from(STUDY_HOURS_PER_DAY)).floor() as u32;
    let next_study_time = next_slot(now, hours_today);

    let study_status = if current == 0.0 {
        StudyStatus::NotStarted
    } else if current >= planned {
        StudyStatus::Completed
    } else {
        StudyStatus::InProgress
    };

    ScheduleProjection {
        status: ScheduleStatus::Active,
        study_status,
        current_study_hour: round_tenths(current),
        next_study_time: Some(next_study_time),
        time_until_next_study: Some(next_study_time - now),
        progress: progress_percent(current, planned),
        days_until_exam: Some(days_until_exam),
        total_available_hours: Some(total_available_hours),
    }
}

/// False for zero, negative and non-finite plans.
fn has_plan(planned: f64) -> bool {
    planned.is_finite() && planned > 0.0
}

fn progress_percent(current: f64, planned: f64) -> u8 {
    if !has_plan(planned) {
        return 0;
    }
    ((current / planned) * 100.0).round().clamp(0.0, 100.0) as u8
}

fn serialize_millis<S>(value: &Option<TimeDelta>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(delta) => serializer.serialize_i64(delta.num_milliseconds()),
        None => serializer.serialize_none(),
    }
}
