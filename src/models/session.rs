// src/models/session.rs

use serde::Deserialize;
use validator::Validate;

/// DTO for starting a timed study session.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    #[validate(length(min = 1, max = 64))]
    pub student_id: String,
    #[validate(length(min = 1, max = 100))]
    pub subject_name: String,
    /// Session length; capped at four hours.
    #[validate(range(min = 1, max = 14400))]
    pub duration_seconds: u64,
}
