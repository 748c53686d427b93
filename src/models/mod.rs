// src/models/mod.rs

pub mod analytics;
pub mod envelope;
pub mod session;
pub mod study_record;
pub mod user;

/// Trims a free-text field. Blank input is treated as absent.
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
