// src/models/analytics.rs

use serde::Serialize;

use crate::models::study_record::StudyRecord;

/// Completed hours for one subject, as plotted by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectHours {
    pub name: String,
    pub hours: f64,
}

/// Aggregate view over every study record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_hours: f64,
    pub planned_hours: f64,
    /// Completed hours grouped by subject, in the order subjects first appear.
    pub subject_chart_data: Vec<SubjectHours>,
    pub record_count: usize,
}

impl AnalyticsSummary {
    pub fn from_records(records: &[StudyRecord]) -> Self {
        let mut subject_chart_data: Vec<SubjectHours> = Vec::new();

        for record in records {
            match subject_chart_data
                .iter_mut()
                .find(|entry| entry.name == record.subject_name)
            {
                Some(entry) => entry.hours += record.study_hours_completed,
                None => subject_chart_data.push(SubjectHours {
                    name: record.subject_name.clone(),
                    hours: record.study_hours_completed,
                }),
            }
        }

        Self {
            total_hours: records.iter().map(|r| r.study_hours_completed).sum(),
            planned_hours: records.iter().map(|r| r.study_hours_planned).sum(),
            subject_chart_data,
            record_count: records.len(),
        }
    }
}
