// src/schedule/ticker.rs

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::models::study_record::StudyRecord;
use crate::schedule::clock::format_countdown;
use crate::schedule::projector::{ScheduleProjection, project};
use crate::store::RecordSource;

/// One timetable row: a record with its projection at the snapshot instant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub record: StudyRecord,
    pub schedule: ScheduleProjection,
    /// `HH:MM:SS` until the next slot, absent once the exam has passed.
    pub countdown: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableSnapshot {
    pub generated_at: DateTime<FixedOffset>,
    pub entries: Vec<TimetableEntry>,
}

impl TimetableSnapshot {
    /// Projects every record at `now`.
    pub fn build(records: &[StudyRecord], now: DateTime<FixedOffset>) -> Self {
        let entries = records
            .iter()
            .map(|record| {
                let schedule = project(record, now);
                let countdown = schedule.time_until_next_study.map(format_countdown);
                TimetableEntry {
                    record: record.clone(),
                    schedule,
                    countdown,
                }
            })
            .collect();

        Self {
            generated_at: now,
            entries,
        }
    }
}

/// Publishes a freshly projected timetable on every tick.
///
/// Records are cached between ticks. The cache is reloaded from the
/// [`RecordSource`] when the task starts, every `refresh_every` ticks, and
/// whenever [`TimetableHub::invalidate`] is called.
#[derive(Clone)]
pub struct TimetableHub {
    source: Arc<dyn RecordSource>,
    offset: FixedOffset,
    tx: Arc<watch::Sender<Arc<TimetableSnapshot>>>,
    reload: Arc<Notify>,
}

impl TimetableHub {
    pub fn new(source: Arc<dyn RecordSource>, offset: FixedOffset) -> Self {
        let initial = TimetableSnapshot::build(&[], Utc::now().with_timezone(&offset));
        let (tx, _rx) = watch::channel(Arc::new(initial));

        Self {
            source,
            offset,
            tx: Arc::new(tx),
            reload: Arc::new(Notify::new()),
        }
    }

    /// Current time in the schedule offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<TimetableSnapshot>> {
        self.tx.subscribe()
    }

    pub fn latest(&self) -> Arc<TimetableSnapshot> {
        self.tx.borrow().clone()
    }

    /// Asks the running ticker to reload records before its next publish.
    pub fn invalidate(&self) {
        // notify_one keeps a permit if the ticker is busy, so the request is not lost.
        self.reload.notify_one();
    }

    /// Starts the ticker on the current tokio runtime.
    pub fn spawn(&self, tick: Duration, refresh_every: u32) -> JoinHandle<()> {
        let hub = self.clone();
        tokio::spawn(async move { hub.run(tick, refresh_every).await })
    }

    async fn run(self, tick: Duration, refresh_every: u32) {
        tracing::info!(
            "Timetable ticker started (tick {:?}, reload every {} ticks)",
            tick,
            refresh_every
        );

        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut records = self.load(Vec::new()).await;
        let mut ticks_since_load: u32 = 0;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    ticks_since_load += 1;
                    if refresh_every > 0 && ticks_since_load >= refresh_every {
                        records = self.load(records).await;
                        ticks_since_load = 0;
                    }
                }
                _ = self.reload.notified() => {
                    records = self.load(records).await;
                    ticks_since_load = 0;
                }
            }

            self.publish(&records);
        }
    }

    /// Loads records, keeping `previous` if the source fails.
    async fn load(&self, previous: Vec<StudyRecord>) -> Vec<StudyRecord> {
        match self.source.load_records().await {
            Ok(records) => {
                tracing::debug!("Timetable cache reloaded with {} records", records.len());
                records
            }
            Err(e) => {
                tracing::warn!("Timetable reload failed, keeping cached records: {}", e);
                previous
            }
        }
    }

    fn publish(&self, records: &[StudyRecord]) {
        let snapshot = TimetableSnapshot::build(records, self.now());
        self.tx.send_replace(Arc::new(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::study_record::{ExamStatus, SyllabusStatus};
    use crate::schedule::projector::ScheduleStatus;
    use async_trait::async_trait;
    use chrono::TimeDelta;
    use std::sync::Mutex;

    struct MemorySource(Mutex<Vec<StudyRecord>>);

    #[async_trait]
    impl RecordSource for MemorySource {
        async fn load_records(&self) -> Result<Vec<StudyRecord>, AppError> {
            Ok(self.0.lock().unwrap().clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RecordSource for FailingSource {
        async fn load_records(&self) -> Result<Vec<StudyRecord>, AppError> {
            Err(AppError::InternalServerError("database unavailable".to_string()))
        }
    }

    fn record(id: i64, exam_in: TimeDelta) -> StudyRecord {
        let now = Utc::now();
        StudyRecord {
            id,
            student_id: "s-1".to_string(),
            subject_name: format!("Subject {}", id),
            exam_date: now + exam_in,
            syllabus_status: SyllabusStatus::NotStarted,
            study_hours_planned: 10.0,
            study_hours_completed: 0.0,
            exam_status: ExamStatus::Upcoming,
            created_at: now,
            updated_at: now,
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn snapshot_projects_each_record() {
        let records = vec![
            record(1, TimeDelta::days(3)),
            record(2, TimeDelta::days(-1)),
        ];
        let snapshot = TimetableSnapshot::build(&records, Utc::now().with_timezone(&utc()));

        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.entries[0].schedule.status, ScheduleStatus::Active);
        assert!(snapshot.entries[0].countdown.is_some());
        assert_eq!(snapshot.entries[1].schedule.status, ScheduleStatus::ExamPassed);
        assert_eq!(snapshot.entries[1].countdown, None);
    }

    #[tokio::test]
    async fn ticker_publishes_and_reloads_on_invalidate() {
        let source = Arc::new(MemorySource(Mutex::new(vec![record(1, TimeDelta::days(2))])));
        let hub = TimetableHub::new(source.clone(), utc());
        let mut rx = hub.subscribe();

        let handle = hub.spawn(Duration::from_millis(10), 0);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().entries.len(), 1);

        source.0.lock().unwrap().push(record(2, TimeDelta::days(5)));
        hub.invalidate();

        let mut seen = 0;
        for _ in 0..50 {
            rx.changed().await.unwrap();
            seen = rx.borrow_and_update().entries.len();
            if seen == 2 {
                break;
            }
        }
        assert_eq!(seen, 2);
        assert_eq!(hub.latest().entries.len(), 2);

        handle.abort();
    }

    #[tokio::test]
    async fn failing_source_still_publishes_ticks() {
        let hub = TimetableHub::new(Arc::new(FailingSource), utc());
        let mut rx = hub.subscribe();
        let handle = hub.spawn(Duration::from_millis(10), 1);

        rx.changed().await.unwrap();
        assert!(rx.borrow().entries.is_empty());

        handle.abort();
    }
}
