// src/schedule/notifier.rs

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::error::AppError;

/// Alerts kept for `recent()`.
const RECENT_CAPACITY: usize = 50;

/// Raised once a study session's duration has elapsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAlert {
    pub session_id: u64,
    pub student_id: String,
    pub subject_name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSession {
    pub session_id: u64,
    pub student_id: String,
    pub subject_name: String,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Fires a "session over" alert after each scheduled session ends.
#[derive(Clone)]
pub struct SessionNotifier {
    next_id: Arc<AtomicU64>,
    tx: broadcast::Sender<SessionAlert>,
    recent: Arc<Mutex<VecDeque<SessionAlert>>>,
}

impl Default for SessionNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionNotifier {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(64);
        Self {
            next_id: Arc::new(AtomicU64::new(1)),
            tx,
            recent: Arc::new(Mutex::new(VecDeque::with_capacity(RECENT_CAPACITY))),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionAlert> {
        self.tx.subscribe()
    }

    /// Alerts that have fired, newest first.
    pub fn recent(&self) -> Vec<SessionAlert> {
        let recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
        recent.iter().cloned().collect()
    }

    /// Schedules an alert `duration` from now. Must run inside a tokio runtime.
    pub fn schedule(
        &self,
        student_id: String,
        subject_name: String,
        duration: Duration,
    ) -> Result<ScheduledSession, AppError> {
        let length = TimeDelta::from_std(duration)
            .map_err(|e| AppError::BadRequest(format!("Invalid session length: {}", e)))?;

        let session = ScheduledSession {
            session_id: self.next_id.fetch_add(1, Ordering::Relaxed),
            student_id,
            subject_name,
            started_at: Utc::now(),
            ends_at: Utc::now() + length,
        };

        tracing::info!(
            "Study session {} started for {} ({}), ends at {}",
            session.session_id,
            session.student_id,
            session.subject_name,
            session.ends_at
        );

        let notifier = self.clone();
        let pending = session.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            notifier.fire(pending);
        });

        Ok(session)
    }

    fn fire(&self, session: ScheduledSession) {
        let alert = SessionAlert {
            session_id: session.session_id,
            message: format!(
                "Your {} study session is over. Take a break!",
                session.subject_name
            ),
            student_id: session.student_id,
            subject_name: session.subject_name,
            started_at: session.started_at,
            ended_at: Utc::now(),
        };

        tracing::info!("Study session {} is over", alert.session_id);

        {
            let mut recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
            recent.push_front(alert.clone());
            recent.truncate(RECENT_CAPACITY);
        }

        if self.tx.send(alert).is_err() {
            tracing::debug!("No live subscribers for session alerts");
        }
    }
}
