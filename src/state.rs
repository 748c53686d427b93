// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::schedule::{notifier::SessionNotifier, ticker::TimetableHub};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub timetable: TimetableHub,
    pub notifier: SessionNotifier,
}

impl AppState {
    /// Wires the timetable hub to read from `pool`. The ticker is not started.
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let timetable = TimetableHub::new(Arc::new(pool.clone()), config.schedule_offset);
        Self {
            pool,
            config,
            timetable,
            notifier: SessionNotifier::new(),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for TimetableHub {
    fn from_ref(state: &AppState) -> Self {
        state.timetable.clone()
    }
}

impl FromRef<AppState> for SessionNotifier {
    fn from_ref(state: &AppState) -> Self {
        state.notifier.clone()
    }
}
