// src/schedule/mod.rs

//! Timetable projection: the pure schedule projector, its clock helpers, and
//! the background tasks that keep a live timetable and session alerts flowing.

pub mod clock;
pub mod notifier;
pub mod projector;
pub mod ticker;

pub use projector::{ScheduleProjection, ScheduleStatus, StudyStatus, project};
