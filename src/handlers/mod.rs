// src/handlers/mod.rs

pub mod analytics;
pub mod auth;
pub mod health;
pub mod session;
pub mod study_record;
pub mod timetable;
