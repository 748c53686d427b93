// src/config.rs

use std::env;
use std::str::FromStr;

use chrono::FixedOffset;
use dotenvy::dotenv;
use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    /// Only origin allowed by CORS.
    pub frontend_url: String,
    /// Offset used to decide what "today" means when anchoring study slots.
    pub schedule_offset: FixedOffset,
    pub timetable_tick_ms: u64,
    /// Number of ticks between two reloads of the record cache.
    pub timetable_refresh_ticks: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://study_tracker.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::InternalServerError("JWT_SECRET must be set".to_string()))?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        Url::parse(&frontend_url).map_err(|e| {
            AppError::InternalServerError(format!("FRONTEND_URL is not a valid URL: {}", e))
        })?;

        let offset_minutes: i32 = parse_or("SCHEDULE_UTC_OFFSET_MINUTES", 0)?;
        let schedule_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                AppError::InternalServerError(format!(
                    "SCHEDULE_UTC_OFFSET_MINUTES out of range: {}",
                    offset_minutes
                ))
            })?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration: parse_or("JWT_EXPIRATION", 3600)?,
            rust_log,
            port: parse_or("PORT", 5000)?,
            frontend_url,
            schedule_offset,
            timetable_tick_ms: parse_or("TIMETABLE_TICK_MS", 1000)?,
            timetable_refresh_ticks: parse_or("TIMETABLE_REFRESH_TICKS", 30)?,
        })
    }
}

/// Reads an optional numeric variable, falling back to `default` when unset.
fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::InternalServerError(format!("{} has an invalid value", key))),
        Err(_) => Ok(default),
    }
}
