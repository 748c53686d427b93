// src/handlers/analytics.rs

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{analytics::AnalyticsSummary, envelope::ApiResponse},
    store::fetch_all_records,
};

/// Totals and per-subject completed hours across all records.
pub async fn get_analytics(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let records = fetch_all_records(&pool).await?;
    Ok(Json(ApiResponse::data(AnalyticsSummary::from_records(&records))))
}
