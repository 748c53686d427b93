// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{
        envelope::ApiResponse,
        user::{LoginRequest, RegisterRequest, User, UserSummary},
    },
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Both a taken email and a taken username answer 400 "User already exists".
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload.normalized();
    payload.validate()?;

    let (Some(username), Some(email), Some(password)) =
        (payload.username, payload.email, payload.password)
    else {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    };

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM users WHERE email = ? OR username = ?",
    )
    .bind(&email)
    .bind(&username)
    .fetch_optional(&pool)
    .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest("User already exists".to_string()));
    }

    let hashed_password = hash_password(&password)?;

    sqlx::query("INSERT INTO users (username, email, password, created_at) VALUES (?, ?, ?, ?)")
        .bind(&username)
        .bind(&email)
        .bind(hashed_password)
        .bind(Utc::now())
        .execute(&pool)
        .await
        .map_err(|e| {
            // Lost a race with a concurrent registration.
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::BadRequest("User already exists".to_string())
            } else {
                tracing::error!("Failed to register user: {:?}", e);
                AppError::from(e)
            }
        })?;

    tracing::info!("Registered user {}", username);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("User registered successfully")),
    ))
}

/// Authenticates a user by email and returns a JWT token.
///
/// Unknown emails and wrong passwords both answer 400 "Invalid credentials".
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    };
    let email = email.trim().to_lowercase();

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password, created_at FROM users WHERE email = ?",
    )
    .bind(&email)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::from(e)
    })?
    .ok_or_else(|| AppError::BadRequest("Invalid credentials".to_string()))?;

    if !verify_password(&password, &user.password)? {
        return Err(AppError::BadRequest("Invalid credentials".to_string()));
    }

    let token = sign_jwt(
        user.id,
        &user.username,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "type": "Bearer",
        "user": UserSummary::from(&user),
    })))
}
