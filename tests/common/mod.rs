// tests/common/mod.rs

#![allow(dead_code)]

use std::time::Duration;

use chrono::FixedOffset;
use sqlx::sqlite::SqlitePoolOptions;
use study_tracker::{config::Config, routes, state::AppState};

/// Builds app state over a private in-memory database. The ticker is not started.
pub async fn test_state() -> AppState {
    // A single connection that never expires keeps the in-memory database alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        port: 0,
        frontend_url: "http://localhost:3000".to_string(),
        schedule_offset: FixedOffset::east_opt(0).expect("valid offset"),
        timetable_tick_ms: 25,
        timetable_refresh_ticks: 0,
    };

    AppState::new(pool, config)
}

/// Spawns the app on a random port backed by a private in-memory database.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn spawn_app() -> String {
    let state = test_state().await;
    state.timetable.spawn(Duration::from_millis(25), 0);

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

pub fn unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

/// Registers a fresh user and returns a bearer token for it.
pub async fn register_and_login(client: &reqwest::Client, address: &str) -> String {
    let username = unique_name("u");
    let email = format!("{}@example.com", username);
    let password = "password123";

    let response = client
        .post(format!("{}/api/register", address))
        .json(&serde_json::json!({
            "username": username,
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);

    let login: serde_json::Value = client
        .post(format!("{}/api/login", address))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    login["token"].as_str().expect("Token not found").to_string()
}

/// Creates a study record and returns its `_id`.
pub async fn add_record(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    subject: &str,
    exam_date: &str,
    planned: f64,
) -> i64 {
    let response = client
        .post(format!("{}/api/addStudyRecord", address))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "studentId": "student-1",
            "subjectName": subject,
            "examDate": exam_date,
            "studyHoursPlanned": planned
        }))
        .send()
        .await
        .expect("Add record failed");
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    body["data"]["_id"].as_i64().expect("record id")
}
