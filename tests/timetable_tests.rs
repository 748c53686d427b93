// tests/timetable_tests.rs

mod common;

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use common::{add_record, register_and_login, spawn_app};

#[tokio::test]
async fn timetable_projects_active_and_passed_records() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;

    let exam = (Utc::now() + TimeDelta::days(3)).to_rfc3339();
    let upcoming = add_record(&client, &address, &token, "Algebra", &exam, 24.0).await;
    let past = add_record(&client, &address, &token, "History", "2000-01-01", 5.0).await;

    let body: serde_json::Value = client
        .get(format!("{}/api/timetable", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let entries = body["data"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    let active = entries
        .iter()
        .find(|e| e["record"]["_id"] == upcoming)
        .unwrap();
    let schedule = &active["schedule"];
    assert_eq!(schedule["status"], "ACTIVE");
    assert_eq!(schedule["daysUntilExam"], 3);
    assert_eq!(schedule["totalAvailableHours"], 24);
    assert!(schedule["nextStudyTime"].is_string());
    assert!(schedule["timeUntilNextStudy"].as_i64().unwrap() > 0);
    let progress = schedule["progress"].as_u64().unwrap();
    assert!(progress <= 100);
    assert_eq!(active["countdown"].as_str().unwrap().len(), 8);

    let passed = entries.iter().find(|e| e["record"]["_id"] == past).unwrap();
    assert_eq!(passed["schedule"]["status"], "EXAM_PASSED");
    assert_eq!(passed["schedule"]["studyStatus"], "COMPLETED");
    assert_eq!(passed["schedule"]["progress"], 100);
    assert!(passed["schedule"]["nextStudyTime"].is_null());
    assert!(passed["countdown"].is_null());
}

#[tokio::test]
async fn single_record_schedule() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;

    let exam = (Utc::now() + TimeDelta::days(2)).to_rfc3339();
    let id = add_record(&client, &address, &token, "Chemistry", &exam, 16.0).await;

    let body: serde_json::Value = client
        .get(format!("{}/api/timetable/{}", address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["record"]["subjectName"], "Chemistry");
    assert_eq!(body["data"]["schedule"]["status"], "ACTIVE");

    let missing = client
        .get(format!("{}/api/timetable/{}", address, id + 1))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn live_timetable_picks_up_new_records() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;

    let exam = (Utc::now() + TimeDelta::days(10)).to_rfc3339();
    add_record(&client, &address, &token, "Geography", &exam, 30.0).await;

    let mut entries = Vec::new();
    for _ in 0..40 {
        let body: serde_json::Value = client
            .get(format!("{}/api/timetable/live", address))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        entries = body["data"]["entries"].as_array().cloned().unwrap_or_default();
        if !entries.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["record"]["subjectName"], "Geography");
    assert_eq!(entries[0]["schedule"]["status"], "ACTIVE");
}

#[tokio::test]
async fn session_alert_is_raised_when_the_session_ends() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let anonymous = client
        .post(format!("{}/api/sessions", address))
        .json(&serde_json::json!({
            "studentId": "s1",
            "subjectName": "Music",
            "durationSeconds": 1
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status().as_u16(), 401);

    let token = register_and_login(&client, &address).await;

    let too_long = client
        .post(format!("{}/api/sessions", address))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "studentId": "s1",
            "subjectName": "Music",
            "durationSeconds": 999999
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(too_long.status().as_u16(), 400);

    let started = client
        .post(format!("{}/api/sessions", address))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "studentId": "s1",
            "subjectName": "Music",
            "durationSeconds": 1
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(started.status().as_u16(), 202);
    let started: serde_json::Value = started.json().await.unwrap();
    let session_id = started["data"]["sessionId"].as_u64().unwrap();

    let mut alerts = Vec::new();
    for _ in 0..40 {
        let body: serde_json::Value = client
            .get(format!("{}/api/sessions/alerts", address))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        alerts = body["data"].as_array().cloned().unwrap_or_default();
        if !alerts.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["sessionId"].as_u64(), Some(session_id));
    assert_eq!(alerts[0]["subjectName"], "Music");
}
