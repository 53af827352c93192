//! Integration tests for the initial data load.
//!
//! Run with: cargo test --test api_data -- --ignored

mod common;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::fixtures::*;
use common::TestContext;

#[tokio::test]
#[ignore = "requires database"]
async fn test_load_data_snapshot() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let student = ctx.create_student(&unique_email("snapshot"), "pw").await;

    let body: Value = server
        .post("/api/save_lesson")
        .json(&save_lesson_request(None, "Snapshot lesson", None, &["<p>big</p>"]))
        .await
        .json();
    let lesson_id = body["id"].as_str().unwrap().to_string();

    for (day, time, subject) in [
        ("sunday", "09:00", "Science"),
        ("sunday", "08:00", "Math"),
        ("monday", "08:00", "Arabic"),
    ] {
        server
            .post("/api/save_student_schedule")
            .json(&schedule_request(&student.id, day, time, subject, None))
            .await
            .assert_status_ok();
    }

    let response = server.get("/api/load_data").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["status"], "success");
    for key in ["users", "lessons", "modules", "exams", "results"] {
        assert!(body[key].is_array(), "{} should be an array", key);
    }

    let user = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["id"] == student.id.as_str())
        .expect("student in snapshot");
    assert!(user.get("password").is_none());

    let lesson = body["lessons"]
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["id"] == lesson_id.as_str())
        .expect("lesson in snapshot");
    assert!(lesson.get("slides").is_none());

    // Rows come back in storage order, not sorted by time
    let timetable = &body["studentSchedules"][student.id.as_str()];
    assert_eq!(
        timetable["sunday"],
        json!([
            { "day": "sunday", "time": "09:00", "subject": "Science", "teacher": null },
            { "day": "sunday", "time": "08:00", "subject": "Math", "teacher": null }
        ])
    );
    assert_eq!(timetable["monday"][0]["subject"], "Arabic");

    ctx.cleanup_lesson(&lesson_id).await;
    ctx.cleanup_user(&student.id).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_health_check() {
    let ctx = TestContext::new().await;
    let server = ctx.server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}
