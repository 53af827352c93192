//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Generate a unique email so parallel tests never collide.
pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@school.test", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Generate a unique class label.
pub fn unique_class(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8])
}

/// A question whose correct choice is `answer`.
pub fn question(answer: i64) -> serde_json::Value {
    json!({
        "q": format!("Question with key {}", answer),
        "choices": ["first", "second", "third"],
        "answer": answer,
        "type": "mcq",
        "topic": "history"
    })
}

/// Create a login request body.
pub fn login_request(email: &str, password: &str) -> serde_json::Value {
    json!({ "email": email, "password": password })
}

/// Create a register request body.
pub fn register_request(name: &str, email: &str, password: &str) -> serde_json::Value {
    json!({ "name": name, "email": email, "password": password, "class": "3A" })
}

/// Create a save lesson request body.
pub fn save_lesson_request(
    id: Option<&str>,
    title: &str,
    module_id: Option<&str>,
    slides: &[&str],
) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("About {}", title),
        "class": "3A",
        "moduleId": module_id,
        "slides": slides
    })
}

/// Create a save module request body.
pub fn save_module_request(id: Option<&str>, name: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "description": null, "class": "3A" })
}

/// Create a save exam request body with one question per answer key.
pub fn save_exam_request(id: Option<&str>, title: &str, keys: &[i64]) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "class": "3A",
        "duration": 30,
        "questions": keys.iter().map(|k| question(*k)).collect::<Vec<_>>(),
        "confirmOnSubmit": true
    })
}

/// Create a submit exam request body.
pub fn submit_exam_request(
    user_id: &str,
    exam_id: &str,
    answers: &[Option<i64>],
) -> serde_json::Value {
    json!({
        "userId": user_id,
        "examId": exam_id,
        "at": 1_700_000_000_000i64,
        "studentAnswers": answers
    })
}

/// Create a save student request body.
pub fn save_student_request(
    id: Option<&str>,
    name: &str,
    email: &str,
    password: Option<&str>,
) -> serde_json::Value {
    json!({ "id": id, "name": name, "email": email, "password": password, "class": "3A" })
}

/// Create a save schedule entry request body.
pub fn schedule_request(
    student_id: &str,
    day: &str,
    time: &str,
    subject: &str,
    teacher: Option<&str>,
) -> serde_json::Value {
    json!({
        "studentId": student_id,
        "day": day,
        "time": time,
        "subject": subject,
        "teacher": teacher
    })
}

/// Create a delete request body.
pub fn delete_request(id: &str) -> serde_json::Value {
    json!({ "id": id })
}
