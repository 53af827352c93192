//! Database models and API types

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

pub use classroom_core::{Question, Role, ScheduleEntry, ScheduleRow, StudentSchedules};

// === Database Entity Types ===

/// User row, including the password hash. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub class_name: Option<String>,
    pub is_active: bool,
}

impl DbUser {
    /// Convert to the public user shape (no password)
    pub fn to_api_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: Role::from_str(&self.role).unwrap_or_default(),
            class_name: self.class_name.clone(),
            is_active: self.is_active,
        }
    }
}

/// User as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "class")]
    pub class_name: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub is_visible: bool,
}

/// Full lesson including slides
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "class")]
    pub class_name: String,
    pub module_id: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub is_visible: bool,
    pub slides: Json<Vec<String>>,
    /// Epoch milliseconds
    pub created_at: i64,
}

/// Lesson without its slides, as shipped in the initial data load
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "class")]
    pub class_name: String,
    pub module_id: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub is_visible: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,
    pub title: String,
    #[serde(rename = "class")]
    pub class_name: String,
    /// Minutes
    pub duration: i32,
    pub questions: Json<Vec<Question>>,
    pub confirm_on_submit: bool,
}

/// Graded exam submission
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub id: String,
    pub user_id: String,
    pub exam_id: String,
    pub score: i32,
    pub total: i32,
    /// Epoch milliseconds, `at` on the wire
    #[serde(rename = "at", alias = "submittedAt")]
    pub submitted_at: i64,
    pub student_answers: Json<Vec<Option<i64>>>,
}

/// Schedule row in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbScheduleEntry {
    pub id: i64,
    pub student_id: String,
    pub day: String,
    pub time: String,
    pub subject: String,
    pub teacher: Option<String>,
}

impl DbScheduleEntry {
    /// Convert to the aggregator's input row
    pub fn to_row(&self) -> ScheduleRow {
        ScheduleRow {
            student_id: self.student_id.clone(),
            day: self.day.clone(),
            time: self.time.clone(),
            subject: self.subject.clone(),
            teacher: self.teacher.clone(),
        }
    }
}

// === Persistence inputs ===

pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub class_name: Option<String>,
}

/// Partial user update; `None` leaves a field unchanged.
/// `password` is plaintext and is hashed before storing.
#[derive(Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub class_name: Option<Option<String>>,
    pub is_active: Option<bool>,
}

pub struct NewModule {
    pub name: String,
    pub description: Option<String>,
    pub class_name: String,
    pub sort_order: i32,
    pub is_visible: bool,
}

#[derive(Default)]
pub struct ModuleChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub class_name: Option<String>,
    pub sort_order: Option<i32>,
    pub is_visible: Option<bool>,
}

pub struct NewLesson {
    pub title: String,
    pub description: Option<String>,
    pub class_name: String,
    pub module_id: Option<String>,
    pub sort_order: i32,
    pub is_visible: bool,
    pub slides: Vec<String>,
}

#[derive(Default)]
pub struct LessonChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub class_name: Option<String>,
    pub module_id: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub is_visible: Option<bool>,
    pub slides: Option<Vec<String>>,
}

pub struct NewExam {
    pub title: String,
    pub class_name: String,
    pub duration: i32,
    pub questions: Vec<Question>,
    pub confirm_on_submit: bool,
}

#[derive(Default)]
pub struct ExamChanges {
    pub title: Option<String>,
    pub class_name: Option<String>,
    pub duration: Option<i32>,
    pub questions: Option<Vec<Question>>,
    pub confirm_on_submit: Option<bool>,
}

/// Outcome of a schedule upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Inserted,
    Updated,
}

// === API Request/Response Types ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

// Auth types
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: Status,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "class", alias = "class_")]
    pub class_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub status: Status,
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub user_id: String,
    pub new_password: String,
}

// Data load
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadDataResponse {
    pub status: Status,
    pub users: Vec<User>,
    pub lessons: Vec<LessonSummary>,
    pub modules: Vec<Module>,
    pub exams: Vec<Exam>,
    pub results: Vec<ExamResult>,
    pub student_schedules: StudentSchedules,
}

/// Body of every `delete_*` endpoint except schedules
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub id: String,
}

// Save requests double as partial updates when `id` is set: a field left
// out of the body keeps its stored value, an explicit `null` clears it.

/// Tells an absent field (`None`) apart from an explicit `null` (`Some(None)`).
/// Use together with `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// Lesson types
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveLessonRequest {
    pub id: Option<String>,
    pub title: String,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(rename = "class", alias = "class_")]
    pub class_name: String,
    #[serde(default, deserialize_with = "present")]
    pub module_id: Option<Option<String>>,
    pub slides: Option<Vec<String>>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
    pub is_visible: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SlidesQuery {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SlidesResponse {
    pub status: Status,
    pub slides: Vec<String>,
}

// Module types
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveModuleRequest {
    pub id: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(rename = "class", alias = "class_")]
    pub class_name: String,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
    pub is_visible: Option<bool>,
}

// Exam types
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveExamRequest {
    pub id: Option<String>,
    pub title: String,
    #[serde(rename = "class", alias = "class_")]
    pub class_name: String,
    pub duration: i32,
    pub questions: Vec<Question>,
    /// Defaults to `true` on create
    pub confirm_on_submit: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitExamRequest {
    pub user_id: String,
    pub exam_id: String,
    /// Epoch milliseconds
    #[serde(alias = "at")]
    pub submitted_at: i64,
    #[serde(default)]
    pub student_answers: Vec<Option<i64>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitExamResponse {
    pub status: Status,
    pub message: String,
    pub score: i32,
    pub total: i32,
}

// Student types
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveStudentRequest {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    /// Required on create, optional on update
    pub password: Option<String>,
    #[serde(rename = "class", alias = "class_")]
    pub class_name: String,
}

// Schedule types
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveScheduleRequest {
    pub student_id: String,
    pub day: String,
    pub time: String,
    pub subject: String,
    pub teacher: Option<String>,
}

/// Identifies one timetable slot
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    pub student_id: String,
    pub day: String,
    pub time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_lesson_update_distinguishes_absent_from_null() {
        let absent: SaveLessonRequest =
            serde_json::from_value(json!({ "id": "l1", "title": "T2", "class": "3A" })).unwrap();
        assert_eq!(absent.description, None);
        assert_eq!(absent.module_id, None);
        assert_eq!(absent.slides, None);

        let cleared: SaveLessonRequest = serde_json::from_value(json!({
            "id": "l1",
            "title": "T2",
            "class": "3A",
            "description": null,
            "moduleId": null,
            "slides": []
        }))
        .unwrap();
        assert_eq!(cleared.description, Some(None));
        assert_eq!(cleared.module_id, Some(None));
        assert_eq!(cleared.slides, Some(vec![]));

        let set: SaveLessonRequest = serde_json::from_value(json!({
            "title": "T2",
            "class_": "3A",
            "description": "intro",
            "moduleId": "m1"
        }))
        .unwrap();
        assert_eq!(set.description, Some(Some("intro".to_string())));
        assert_eq!(set.module_id, Some(Some("m1".to_string())));
    }

    #[test]
    fn test_module_description_absent_is_untouched() {
        let request: SaveModuleRequest =
            serde_json::from_value(json!({ "id": "m1", "name": "Algebra", "class": "3A" }))
                .unwrap();
        assert_eq!(request.description, None);
    }

    #[test]
    fn test_exam_confirm_on_submit_absent_is_untouched() {
        let request: SaveExamRequest = serde_json::from_value(json!({
            "id": "e1",
            "title": "Quiz",
            "class": "3A",
            "duration": 10,
            "questions": []
        }))
        .unwrap();
        assert_eq!(request.confirm_on_submit, None);
    }

    #[test]
    fn test_result_serializes_submission_time_as_at() {
        let result = ExamResult {
            id: "r1".to_string(),
            user_id: "u1".to_string(),
            exam_id: "e1".to_string(),
            score: 2,
            total: 3,
            submitted_at: 1_700_000_000_000,
            student_answers: Json(vec![Some(1), None, Some(2)]),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["at"], 1_700_000_000_000i64);
        assert!(value.get("submittedAt").is_none());
        assert_eq!(value["studentAnswers"], json!([1, null, 2]));
    }
}
