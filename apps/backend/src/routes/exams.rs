//! Exam endpoints, including submission and grading

use axum::{extract::State, Json};
use classroom_core::validation::{require_non_empty, validate_duration, validate_questions};

use crate::error::Result;
use crate::models::*;
use crate::routes::extract::ApiJson;
use crate::AppState;

const CREATED: &str = "تم حفظ الامتحان بنجاح";
const UPDATED: &str = "تم تحديث الامتحان بنجاح";
const DELETED: &str = "تم حذف الامتحان ونتائجه بنجاح";
const SUBMITTED: &str = "تم تسليم الامتحان بنجاح.";

/// POST /api/save_exam
pub async fn save(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SaveExamRequest>,
) -> Result<Json<MessageResponse>> {
    require_non_empty("title", &payload.title)?;
    require_non_empty("class", &payload.class_name)?;
    validate_duration(payload.duration)?;
    validate_questions(&payload.questions)?;

    let response = match payload.id {
        Some(id) => {
            let exam = state
                .db
                .update_exam(
                    &id,
                    ExamChanges {
                        title: Some(payload.title),
                        class_name: Some(payload.class_name),
                        duration: Some(payload.duration),
                        questions: Some(payload.questions),
                        confirm_on_submit: payload.confirm_on_submit,
                    },
                )
                .await?;
            MessageResponse::success(UPDATED).with_id(exam.id)
        }
        None => {
            let exam = state
                .db
                .create_exam(NewExam {
                    title: payload.title,
                    class_name: payload.class_name,
                    duration: payload.duration,
                    questions: payload.questions,
                    confirm_on_submit: payload.confirm_on_submit.unwrap_or(true),
                })
                .await?;
            tracing::info!(exam_id = %exam.id, questions = exam.questions.len(), "created exam");
            MessageResponse::success(CREATED).with_id(exam.id)
        }
    };

    Ok(Json(response))
}

/// POST /api/delete_exam
/// Removes the exam and every result recorded for it
pub async fn delete(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<DeleteRequest>,
) -> Result<Json<MessageResponse>> {
    state.db.delete_exam(&payload.id).await?;
    Ok(Json(MessageResponse::success(DELETED)))
}

/// POST /api/submit_exam
/// Every call records a new result, earlier attempts are kept
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SubmitExamRequest>,
) -> Result<Json<SubmitExamResponse>> {
    let result = state.db.submit_exam(&payload).await?;

    Ok(Json(SubmitExamResponse {
        status: Status::Success,
        message: SUBMITTED.to_string(),
        score: result.score,
        total: result.total,
    }))
}
