//! Student timetable endpoints

use axum::{extract::State, Json};
use classroom_core::validation::require_non_empty;

use crate::error::Result;
use crate::models::*;
use crate::routes::extract::ApiJson;
use crate::AppState;

const CREATED: &str = "تم حفظ الحصة بنجاح";
const UPDATED: &str = "تم تحديث الحصة بنجاح";
const DELETED: &str = "تم حذف الحصة بنجاح";

/// POST /api/save_student_schedule
/// Upserts on (studentId, day, time)
pub async fn save(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SaveScheduleRequest>,
) -> Result<Json<MessageResponse>> {
    require_non_empty("studentId", &payload.student_id)?;
    require_non_empty("day", &payload.day)?;
    require_non_empty("time", &payload.time)?;
    require_non_empty("subject", &payload.subject)?;

    let message = match state.db.upsert_schedule_entry(&payload).await? {
        Upserted::Inserted => CREATED,
        Upserted::Updated => UPDATED,
    };

    Ok(Json(MessageResponse::success(message)))
}

/// POST /api/delete_student_schedule
pub async fn delete(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ScheduleSlot>,
) -> Result<Json<MessageResponse>> {
    state.db.delete_schedule_entry(&payload).await?;
    Ok(Json(MessageResponse::success(DELETED)))
}
