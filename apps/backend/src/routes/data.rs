//! Initial data load

use axum::{extract::State, Json};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// GET /api/load_data
/// Everything the dashboard needs in one response. Lesson slides are left
/// out and fetched per lesson.
pub async fn load_data(State(state): State<AppState>) -> Result<Json<LoadDataResponse>> {
    snapshot(&state)
        .await
        .map(Json)
        .map_err(|e| match e {
            ApiError::Database(err) => {
                ApiError::Internal(format!("Database query failed: {}", err))
            }
            other => other,
        })
}

async fn snapshot(state: &AppState) -> Result<LoadDataResponse> {
    let users = state.db.list_users().await?;
    let lessons = state.db.list_lessons(None).await?;
    let modules = state.db.list_modules(None).await?;
    let exams = state.db.list_exams(None).await?;
    let results = state.db.list_results(None, None).await?;
    let schedule_rows = state.db.list_schedule_rows().await?;

    Ok(LoadDataResponse {
        status: Status::Success,
        users: users.iter().map(DbUser::to_api_user).collect(),
        lessons,
        modules,
        exams,
        results,
        student_schedules: classroom_core::aggregate(
            schedule_rows.iter().map(DbScheduleEntry::to_row),
        ),
    })
}
