//! Lesson endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use classroom_core::validation::require_non_empty;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::extract::ApiJson;
use crate::AppState;

const CREATED: &str = "تم حفظ الدرس بنجاح";
const UPDATED: &str = "تم تحديث الدرس بنجاح";
const DELETED: &str = "تم حذف الدرس بنجاح";

/// POST /api/save_lesson
/// Creates when no id is given, otherwise updates in place.
/// Fields missing from an update keep their stored values.
pub async fn save(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SaveLessonRequest>,
) -> Result<Json<MessageResponse>> {
    require_non_empty("title", &payload.title)?;
    require_non_empty("class", &payload.class_name)?;

    let response = match payload.id {
        Some(id) => {
            let lesson = state
                .db
                .update_lesson(
                    &id,
                    LessonChanges {
                        title: Some(payload.title),
                        description: payload.description,
                        class_name: Some(payload.class_name),
                        module_id: payload.module_id,
                        sort_order: payload.sort_order,
                        is_visible: payload.is_visible,
                        slides: payload.slides,
                    },
                )
                .await?;
            MessageResponse::success(UPDATED).with_id(lesson.id)
        }
        None => {
            let lesson = state
                .db
                .create_lesson(NewLesson {
                    title: payload.title,
                    description: payload.description.flatten(),
                    class_name: payload.class_name,
                    module_id: payload.module_id.flatten(),
                    sort_order: payload.sort_order.unwrap_or(0),
                    is_visible: payload.is_visible.unwrap_or(true),
                    slides: payload.slides.unwrap_or_default(),
                })
                .await?;
            tracing::info!(lesson_id = %lesson.id, "created lesson");
            MessageResponse::success(CREATED).with_id(lesson.id)
        }
    };

    Ok(Json(response))
}

/// POST /api/delete_lesson
pub async fn delete(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<DeleteRequest>,
) -> Result<Json<MessageResponse>> {
    state.db.delete_lesson(&payload.id).await?;
    Ok(Json(MessageResponse::success(DELETED)))
}

/// GET /api/get_lesson_slides?id=...
pub async fn slides(
    State(state): State<AppState>,
    Query(query): Query<SlidesQuery>,
) -> Result<Json<SlidesResponse>> {
    let slides = state
        .db
        .get_lesson_slides(&query.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

    Ok(Json(SlidesResponse {
        status: Status::Success,
        slides,
    }))
}
