//! Student management endpoints

use axum::{extract::State, Json};
use classroom_core::validation::{require_non_empty, validate_email};
use classroom_core::ValidationError;

use crate::error::Result;
use crate::models::*;
use crate::routes::extract::ApiJson;
use crate::AppState;

const CREATED: &str = "تم إضافة الطالب بنجاح";
const UPDATED: &str = "تم تحديث بيانات الطالب";
const DELETED: &str = "تم حذف الطالب ونتائجه بنجاح";

/// POST /api/save_student
/// Password is required when creating; on update it is only changed when sent
pub async fn save(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SaveStudentRequest>,
) -> Result<Json<MessageResponse>> {
    let email = payload.email.trim().to_string();
    require_non_empty("name", &payload.name)?;
    validate_email(&email)?;
    require_non_empty("class", &payload.class_name)?;

    let password = payload.password.filter(|p| !p.is_empty());

    let response = match payload.id {
        Some(id) => {
            let user = state
                .db
                .update_user(
                    &id,
                    UserChanges {
                        name: Some(payload.name),
                        email: Some(email),
                        password,
                        class_name: Some(Some(payload.class_name)),
                        ..Default::default()
                    },
                )
                .await?;
            MessageResponse::success(UPDATED).with_id(user.id)
        }
        None => {
            let password =
                password.ok_or_else(|| ValidationError::new("password", "is required"))?;
            let user = state
                .db
                .create_user(NewUser {
                    name: payload.name,
                    email,
                    password,
                    role: Role::Student,
                    class_name: Some(payload.class_name),
                })
                .await?;
            MessageResponse::success(CREATED).with_id(user.id)
        }
    };

    Ok(Json(response))
}

/// POST /api/delete_student
/// Also removes the student's results and timetable
pub async fn delete(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<DeleteRequest>,
) -> Result<Json<MessageResponse>> {
    state.db.delete_user(&payload.id).await?;
    Ok(Json(MessageResponse::success(DELETED)))
}
