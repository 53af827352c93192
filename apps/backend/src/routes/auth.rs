//! Login, registration and password endpoints

use axum::{extract::State, Json};
use classroom_core::validation::{require_non_empty, validate_email};

use crate::error::{ApiError, Result, INVALID_CREDENTIALS};
use crate::models::*;
use crate::routes::extract::ApiJson;
use crate::services::credentials;
use crate::AppState;

const REGISTERED: &str = "تم إنشاء حسابك بنجاح! يمكنك الآن تسجيل الدخول.";
const PASSWORD_UPDATED: &str = "تم تحديث كلمة المرور بنجاح.";

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = state.db.get_user_by_email(payload.email.trim()).await?;

    // Same response whether the email is unknown or the password is wrong.
    let user = match user {
        Some(user) if credentials::verify_password(&payload.password, &user.password) => user,
        _ => {
            tracing::warn!("rejected login attempt");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    };

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        status: Status::Success,
        user: user.to_api_user(),
    }))
}

/// POST /api/register
/// Self-registration always creates a student
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    let email = payload.email.trim().to_string();
    require_non_empty("name", &payload.name)?;
    validate_email(&email)?;
    require_non_empty("password", &payload.password)?;
    require_non_empty("class", &payload.class_name)?;

    let user = state
        .db
        .create_user(NewUser {
            name: payload.name.trim().to_string(),
            email,
            password: payload.password,
            role: Role::Student,
            class_name: Some(payload.class_name),
        })
        .await?;

    Ok(Json(RegisterResponse {
        status: Status::Success,
        message: REGISTERED.to_string(),
        user: user.to_api_user(),
    }))
}

/// POST /api/update_password
pub async fn update_password(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    require_non_empty("newPassword", &payload.new_password)?;

    state
        .db
        .update_password(&payload.user_id, &payload.new_password)
        .await?;

    tracing::info!(user_id = %payload.user_id, "password updated");

    Ok(Json(MessageResponse::success(PASSWORD_UPDATED)))
}
