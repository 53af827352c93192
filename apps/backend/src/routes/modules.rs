//! Module endpoints

use axum::{extract::State, Json};
use classroom_core::validation::require_non_empty;

use crate::error::Result;
use crate::models::*;
use crate::routes::extract::ApiJson;
use crate::AppState;

const CREATED: &str = "تم حفظ الوحدة بنجاح";
const UPDATED: &str = "تم تحديث الوحدة بنجاح";
const DELETED: &str = "تم حذف الوحدة بنجاح";

/// POST /api/save_module
pub async fn save(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SaveModuleRequest>,
) -> Result<Json<MessageResponse>> {
    require_non_empty("name", &payload.name)?;
    require_non_empty("class", &payload.class_name)?;

    let response = match payload.id {
        Some(id) => {
            let module = state
                .db
                .update_module(
                    &id,
                    ModuleChanges {
                        name: Some(payload.name),
                        description: payload.description,
                        class_name: Some(payload.class_name),
                        sort_order: payload.sort_order,
                        is_visible: payload.is_visible,
                    },
                )
                .await?;
            MessageResponse::success(UPDATED).with_id(module.id)
        }
        None => {
            let module = state
                .db
                .create_module(NewModule {
                    name: payload.name,
                    description: payload.description.flatten(),
                    class_name: payload.class_name,
                    sort_order: payload.sort_order.unwrap_or(0),
                    is_visible: payload.is_visible.unwrap_or(true),
                })
                .await?;
            tracing::info!(module_id = %module.id, "created module");
            MessageResponse::success(CREATED).with_id(module.id)
        }
    };

    Ok(Json(response))
}

/// POST /api/delete_module
/// Lessons in the module are kept and detached from it
pub async fn delete(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<DeleteRequest>,
) -> Result<Json<MessageResponse>> {
    state.db.delete_module(&payload.id).await?;
    Ok(Json(MessageResponse::success(DELETED)))
}
