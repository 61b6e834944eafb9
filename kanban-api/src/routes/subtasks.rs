/// Subtask endpoints
///
/// Subtasks are created together with their task; afterwards they can only
/// be edited or removed one at a time.
///
/// - `PUT /api/subtasks/:id` - Rename or toggle a subtask
/// - `DELETE /api/subtasks/:id` - Delete a subtask

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ResourceId, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use kanban_shared::{models::subtask::Subtask, validation::requests::UpdateSubtaskRequest};

/// Rename a subtask or set its completion
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: No such subtask
pub async fn update_subtask(
    ResourceId(id): ResourceId,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpdateSubtaskRequest>,
) -> ApiResult<Json<Subtask>> {
    let subtask = Subtask::update(&state.db, id, req.into()).await?;

    tracing::info!(
        subtask_id = %subtask.id,
        is_completed = subtask.is_completed,
        "Subtask updated"
    );

    Ok(Json(subtask))
}

/// Delete a subtask
pub async fn delete_subtask(
    ResourceId(id): ResourceId,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    if !Subtask::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Subtask not found".to_string()));
    }

    tracing::info!(subtask_id = %id, "Subtask deleted");

    Ok(StatusCode::NO_CONTENT)
}
