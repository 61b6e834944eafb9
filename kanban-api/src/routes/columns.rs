/// Column endpoints
///
/// # Endpoints
///
/// - `GET /api/boards/:id/columns` - Columns of a board with their tasks
/// - `GET /api/columns/:id` - One column with its tasks
/// - `POST /api/columns` - Create a column on a board
/// - `PUT /api/columns/:id` - Rename, recolor or reorder a column
/// - `DELETE /api/columns/:id` - Delete a column and its tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ResourceId, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use kanban_shared::{
    models::column::{Column, CreateColumn},
    validation::requests::{CreateColumnRequest, UpdateColumnRequest},
};

/// List the columns of a board
///
/// # Errors
///
/// - `404 Not Found`: No such board
pub async fn list_board_columns(
    ResourceId(board_id): ResourceId,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Column>>> {
    let columns = Column::list_by_board(&state.db, board_id).await?;
    Ok(Json(columns))
}

/// Get one column
pub async fn get_column(
    ResourceId(id): ResourceId,
    State(state): State<AppState>,
) -> ApiResult<Json<Column>> {
    let column = Column::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    Ok(Json(column))
}

/// Create a column
///
/// ```text
/// POST /api/columns
/// {"name": "Review", "boardId": "uuid", "color": "#8471F2", "order": 3}
/// ```
///
/// `color` defaults to `#635FC7` and `order` to 0.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: `boardId` names no board
pub async fn create_column(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateColumnRequest>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    let data = CreateColumn::try_from(req)?;
    let column = Column::create(&state.db, data).await?;

    tracing::info!(
        column_id = %column.id,
        board_id = %column.board_id,
        "Column created"
    );

    Ok((StatusCode::CREATED, Json(column)))
}

/// Update a column
pub async fn update_column(
    ResourceId(id): ResourceId,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpdateColumnRequest>,
) -> ApiResult<Json<Column>> {
    let column = Column::update(&state.db, id, req.into()).await?;

    tracing::info!(column_id = %column.id, "Column updated");

    Ok(Json(column))
}

/// Delete a column with its tasks and their subtasks
pub async fn delete_column(
    ResourceId(id): ResourceId,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    if !Column::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Column not found".to_string()));
    }

    tracing::info!(column_id = %id, "Column deleted");

    Ok(StatusCode::NO_CONTENT)
}
