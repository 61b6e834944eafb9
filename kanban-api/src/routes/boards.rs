/// Board endpoints
///
/// # Endpoints
///
/// - `GET /api/boards` - All boards, newest first, each with its full tree
/// - `GET /api/boards/:id` - One board with its full tree
/// - `POST /api/boards` - Create a board, optionally with columns
/// - `PUT /api/boards/:id` - Rename a board
/// - `DELETE /api/boards/:id` - Delete a board and everything under it

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ResourceId, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use kanban_shared::{
    models::board::Board,
    validation::requests::{CreateBoardRequest, UpdateBoardRequest},
};

/// List boards
///
/// ```text
/// GET /api/boards
/// ```
pub async fn list_boards(State(state): State<AppState>) -> ApiResult<Json<Vec<Board>>> {
    let boards = Board::list_all(&state.db).await?;
    Ok(Json(boards))
}

/// Get one board
///
/// # Errors
///
/// - `400 Bad Request`: `:id` is not a UUID
/// - `404 Not Found`: No such board
pub async fn get_board(
    ResourceId(id): ResourceId,
    State(state): State<AppState>,
) -> ApiResult<Json<Board>> {
    let board = Board::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    Ok(Json(board))
}

/// Create a board
///
/// Inline columns take their position in the array as `order` unless one is
/// given, and get the default color when none is given.
///
/// ```text
/// POST /api/boards
/// {"name": "Platform Launch", "columns": [{"name": "Todo"}, {"name": "Doing", "color": "#49C4E5"}]}
/// ```
///
/// Responds `201 Created` with the new board tree.
pub async fn create_board(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateBoardRequest>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    let board = Board::create(&state.db, req.into()).await?;

    tracing::info!(
        board_id = %board.id,
        columns = board.columns.len(),
        "Board created"
    );

    Ok((StatusCode::CREATED, Json(board)))
}

/// Update a board
///
/// Only `name` is updatable; an empty body changes nothing.
///
/// # Errors
///
/// - `400 Bad Request`: Invalid id or body
/// - `404 Not Found`: No such board
pub async fn update_board(
    ResourceId(id): ResourceId,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpdateBoardRequest>,
) -> ApiResult<Json<Board>> {
    let board = Board::update(&state.db, id, req.into()).await?;

    tracing::info!(board_id = %board.id, "Board updated");

    Ok(Json(board))
}

/// Delete a board with its columns, tasks and subtasks
///
/// Responds `204 No Content`.
pub async fn delete_board(
    ResourceId(id): ResourceId,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    if !Board::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Board not found".to_string()));
    }

    tracing::info!(board_id = %id, "Board deleted");

    Ok(StatusCode::NO_CONTENT)
}
