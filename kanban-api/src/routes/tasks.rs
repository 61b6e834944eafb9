/// Task endpoints
///
/// # Endpoints
///
/// - `GET /api/columns/:id/tasks` - Tasks of a column with their subtasks
/// - `GET /api/tasks/:id` - One task, with its subtasks and owning column
/// - `POST /api/tasks` - Create a task, optionally with subtasks
/// - `PUT /api/tasks/:id` - Edit a task or move it to another column
/// - `DELETE /api/tasks/:id` - Delete a task and its subtasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ResourceId, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use kanban_shared::{
    models::task::{CreateTask, Task, UpdateTask},
    validation::requests::{CreateTaskRequest, UpdateTaskRequest},
};

/// List the tasks of a column
///
/// # Errors
///
/// - `404 Not Found`: No such column
pub async fn list_column_tasks(
    ResourceId(column_id): ResourceId,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_column(&state.db, column_id).await?;
    Ok(Json(tasks))
}

/// Get one task
///
/// The response carries `column: {id, name}` for the owning column.
pub async fn get_task(
    ResourceId(id): ResourceId,
    State(state): State<AppState>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Create a task
///
/// ```text
/// POST /api/tasks
/// {"title": "Build UI", "columnId": "uuid", "subtasks": [{"title": "Sketch"}, {"title": "Ship"}]}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: `columnId` names no column; nothing is created
pub async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let data = CreateTask::try_from(req)?;
    let task = Task::create(&state.db, data).await?;

    tracing::info!(
        task_id = %task.id,
        column_id = %task.column_id,
        subtasks = task.subtasks.len(),
        "Task created"
    );

    Ok((StatusCode::CREATED, Json(task)))
}

/// Update a task
///
/// A `columnId` moves the task; the target column must exist. An empty
/// `description` clears it.
pub async fn update_task(
    ResourceId(id): ResourceId,
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let data = UpdateTask::try_from(req)?;
    let task = Task::update(&state.db, id, data).await?;

    tracing::info!(task_id = %task.id, column_id = %task.column_id, "Task updated");

    Ok(Json(task))
}

/// Delete a task with its subtasks
pub async fn delete_task(
    ResourceId(id): ResourceId,
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    if !Task::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id = %id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}
