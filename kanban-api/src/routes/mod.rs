/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `boards`: Board CRUD
/// - `columns`: Column CRUD and per-board listing
/// - `tasks`: Task CRUD and per-column listing
/// - `subtasks`: Subtask edit and delete

pub mod boards;
pub mod columns;
pub mod health;
pub mod subtasks;
pub mod tasks;

use crate::error::ApiError;

/// Fallback for unmatched paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
