/// Error handling for the API server
///
/// All handlers return `ApiResult<T>`; `ApiError` turns into the JSON error
/// bodies the frontend expects:
///
/// ```text
/// 400  {"error": "Validation error", "details": [{"field": "name", "message": "..."}]}
/// 404  {"error": "Board not found"}
/// 500  {"error": "Internal server error"}
/// ```
///
/// # Example
///
/// ```no_run
/// use kanban_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use kanban_shared::models::board::Board;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// async fn handler(pool: PgPool, id: Uuid) -> ApiResult<Json<Board>> {
///     let board = Board::find_by_id(&pool, id)
///         .await?
///         .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;
///     Ok(Json(board))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kanban_shared::models::DataError;
use kanban_shared::validation::FieldViolation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or invalid input (400), every violation listed
    ValidationError(Vec<FieldViolation>),

    /// Referenced row or parent row does not exist (404)
    NotFound(String),

    /// Storage or programming error (500); details are logged, not returned
    InternalError(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable summary
    pub error: String,

    /// Per-field violations, only for validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation error".to_string(),
                Some(errors),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

impl From<Vec<FieldViolation>> for ApiError {
    fn from(errors: Vec<FieldViolation>) -> Self {
        ApiError::ValidationError(errors)
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                ApiError::NotFound("Parent resource not found".to_string())
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert data-access errors to API errors
impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(resource) => ApiError::NotFound(format!("{} not found", resource)),
            DataError::Database(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_shared::models::Resource;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFound("Board not found".to_string());
        assert_eq!(err.to_string(), "Not found: Board not found");

        let err = ApiError::ValidationError(vec![
            FieldViolation::new("name", "Board name is required"),
            FieldViolation::new("color", "Color must be a valid hex color"),
        ]);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let err = ApiError::ValidationError(vec![FieldViolation::new("name", "Board name is required")]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Validation error");
        assert_eq!(body["details"][0]["field"], "name");
        assert_eq!(body["details"][0]["message"], "Board name is required");
    }

    #[tokio::test]
    async fn test_not_found_from_data_error() {
        let err: ApiError = DataError::NotFound(Resource::Column).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Column not found");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let err: ApiError = sqlx::Error::PoolTimedOut.into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
    }
}
