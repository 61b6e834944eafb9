/// Health check endpoint
///
/// Reports that the server is up and whether the database answers.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// GET /api/health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "OK",
///   "timestamp": "2025-01-03T12:00:00+00:00",
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `OK`, or `degraded` when the database is unreachable
    pub status: String,

    /// Server time (RFC 3339)
    pub timestamp: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = kanban_shared::db::pool::health_check(&state.db).await.is_ok();

    Ok(Json(HealthResponse {
        status: if connected { "OK" } else { "degraded" }.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
    }))
}
