/// Request extractors that validate before the handler runs
///
/// - [`ValidatedJson`]: JSON body type-checked field by field, then run
///   through every validation rule
/// - [`ResourceId`]: `:id` path segment parsed as a UUID
///
/// Both reject with [`ApiError::ValidationError`], so malformed input never
/// reaches the database.

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use kanban_shared::validation::{self, FieldTypes, FieldViolation};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

/// JSON body that passed validation
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + FieldTypes,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            ApiError::ValidationError(vec![FieldViolation::new("body", rejection.body_text())])
        })?;

        Ok(Self(validation::from_json(body)?))
    }
}

/// Identifier taken from the `:id` path segment
#[derive(Debug, Clone, Copy)]
pub struct ResourceId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::ValidationError(vec![FieldViolation::new("id", "Invalid ID")]))?;

        Ok(Self(validation::parse_id(&raw)?))
    }
}
