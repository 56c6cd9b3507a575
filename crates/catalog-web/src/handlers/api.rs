//! JSON REST handlers.

use crate::error::ApiError;
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use catalog_core::{CreateInput, DeleteInput, EntityKind, Record, UpdateInput};
use serde::Deserialize;
use std::sync::Arc;

type ApiResult<T> = Result<T, ApiError>;

/// Update body. The id is taken from the path, never from here.
#[derive(Debug, Default, Deserialize)]
pub struct NameBody {
    #[serde(default)]
    pub name: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
) -> ApiResult<Json<Vec<Record>>> {
    let records = state
        .api
        .list(kind)
        .await
        .map_err(|e| ApiError::fetch_failed(kind, e))?;
    Ok(Json(records.to_vec()))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    Path(id): Path<String>,
) -> ApiResult<Json<Record>> {
    let record = state
        .api
        .get(kind, &id)
        .await
        .map_err(|e| ApiError::fetch_failed(kind, e))?;
    Ok(Json(record))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    payload: Result<Json<CreateInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Record>)> {
    let Json(input) = payload.map_err(ApiError::malformed_body)?;
    let record = state.api.create(kind, input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// The id comes from the path; the body only carries the new name.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    Path(id): Path<String>,
    payload: Result<Json<NameBody>, JsonRejection>,
) -> ApiResult<Json<Record>> {
    let Json(body) = payload.map_err(ApiError::malformed_body)?;
    let input = UpdateInput {
        id,
        name: body.name,
    };
    Ok(Json(state.api.update(kind, input).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    Path(id): Path<String>,
) -> ApiResult<Json<Record>> {
    Ok(Json(state.api.delete(kind, DeleteInput::new(id)).await?))
}
