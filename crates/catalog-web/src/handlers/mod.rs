//! Request handlers.
//!
//! `api` answers the JSON routes, `pages` the HTML ones. Both receive the
//! entity through the `Extension<EntityKind>` set in [`crate::server`].

pub mod api;
pub mod pages;
mod shared;

use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}
