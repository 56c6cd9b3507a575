//! HTTP error responses.
//!
//! Every failure on the JSON surface is answered with
//! `{"error": "...", "details"?: {...}}` and a status from
//! [`CatalogError::http_status_code`].

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catalog_core::{CatalogError, EntityKind, FieldErrors};
use serde::Serialize;
use tracing::{error, warn};

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub const INTERNAL_MESSAGE: &'static str = "Internal server error";

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.body.error
    }

    /// A read of `kind` failed.
    ///
    /// Client errors keep their own message; anything else becomes
    /// `Failed to fetch <plural>`.
    pub fn fetch_failed(kind: EntityKind, err: CatalogError) -> Self {
        if err.is_client_error() {
            return err.into();
        }
        error!("Error fetching {}: {}", kind.plural(), err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: format!("Failed to fetch {}", kind.plural()),
                details: None,
            },
        }
    }

    /// The request body could not be parsed as JSON.
    pub fn malformed_body(rejection: JsonRejection) -> Self {
        warn!("Malformed request body: {}", rejection.body_text());
        CatalogError::invalid_field("body", rejection.body_text()).into()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = err.to_string();

        let body = match err {
            CatalogError::Validation { details, .. } => ErrorBody {
                error: message,
                details: Some(details),
            },
            CatalogError::NotFound { .. } | CatalogError::Persistence { .. } => ErrorBody {
                error: message,
                details: None,
            },
            other => {
                error!("Unhandled error: {}", other);
                ErrorBody {
                    error: Self::INTERNAL_MESSAGE.to_string(),
                    details: None,
                }
            }
        };

        Self { status, body }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
