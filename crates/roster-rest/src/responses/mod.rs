//! API response types.
//!
//! Handlers return document bodies directly; there is no envelope. Every
//! failure, whatever its cause, is reported as `500` with an
//! `{"error": "<message>"}` body so the wire contract stays uniform.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::{ErrorBody, RosterError};
use serde::{Deserialize, Serialize};

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub RosterError);

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody::from_error(&self.0));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

/// Body returned by a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

impl DeleteResponse {
    pub fn user_deleted() -> Self {
        Self {
            message: "User deleted".to_string(),
        }
    }
}
