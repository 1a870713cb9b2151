// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types and their HTTP mappings.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::recorder::RecorderError;
use crate::services::photo::PhotoError;

/// Top-level application error. Every handler returns this so the JSON
/// error shape stays uniform across the API.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("authentication required")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Recorder(#[from] RecorderError),

    #[error(transparent)]
    Photo(#[from] PhotoError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Wire shape for error bodies: a stable machine-readable code plus an
/// optional human-readable detail string.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", Some(self.to_string())),
            AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(self.to_string()))
            }
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict", Some(self.to_string())),
            AppError::Recorder(e) => {
                let (status, code) = match e {
                    RecorderError::InvalidState { .. } => {
                        (StatusCode::CONFLICT, "invalid_state")
                    }
                    RecorderError::NoActivityType => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "no_activity_type")
                    }
                    RecorderError::InsufficientDistance { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_distance")
                    }
                    RecorderError::PhotoRequired => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "photo_required")
                    }
                };
                (status, code, Some(e.to_string()))
            }
            AppError::Photo(e) => {
                let status = match e {
                    PhotoError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    PhotoError::Empty | PhotoError::UnrecognizedFormat => StatusCode::BAD_REQUEST,
                };
                (status, "capture_failed", Some(e.to_string()))
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = Json(ErrorResponse {
            error: code.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_recorder_invalid_state_maps_to_409() {
        let err = AppError::Recorder(RecorderError::InvalidState {
            operation: "pause",
            state: "idle",
        });
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_submission_gates_map_to_422() {
        for err in [
            RecorderError::NoActivityType,
            RecorderError::InsufficientDistance {
                target_km: 2.0,
                shortfall_km: 0.5,
            },
            RecorderError::PhotoRequired,
        ] {
            let response = AppError::Recorder(err).into_response();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn test_oversized_photo_maps_to_413() {
        let err = AppError::Photo(PhotoError::TooLarge {
            size: 6_000_000,
            limit: 5_000_000,
        });
        assert_eq!(
            err.into_response().status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
