// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::event::DecodeError;
use crate::sink::SinkError;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("ZwiftPower API error: {0}")]
    Upstream(String),

    #[error("Failed to decode event data for rider {zwid}: {source}")]
    Decode {
        zwid: u64,
        #[source]
        source: DecodeError,
    },

    #[error("Output error: {0}")]
    Sink(#[from] SinkError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Upstream(msg) => {
                (StatusCode::BAD_GATEWAY, "zwiftpower_error", Some(msg.clone()))
            }
            AppError::Decode { .. } => (
                StatusCode::BAD_GATEWAY,
                "decode_error",
                Some(self.to_string()),
            ),
            AppError::Sink(err) => {
                tracing::error!(error = %err, "Output sink error");
                (StatusCode::INTERNAL_SERVER_ERROR, "sink_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for services and handlers
pub type Result<T> = std::result::Result<T, AppError>;
