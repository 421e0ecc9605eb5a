//! Application error types.
//!
//! Two families live here:
//!
//! - [`AppError`] - infrastructure/admin errors carried through repositories
//!   and admin handlers, rendered as a structured JSON body.
//! - [`ResolveError`] - the terminal outcomes of a redirect resolution,
//!   mapped one-to-one onto the public HTTP statuses.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

/// Errors surfaced by repositories, services and admin endpoints.
#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", e);
        AppError::internal("Database error", json!({}))
    }
}

/// Terminal outcome of a failed redirect resolution.
///
/// The first four variants are the user-visible "unservable link" family.
/// `StoreUnavailable` is transient infrastructure failure, retried only at
/// the next independent request, never within one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("short code not found")]
    NotFound,
    #[error("short link has expired")]
    Expired,
    #[error("short link hit limit reached")]
    LimitReached,
    #[error("short link is inactive")]
    Inactive,
    #[error("malformed short code")]
    Malformed,
    #[error("link store unavailable")]
    StoreUnavailable,
}

impl ResolveError {
    fn status(&self) -> StatusCode {
        match self {
            ResolveError::NotFound => StatusCode::NOT_FOUND,
            ResolveError::Expired | ResolveError::LimitReached | ResolveError::Inactive => {
                StatusCode::GONE
            }
            ResolveError::Malformed => StatusCode::BAD_REQUEST,
            ResolveError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ResolveError::NotFound => "not_found",
            ResolveError::Expired => "expired",
            ResolveError::LimitReached => "limit_reached",
            ResolveError::Inactive => "inactive",
            ResolveError::Malformed => "malformed_code",
            ResolveError::StoreUnavailable => "store_unavailable",
        }
    }
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorInfo {
                code: self.code(),
                message: self.to_string(),
                details: json!({}),
            },
        };

        (
            self.status(),
            [(header::CACHE_CONTROL, "no-store")],
            Json(body),
        )
            .into_response()
    }
}
