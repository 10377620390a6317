use std::borrow::Cow;
use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use validator::{ValidationError, ValidationErrors};
use yamdb_core::error::CoreError;

/// Message for a review the author already wrote.
pub const DUPLICATE_REVIEW_MESSAGE: &str = "You have already reviewed this title.";

/// Field errors keyed by field name, rendered as `{"field": ["message", ...]}`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses:
/// `{"error": ..., "code": ...}` plus `"fields"` for field-level failures.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `yamdb_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request payload failed field validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// A single field-level validation failure.
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(
            field,
            ValidationError::new("invalid").with_message(Cow::Owned(message.into())),
        );
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => {
                let (status, code, message) = classify_core_error(core);
                (status, code, message, None)
            }

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Validation failed".to_string(),
                Some(field_errors(errors)),
            ),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = match fields {
            Some(fields) => json!({ "error": message, "code": code, "fields": fields }),
            None => json!({ "error": message, "code": code }),
        };

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string()),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        // Uniqueness conflicts are reported as client errors, not 409.
        CoreError::Conflict(msg) => (StatusCode::BAD_REQUEST, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Flatten `validator` errors into `{"field": ["message", ...]}`.
///
/// Errors without a custom message fall back to their rule code.
fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value ({})", e.code),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Field name and message reported for a violated unique constraint.
fn unique_constraint_message(constraint: &str) -> Option<(&'static str, &'static str)> {
    match constraint {
        "uq_users_username" => Some(("username", "A user with that username already exists.")),
        "uq_users_email" => Some(("email", "A user with that email already exists.")),
        "uq_categories_slug" => Some(("slug", "A category with this slug already exists.")),
        "uq_genres_slug" => Some(("slug", "A genre with this slug already exists.")),
        _ => None,
    }
}

/// Classify a sqlx error into an HTTP status, error code, message and
/// optional field errors.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (`uq_*`) map to 400, with a field-level
///   message for the constraints that guard a single field.
/// - Foreign key violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(
    err: &sqlx::Error,
) -> (StatusCode, &'static str, String, Option<FieldErrors>) {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
            None,
        );
    }

    if let Some(constraint) = yamdb_db::unique_violation(err) {
        if let Some((field, message)) = unique_constraint_message(constraint) {
            let fields = FieldErrors::from([(field.to_string(), vec![message.to_string()])]);
            return (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                message.to_string(),
                Some(fields),
            );
        }
        if constraint == "uq_reviews_title_author" {
            return (
                StatusCode::BAD_REQUEST,
                "CONFLICT",
                DUPLICATE_REVIEW_MESSAGE.to_string(),
                None,
            );
        }
        if constraint.starts_with("uq_") {
            return (
                StatusCode::BAD_REQUEST,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
                None,
            );
        }
    }

    if yamdb_db::is_foreign_key_violation(err) {
        return (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            "Referenced object does not exist".to_string(),
            None,
        );
    }

    tracing::error!(error = %err, "Database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}
