use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use movies_cache::CacheError;
use movies_core::error::CoreError;
use movies_core::repository::RepoError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, repository and cache errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `movies_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage failure surfaced by the movie repository.
    #[error("Repository error: {0}")]
    Repository(#[from] RepoError),

    /// The cache could not be read or written.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Business-rule violations recorded on the request's notifier.
    #[error("Validation failed: {}", .0.join("; "))]
    Notifications(Vec<String>),

    /// The request body failed its model checks.
    #[error("Invalid request: {0}")]
    ModelState(#[from] validator::ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details): (StatusCode, &str, String, Option<Value>) =
            match &self {
                // --- CoreError variants ---
                AppError::Core(core) => match core {
                    CoreError::NotFound { entity, id } => (
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        format!("{entity} with id {id} not found"),
                        None,
                    ),
                    CoreError::Validation(msg) => (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        msg.clone(),
                        None,
                    ),
                },

                // --- Storage / cache ---
                AppError::Repository(err) => classify_repo_error(err),
                AppError::Cache(err) => {
                    tracing::error!(error = %err, "Cache error");
                    internal()
                }

                // --- Validation ---
                AppError::Notifications(messages) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Validation failed".to_string(),
                    Some(json!(messages)),
                ),
                AppError::ModelState(errors) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Request body failed validation".to_string(),
                    serde_json::to_value(errors).ok(),
                ),

                // --- HTTP-specific errors ---
                AppError::BadRequest(msg) => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
                }
                AppError::InternalError(msg) => {
                    tracing::error!(error = %msg, "Internal error");
                    internal()
                }
            };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String, Option<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}

fn classify_repo_error(err: &RepoError) -> (StatusCode, &'static str, String, Option<Value>) {
    match err {
        RepoError::Backend(source) => match source.downcast_ref::<sqlx::Error>() {
            Some(sqlx_err) => {
                let (status, code, message) = classify_sqlx_error(sqlx_err);
                (status, code, message, None)
            }
            None => {
                tracing::error!(error = %source, "Repository backend error");
                internal()
            }
        },
        RepoError::Corrupt { .. } => {
            tracing::error!(error = %err, "Corrupt movie record");
            internal()
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// `RowNotFound` maps to 404. Everything else maps to 500 with a sanitized
/// message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
