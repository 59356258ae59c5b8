use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use campdex_core::error::CoreError;
use campdex_db::paged::PagedQueryError;

use crate::geocode::GeocodeError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `campdex_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failure in the geocoding collaborator.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<PagedQueryError> for AppError {
    fn from(err: PagedQueryError) -> Self {
        match err {
            PagedQueryError::Query(core) => AppError::Core(core),
            PagedQueryError::Db(db) => AppError::Database(db),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::MalformedQuery(msg) => {
                    (StatusCode::BAD_REQUEST, "MALFORMED_QUERY", msg.clone())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Geocoder errors ---
            AppError::Geocode(err) => classify_geocode_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
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

/// Classify a geocoder error into an HTTP status, error code, and message.
///
/// An unresolvable address is the client's fault (400); transport and
/// provider failures are upstream problems (502) with sanitized messages.
fn classify_geocode_error(err: &GeocodeError) -> (StatusCode, &'static str, String) {
    match err {
        GeocodeError::NoResults(address) => (
            StatusCode::BAD_REQUEST,
            "GEOCODE_NO_RESULTS",
            format!("Could not resolve `{address}` to a location"),
        ),
        GeocodeError::Request(req_err) => {
            tracing::error!(error = %req_err, "Geocoding request failed");
            (
                StatusCode::BAD_GATEWAY,
                "GEOCODE_UPSTREAM",
                "Geocoding service is unavailable".to_string(),
            )
        }
        GeocodeError::Provider { status, .. } => {
            tracing::error!(status, "Geocoding provider returned an error");
            (
                StatusCode::BAD_GATEWAY,
                "GEOCODE_UPSTREAM",
                "Geocoding service is unavailable".to_string(),
            )
        }
    }
}
