//! Unified error handling for the service boundary.
//!
//! One error type implementing `IntoResponse` so handlers and query modules
//! can use the `?` operator; each kind maps to a distinct HTTP status and a
//! stable `error` code string.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind};
use thiserror::Error;

use shared::api::ErrorResponse;

use crate::cache::CacheError;
use crate::crypto::CryptoError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Database connection pool exhausted or unreachable
    #[error("Database connection error")]
    ConnectionPool(#[source] diesel_async::pooled_connection::deadpool::PoolError),

    /// Database query error
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// State conflict, e.g. assigning an invite that is already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Field-level validation failure, reported before any storage access
    #[error("Invalid request")]
    Validation(#[from] validator::ValidationErrors),

    /// Column encryption or decryption failure
    #[error("Column encryption error")]
    Crypto(#[from] CryptoError),

    /// Event cache failure; corruption is never treated as a miss
    #[error("Event cache error")]
    Cache(#[from] CacheError),

    /// Environment/configuration problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything else internal
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound(resource.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }
}

impl From<diesel_async::pooled_connection::deadpool::PoolError> for ApiError {
    fn from(err: diesel_async::pooled_connection::deadpool::PoolError) -> Self {
        ApiError::ConnectionPool(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::ConnectionPool(e) => {
                tracing::error!("connection pool error: {:?}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("database_unavailable", "Database connection unavailable"),
                )
            }
            ApiError::Database(e) => match e {
                diesel::result::Error::NotFound => (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("not_found", "Resource not found"),
                ),
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => (
                    StatusCode::CONFLICT,
                    ErrorResponse::with_details(
                        "conflict",
                        "A record with this value already exists",
                        serde_json::json!({ "constraint": info.constraint_name() }),
                    ),
                ),
                _ => {
                    tracing::error!("database error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorResponse::new("database_error", "Database operation failed"),
                    )
                }
            },
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("not_found", format!("{} not found", resource)),
            ),
            ApiError::Conflict(message) => (
                StatusCode::CONFLICT,
                ErrorResponse::new("conflict", message.clone()),
            ),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details(
                    "validation_error",
                    "Request failed validation",
                    serde_json::to_value(errors).unwrap_or(serde_json::Value::Null),
                ),
            ),
            ApiError::Crypto(e) => {
                tracing::error!("column encryption error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("encryption_error", "Column encryption failed"),
                )
            }
            ApiError::Cache(CacheError::Corrupted(e)) => {
                tracing::error!("corrupted cache entry: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("corrupted_cache_entry", "Cached event failed to decode"),
                )
            }
            ApiError::Cache(e) => {
                tracing::error!("event cache error: {:?}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("cache_unavailable", "Event cache unavailable"),
                )
            }
            ApiError::Config(message) => {
                tracing::error!("configuration error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("configuration_error", "Server configuration error"),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal_error", "Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers and query modules.
pub type ApiResult<T> = Result<T, ApiError>;
