//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Application errors.
///
/// Store-level failures are normalized here at the repository boundary:
/// connectivity-class errors become [`AppError::Unavailable`] (503), every
/// other database error becomes [`AppError::Database`] (500). Service-level
/// logic raises `NotFound` and `BadRequest` directly.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Database is unavailable, try again later.")]
    Unavailable,

    #[error("error handling database")]
    Database(#[source] sqlx::Error),
}

impl AppError {
    /// Classify a store error per the repository contract.
    ///
    /// Connectivity failures (broken sockets, exhausted or closed pools)
    /// map to 503; anything else the database reports maps to 500. There is
    /// no automatic retry within a request.
    pub fn from_store(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => AppError::Unavailable,
            other => AppError::Database(other),
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body for error responses.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Client errors carry their message; store failures are logged and
        // the response body stays vague.
        match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "error handling database");
            }
            AppError::Unavailable => {
                tracing::error!("error connecting to database");
            }
            _ => {}
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
