use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

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

/// Application error taxonomy.
///
/// `NotFound` deliberately merges "no such record" with "not owned by the
/// caller" so the API never discloses whether a foreign id exists.
/// `RateLimited` is a normal control-flow outcome, not a fault: it carries
/// the limited operation and a retry hint.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    Unauthorized { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("Rate limit exceeded for '{operation}', retry in {retry_after_seconds}s")]
    RateLimited { operation: String, retry_after_seconds: u64 },
    #[error("{message}")]
    RetryExhausted { message: String, details: Value },
    #[error("{message}")]
    DependencyTimeout { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
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
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn rate_limited(operation: impl Into<String>, retry_after_seconds: u64) -> Self {
        Self::RateLimited {
            operation: operation.into(),
            retry_after_seconds,
        }
    }
    pub fn retry_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::RetryExhausted {
            message: message.into(),
            details,
        }
    }
    pub fn dependency_timeout(message: impl Into<String>, details: Value) -> Self {
        Self::DependencyTimeout {
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

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
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
            AppError::Unauthorized { message, details } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message, details)
            }
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Conflict { message, details } => {
                (StatusCode::CONFLICT, "conflict", message, details)
            }
            AppError::RateLimited {
                operation,
                retry_after_seconds,
            } => {
                let body = ErrorBody {
                    error: ErrorInfo {
                        code: "rate_limited",
                        message: format!("Too many '{}' requests. Please try again later.", operation),
                        details: json!({
                            "operation": operation,
                            "retryAfterSeconds": retry_after_seconds,
                        }),
                    },
                };

                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, retry_after_seconds.to_string())],
                    Json(body),
                )
                    .into_response();
            }
            AppError::RetryExhausted { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "retry_exhausted",
                message,
                details,
            ),
            AppError::DependencyTimeout { message, details } => (
                StatusCode::GATEWAY_TIMEOUT,
                "dependency_timeout",
                message,
                details,
            ),
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

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Request validation failed",
            serde_json::to_value(&errors).unwrap_or_else(|_| json!({})),
        )
    }
}

/// Maps low-level sqlx errors to the application taxonomy.
///
/// Internal error detail never reaches the response body; the original error
/// is expected to be logged at the call site.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }
    }

    AppError::internal("Database error", json!({}))
}
