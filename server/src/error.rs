use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AppError {
    #[error("Incorrect password")]
    InvalidSecret { attempts_remaining: u32 },

    #[error("Too many failed attempts, admin login is locked")]
    LockedOut { retry_after_secs: u64 },

    #[error("Not authenticated")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("Not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidSecret { .. } | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::LockedOut { .. } => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
        };

        let detail = self.to_string();
        let body = match self {
            AppError::InvalidSecret { attempts_remaining } => json!({
                "error": "invalid_secret",
                "detail": detail,
                "attempts_remaining": attempts_remaining,
            }),
            AppError::LockedOut { retry_after_secs } => json!({
                "error": "locked_out",
                "detail": detail,
                "retry_after_secs": retry_after_secs,
            }),
            AppError::Unauthorized => json!({ "error": "unauthorized", "detail": detail }),
            AppError::Validation(_) => json!({ "error": "validation", "detail": detail }),
            AppError::NotFound => json!({ "error": "not_found", "detail": detail }),
        };

        (status, Json(body)).into_response()
    }
}
