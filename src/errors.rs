use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Daily limit reached. Try again tomorrow.")]
    ResourceExhausted,

    #[error("Target URL not allowed")]
    Forbidden,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Job timed out")]
    TimedOut,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ResourceExhausted => (
                StatusCode::TOO_MANY_REQUESTS,
                "Daily limit reached. Try again tomorrow.".to_string(),
            ),
            ApiError::Forbidden => {
                tracing::warn!("Rejected proxy request to non-allow-listed target");
                (StatusCode::FORBIDDEN, "Target URL not allowed".to_string())
            }
            ApiError::Upstream(detail) => {
                tracing::error!("Upstream error: {}", detail);
                (StatusCode::BAD_GATEWAY, format!("Upstream error: {}", detail))
            }
            ApiError::TimedOut => (
                StatusCode::GATEWAY_TIMEOUT,
                "Job is still running upstream. Check back later.".to_string(),
            ),
            ApiError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
