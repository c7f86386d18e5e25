use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised by the plan-generation client
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

#[derive(Deserialize)]
struct MessageBody {
    message: Option<String>,
}

impl ApiError {
    /// Map a failed response to an error. The message comes from the body's
    /// `message` field, else it reads `Error {status}: {reason}`.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let msg = serde_json::from_str::<MessageBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                format!(
                    "Error {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown error")
                )
            });

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(msg),
            StatusCode::NOT_FOUND => ApiError::NotFound(msg),
            status if status.is_server_error() => ApiError::ServerError(msg),
            status if status.is_client_error() => ApiError::BadRequest(msg),
            _ => ApiError::Unknown(msg),
        }
    }
}
