use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Error code the REST layer returns when a single-row request matches nothing
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Errors raised by the auth/database service client
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Request failed ({status}): {message}")]
    Api {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to store session: {0}")]
    Session(String),
}

/// Union of the error shapes used by the auth and REST endpoints
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    code: Option<Value>,
    error_code: Option<String>,
}

impl ErrorBody {
    fn message(&self) -> Option<String> {
        [&self.message, &self.msg, &self.error_description, &self.error]
            .into_iter()
            .flatten()
            .find(|m| !m.is_empty())
            .cloned()
    }

    fn code(&self) -> Option<String> {
        match &self.code {
            Some(Value::String(code)) => Some(code.clone()),
            _ => self.error_code.clone(),
        }
    }
}

impl BackendError {
    /// Map a failed response to an error, pulling the message and code out of
    /// the JSON body when there is one
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let code = parsed.code();

        let msg = match parsed.message() {
            Some(m) => m,
            None if !body.trim().is_empty() && !body.trim_start().starts_with('{') => {
                body.trim().to_string()
            }
            None => status.canonical_reason().unwrap_or("Unknown error").to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized(msg),
            StatusCode::NOT_FOUND => BackendError::NotFound(msg),
            _ => BackendError::Api {
                status,
                code,
                message: msg,
            },
        }
    }

    /// Error code reported by the service, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            BackendError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// The request asked for exactly one row and there were none
    pub fn is_no_rows(&self) -> bool {
        self.code() == Some(NO_ROWS_CODE)
    }

    /// Rejections of credentials on the auth endpoints surface as
    /// authentication failures rather than generic API errors
    pub(crate) fn into_auth_failure(self) -> Self {
        match self {
            BackendError::Unauthorized(msg) => BackendError::AuthenticationFailed(msg),
            BackendError::Api { status, message, .. }
                if status == StatusCode::BAD_REQUEST
                    || status == StatusCode::UNPROCESSABLE_ENTITY =>
            {
                BackendError::AuthenticationFailed(message)
            }
            other => other,
        }
    }
}
