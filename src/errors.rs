use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),

    #[error("Validation error: {0}")]
    ValidationFailure(String),

    #[error("Upstream error ({status}): {message}")]
    UpstreamFailure { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MalformedToken(_) => "MALFORMED_TOKEN",
            AppError::ExpiredToken => "EXPIRED_TOKEN",
            AppError::AuthenticationFailure(_) => "AUTHENTICATION_FAILURE",
            AppError::ValidationFailure(_) => "VALIDATION_FAILURE",
            AppError::UpstreamFailure { .. } => "UPSTREAM_FAILURE",
            AppError::Transport(_) => "TRANSPORT_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
        }
    }

    /// True for the failures that mean "there is no usable session".
    pub fn is_session_loss(&self) -> bool {
        matches!(
            self,
            AppError::MalformedToken(_) | AppError::ExpiredToken | AppError::AuthenticationFailure(_)
        )
    }
}

/// Error body shape returned by the backend. Both keys are seen in the wild.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Transport(format!("JSON error: {}", err))
    }
}
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationFailure(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
