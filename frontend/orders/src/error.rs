use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Orders endpoint answered {0}")]
    Status(StatusCode),

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Invalid {key} value: {reason}")]
    Config { key: String, reason: String },
}

impl AppError {
    /// Failures worth offering a retry for. A payload the endpoint keeps
    /// sending in the wrong shape will not fix itself.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Network(_) => true,
            AppError::Status(status) => status.is_server_error(),
            AppError::MalformedPayload(_) | AppError::Config { .. } => false,
        }
    }
}
