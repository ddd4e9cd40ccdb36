use thiserror::Error;

#[derive(Debug, Error)]
pub enum IsoscapeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("A request is already in progress")]
    RequestInFlight,
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Server error: {0}")]
    ServerError(String),
}

impl IsoscapeError {
    /// The bare message shown in the error banner, without the category prefix.
    pub fn user_message(&self) -> String {
        let message = match self {
            IsoscapeError::ConfigError(msg)
            | IsoscapeError::ValidationError(msg)
            | IsoscapeError::RequestError(msg)
            | IsoscapeError::ResponseError(msg)
            | IsoscapeError::SerializationError(msg)
            | IsoscapeError::IoError(msg)
            | IsoscapeError::ServerError(msg) => msg.trim().to_string(),
            IsoscapeError::RequestInFlight => self.to_string(),
        };

        if message.is_empty() {
            "Erro desconhecido".to_string()
        } else {
            message
        }
    }

    /// Rejected before any network traffic: blank input, or a submit while another request
    /// is still loading.
    pub fn is_local_rejection(&self) -> bool {
        matches!(
            self,
            IsoscapeError::ValidationError(_) | IsoscapeError::RequestInFlight
        )
    }
}

impl From<reqwest::Error> for IsoscapeError {
    fn from(e: reqwest::Error) -> Self {
        IsoscapeError::RequestError(e.to_string())
    }
}

impl From<serde_json::Error> for IsoscapeError {
    fn from(e: serde_json::Error) -> Self {
        IsoscapeError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for IsoscapeError {
    fn from(e: std::io::Error) -> Self {
        IsoscapeError::IoError(e.to_string())
    }
}

impl From<base64::DecodeError> for IsoscapeError {
    fn from(e: base64::DecodeError) -> Self {
        IsoscapeError::ResponseError(format!("Invalid base64 image data: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, IsoscapeError>;
