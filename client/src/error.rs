//! Error handling for the composition editor client

use thiserror::Error;

use shared::ValidationError;

/// Errors surfaced to whoever drives the editor
///
/// Every variant renders a message fit to show the operator as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    #[error("{0} not found")]
    NotFound(String),

    /// The store refused the write because it clashes with existing data
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Could not reach the composition service: {0}")]
    Transport(String),

    /// Operation not allowed in the editor's current mode
    #[error("{0}")]
    InvalidState(String),
}

impl ClientError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::validation(err.field(), err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Transport("request timed out".to_string())
        } else if err.is_decode() {
            ClientError::Transport(format!("unexpected response body: {}", err))
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
