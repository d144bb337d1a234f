//! Error types for workitem-core.

use thiserror::Error;

/// Result type alias for workitem-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while resolving fields or creating a work item.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A field mapping line could not be split into key and value.
    #[error("invalid field mapping: expected 'key=value', got '{0}'")]
    InvalidFieldMapping(String),

    /// No field definition in the project matches the requested name.
    #[error("Field '{0}' not found. Please check if the field name is correct.")]
    FieldNotFound(String),

    /// The backend returned no usable work item.
    #[error("Create WorkItem failed. Maybe one of the inputs is incorrect.")]
    WorkItemCreationFailed,

    /// Error raised by the tracking backend itself (network, auth, validation).
    #[error("{message}")]
    Transport {
        /// HTTP status, when the backend answered at all.
        status: Option<u16>,
        message: String,
    },

    /// Invalid client configuration (organization URL, token).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Build a transport error without a status code.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }
}
