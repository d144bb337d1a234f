//! Error types for attachment handling.

use thiserror::Error;

/// Result type alias for attachment operations.
pub type Result<T> = std::result::Result<T, FsError>;

/// Errors that can occur while resolving or uploading attachments.
#[derive(Debug, Error)]
pub enum FsError {
    /// The attach-file patterns matched no files at all.
    #[error("Create Attachments failed. Maybe one of the file not exists.")]
    NoFilesResolved,

    /// A file pattern is not valid glob syntax.
    #[error("invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend error, passed through with its own message.
    #[error(transparent)]
    Core(#[from] workitem_core::CoreError),
}
