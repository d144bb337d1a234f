//! File attachments for work item creation.
//!
//! Resolves file patterns against the local filesystem and uploads each
//! matched file through a `WorkItemTrackingApi`.

pub mod attach;
pub mod config;
pub mod error;

pub use attach::{create_attachments, normalize_pattern, resolve_files};
pub use config::{AttachmentOptions, DEFAULT_UPLOAD_TYPE};
pub use error::{FsError, Result};
