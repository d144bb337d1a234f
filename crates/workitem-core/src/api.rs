//! The tracking backend as seen by the creation pipeline.

use crate::error::Result;
use crate::field::FieldDefinition;
use crate::item::{AttachmentReference, WorkItem, WorkItemExpand};
use crate::patch::PatchOperation;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::io::AsyncRead;

/// Extra HTTP headers sent along with a backend call.
pub type CustomHeaders = BTreeMap<String, String>;

/// Readable content of a file being uploaded. Dropping it closes the file.
pub type AttachmentContent = Box<dyn AsyncRead + Send + Sync + Unpin>;

/// Work item tracking operations used to create a work item.
#[async_trait]
pub trait WorkItemTrackingApi: Send + Sync {
    /// All field definitions known to the project, in backend order.
    async fn get_fields(&self, project: &str) -> Result<Vec<FieldDefinition>>;

    /// Upload one file and return a handle to the stored attachment.
    async fn create_attachment(
        &self,
        custom_headers: &CustomHeaders,
        content: AttachmentContent,
        file_name: &str,
        upload_type: &str,
        project: Option<&str>,
        area_path: Option<&str>,
    ) -> Result<AttachmentReference>;

    /// Create a work item from a patch document.
    ///
    /// `Ok(None)` means the backend answered without a work item.
    #[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
    async fn create_work_item(
        &self,
        custom_headers: &CustomHeaders,
        document: &[PatchOperation],
        project: &str,
        work_item_type: &str,
        validate_only: bool,
        bypass_rules: bool,
        suppress_notifications: bool,
        expand: WorkItemExpand,
    ) -> Result<Option<WorkItem>>;
}
