//! Work item creation from raw field mapping lines.

use crate::api::{CustomHeaders, WorkItemTrackingApi};
use crate::error::{CoreError, Result};
use crate::field::{FieldMapping, resolve_fields};
use crate::item::{AttachmentReference, WorkItem, WorkItemExpand};
use crate::patch::build_patch_body;
use tracing::{debug, info};

/// Optional parameters for [`create_work_item`].
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CreateOptions {
    /// Attachments to link to the new work item.
    pub attachments: Vec<AttachmentReference>,
    pub custom_headers: CustomHeaders,
    /// Validate the document without saving the work item.
    pub validate_only: bool,
    /// Skip work item type rules.
    pub bypass_rules: bool,
    pub suppress_notifications: bool,
    pub expand: WorkItemExpand,
}

/// A work item the backend accepted, with its browser link.
#[derive(Debug, Clone)]
pub struct CreatedWorkItem {
    pub url: String,
    pub item: WorkItem,
}

/// Create a work item of `work_item_type` in `project`.
///
/// # Errors
/// - `CoreError::InvalidFieldMapping` if a line is not `key=value`
/// - `CoreError::FieldNotFound` if a name has no field definition
/// - `CoreError::WorkItemCreationFailed` if the backend returns no work item
///   or one without a browser link
/// - backend errors unchanged
pub async fn create_work_item<A, S>(
    api: &A,
    project: &str,
    work_item_type: &str,
    field_mappings: &[S],
    options: &CreateOptions,
) -> Result<CreatedWorkItem>
where
    A: WorkItemTrackingApi + ?Sized,
    S: AsRef<str>,
{
    let mapping = FieldMapping::parse(field_mappings)?;
    debug!(count = mapping.len(), "Parsed field mappings");

    let fields = resolve_fields(api, &mapping, project).await?;
    let body = build_patch_body(&fields, &options.attachments);

    let work_item = api
        .create_work_item(
            &options.custom_headers,
            &body,
            project,
            work_item_type,
            options.validate_only,
            options.bypass_rules,
            options.suppress_notifications,
            options.expand,
        )
        .await?;

    let item = work_item.ok_or(CoreError::WorkItemCreationFailed)?;
    let url = item
        .html_url()
        .ok_or(CoreError::WorkItemCreationFailed)?
        .to_string();

    info!(id = ?item.id, work_item_type = %work_item_type, "Created work item");
    Ok(CreatedWorkItem { url, item })
}
