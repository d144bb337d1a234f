//! JSON Patch (RFC 6902) documents for work item creation.
//!
//! Only `add` operations are produced:
//! - `/fields/{referenceName}` for every field value
//! - `/relations/-` for every attached file

use crate::field::FieldMapping;
use crate::item::AttachmentReference;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

/// Relation type linking an uploaded file to a work item.
pub const ATTACHED_FILE_RELATION: &str = "AttachedFile";
/// Comment stored on every attachment relation.
pub const ATTACHMENT_COMMENT: &str = "Attachment added";

/// Patch operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
}

/// A single patch operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchOperation {
    pub op: Operation,
    /// JSON pointer into the work item (e.g., `/fields/System.Title`).
    pub path: String,
    pub value: Value,
}

impl PatchOperation {
    /// Add a field value.
    #[must_use]
    pub fn add_field(reference_name: &str, value: impl Into<Value>) -> Self {
        Self {
            op: Operation::Add,
            path: field_path(reference_name),
            value: value.into(),
        }
    }

    /// Append an `AttachedFile` relation.
    #[must_use]
    pub fn add_attachment(attachment: &AttachmentReference) -> Self {
        Self {
            op: Operation::Add,
            path: "/relations/-".to_string(),
            value: json!({
                "rel": ATTACHED_FILE_RELATION,
                "url": attachment.url,
                "attributes": {
                    "comment": ATTACHMENT_COMMENT
                }
            }),
        }
    }
}

/// Pointer to a field of the work item.
///
/// Reference names keep their dots: `System.Title` → `/fields/System.Title`.
#[must_use]
pub fn field_path(reference_name: &str) -> String {
    format!("/fields/{reference_name}")
}

/// Build the creation document: fields in mapping order, then attachments.
#[must_use]
pub fn build_patch_body(
    fields: &FieldMapping,
    attachments: &[AttachmentReference],
) -> Vec<PatchOperation> {
    let body: Vec<PatchOperation> = fields
        .iter()
        .map(|entry| PatchOperation::add_field(&entry.name, entry.value.as_str()))
        .chain(attachments.iter().map(PatchOperation::add_attachment))
        .collect();

    if tracing::enabled!(tracing::Level::DEBUG) {
        if let Ok(json) = serde_json::to_string(&body) {
            debug!(body = %json, "Request body");
        }
    }

    body
}
