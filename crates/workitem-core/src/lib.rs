//! workitem-core: Field resolution and work item creation.
//!
//! This crate provides:
//! - `WorkItemTrackingApi`: The backend operations the pipeline relies on
//! - `FieldMapping` and `resolve_fields`: Display names to reference names
//! - `build_patch_body`: The JSON Patch document sent on creation
//! - `create_work_item`: Parsing, resolution, patch building and creation

pub mod api;
pub mod create;
pub mod error;
pub mod field;
pub mod item;
pub mod patch;

pub use api::{AttachmentContent, CustomHeaders, WorkItemTrackingApi};
pub use create::{CreateOptions, CreatedWorkItem, create_work_item};
pub use error::{CoreError, Result};
pub use field::{FieldDefinition, FieldEntry, FieldMapping, find_field_definition, resolve_fields};
pub use item::{AttachmentReference, Link, WorkItem, WorkItemExpand, WorkItemLinks};
pub use patch::{
    ATTACHED_FILE_RELATION, ATTACHMENT_COMMENT, Operation, PatchOperation, build_patch_body,
    field_path,
};
