//! Upload configuration.

use serde::{Deserialize, Serialize};
use workitem_core::CustomHeaders;

/// Options passed to every attachment upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentOptions {
    /// Extra headers for the upload requests.
    #[serde(default)]
    pub custom_headers: CustomHeaders,

    /// Upload type understood by the backend ("Simple" or "Chunked").
    #[serde(default = "default_upload_type")]
    pub upload_type: String,

    /// Project the attachments are stored in.
    #[serde(default)]
    pub project: Option<String>,

    /// Area path used for attachment permissions.
    #[serde(default)]
    pub area_path: Option<String>,
}

/// Upload type used when none is configured.
pub const DEFAULT_UPLOAD_TYPE: &str = "Simple";

fn default_upload_type() -> String {
    DEFAULT_UPLOAD_TYPE.to_string()
}

impl Default for AttachmentOptions {
    fn default() -> Self {
        Self {
            custom_headers: CustomHeaders::new(),
            upload_type: default_upload_type(),
            project: None,
            area_path: None,
        }
    }
}

impl AttachmentOptions {
    /// Options targeting the given project.
    #[must_use]
    pub fn for_project(project: impl Into<String>) -> Self {
        Self {
            project: Some(project.into()),
            ..Default::default()
        }
    }

    /// Set the area path.
    #[must_use]
    pub fn with_area_path(mut self, area_path: impl Into<String>) -> Self {
        self.area_path = Some(area_path.into());
        self
    }
}
