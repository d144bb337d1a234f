//! Work item and attachment models as returned by the tracking backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A work item record created by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkItem {
    /// Numeric identifier assigned by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Revision number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<i64>,

    /// Field values keyed by reference name.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,

    /// REST resource URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Hypermedia links; `html` points at the web page of the item.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<WorkItemLinks>,
}

/// Link collection of a work item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkItemLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<Link>,
}

/// A single hypermedia link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub href: String,
}

impl WorkItem {
    /// Canonical browser URL of the work item, if the backend supplied one.
    #[must_use]
    pub fn html_url(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.html.as_ref())
            .map(|link| link.href.as_str())
            .filter(|href| !href.is_empty())
    }

    /// Set the html link.
    #[must_use]
    pub fn with_html_url(mut self, href: impl Into<String>) -> Self {
        self.links = Some(WorkItemLinks {
            html: Some(Link { href: href.into() }),
        });
        self
    }
}

/// Handle to an uploaded attachment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
}

impl AttachmentReference {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
        }
    }
}

/// Which parts of the created work item the backend should expand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkItemExpand {
    #[default]
    None,
    Relations,
    Fields,
    Links,
    All,
}

impl fmt::Display for WorkItemExpand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Relations => write!(f, "Relations"),
            Self::Fields => write!(f, "Fields"),
            Self::Links => write!(f, "Links"),
            Self::All => write!(f, "All"),
        }
    }
}
