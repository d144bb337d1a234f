//! Field mappings and their resolution to backend reference names.

use crate::api::WorkItemTrackingApi;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A field as defined in the tracking backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Display name (e.g., "Assigned To").
    pub name: String,

    /// Stable reference name (e.g., "System.AssignedTo").
    pub reference_name: String,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    #[serde(default)]
    pub read_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, reference_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference_name: reference_name.into(),
            field_type: None,
            read_only: false,
            description: None,
        }
    }

    /// Whether a user-supplied key names this field.
    ///
    /// Case-insensitive on the display name, also accepting the display name
    /// with its first space removed ("AssignedTo" for "Assigned To").
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        let name = self.name.to_lowercase();
        let key = key.to_lowercase();
        name == key || name.replacen(' ', "", 1) == key
    }
}

/// One `name = value` assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldEntry {
    pub name: String,
    pub value: String,
}

/// Insertion-ordered field assignments. Re-assigning a name replaces its
/// value and keeps its original position.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldMapping {
    entries: Vec<FieldEntry>,
}

impl FieldMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw `key=value` lines.
    ///
    /// Quote characters are removed, the line is split on the first `=` and
    /// both sides are trimmed. Blank lines are skipped.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidFieldMapping` for a line without `=`.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let mut mapping = Self::new();

        for line in lines {
            let line = line.as_ref().replace(['\'', '"'], "");
            if line.trim().is_empty() {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| CoreError::InvalidFieldMapping(line.trim().to_string()))?;

            mapping.insert(key.trim(), value.trim());
        }

        Ok(mapping)
    }

    /// Set a value, replacing any earlier value for the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.value = value,
            None => self.entries.push(FieldEntry { name, value }),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (name, value) in iter {
            mapping.insert(name, value);
        }
        mapping
    }
}

impl<'a> IntoIterator for &'a FieldMapping {
    type Item = &'a FieldEntry;
    type IntoIter = std::slice::Iter<'a, FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// First definition, in backend order, matching `key`.
#[must_use]
pub fn find_field_definition<'a>(
    definitions: &'a [FieldDefinition],
    key: &str,
) -> Option<&'a FieldDefinition> {
    definitions.iter().find(|field| field.matches(key))
}

/// Replace every name in `mapping` with its reference name.
///
/// # Errors
/// Returns `CoreError::FieldNotFound` for the first name without a matching
/// definition; backend errors are propagated unchanged.
pub async fn resolve_fields<A>(api: &A, mapping: &FieldMapping, project: &str) -> Result<FieldMapping>
where
    A: WorkItemTrackingApi + ?Sized,
{
    let definitions = api.get_fields(project).await?;
    debug!(project = %project, count = definitions.len(), "Fetched field definitions");

    let mut resolved = FieldMapping::new();
    for entry in mapping {
        let field = find_field_definition(&definitions, &entry.name)
            .ok_or_else(|| CoreError::FieldNotFound(entry.name.clone()))?;

        debug!(name = %entry.name, reference = %field.reference_name, "Resolved field");
        resolved.insert(field.reference_name.clone(), entry.value.clone());
    }

    Ok(resolved)
}
