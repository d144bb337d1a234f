//! Step inputs, validated from the raw command line / environment values.

use anyhow::{Result, anyhow, bail};
use workitem_core::WorkItemExpand;
use workitem_fs::DEFAULT_UPLOAD_TYPE;

/// Validated inputs of a single run.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct ActionInputs {
    pub token: String,
    pub organization_url: String,
    pub project: String,
    pub workitem_type: String,
    /// `name=value` lines.
    pub field_mappings: Vec<String>,
    /// File patterns; empty when nothing should be attached.
    pub attach_files: Vec<String>,
    pub area_path: Option<String>,
    pub upload_type: String,
    pub validate_only: bool,
    pub bypass_rules: bool,
    pub suppress_notifications: bool,
    pub expand: WorkItemExpand,
}

/// Raw, possibly empty, input values.
#[derive(Debug, Default)]
pub struct RawInputs {
    pub token: Option<String>,
    pub organization_url: Option<String>,
    pub project: Option<String>,
    pub workitem_type: Option<String>,
    pub field_mappings: Vec<String>,
    pub attach_files: Vec<String>,
    pub area_path: Option<String>,
    pub upload_type: Option<String>,
    pub validate_only: Option<String>,
    pub bypass_rules: Option<String>,
    pub suppress_notifications: Option<String>,
    pub expand: Option<String>,
}

impl TryFrom<RawInputs> for ActionInputs {
    type Error = anyhow::Error;

    fn try_from(raw: RawInputs) -> Result<Self> {
        let field_mappings = multiline_input(&raw.field_mappings);
        if field_mappings.is_empty() {
            bail!("Input required and not supplied: field_mappings");
        }

        Ok(Self {
            token: required_input("token", raw.token)?,
            organization_url: required_input("organization_url", raw.organization_url)?,
            project: required_input("project", raw.project)?,
            workitem_type: required_input("workitem_type", raw.workitem_type)?,
            field_mappings,
            attach_files: multiline_input(&raw.attach_files),
            area_path: optional_input(raw.area_path),
            upload_type: optional_input(raw.upload_type)
                .unwrap_or_else(|| DEFAULT_UPLOAD_TYPE.to_string()),
            validate_only: boolean_input("validate_only", raw.validate_only.as_deref())?,
            bypass_rules: boolean_input("bypass_rules", raw.bypass_rules.as_deref())?,
            suppress_notifications: boolean_input(
                "suppress_notifications",
                raw.suppress_notifications.as_deref(),
            )?,
            expand: expand_input(raw.expand.as_deref())?,
        })
    }
}

/// Split values on newlines, trim every line and drop blank ones.
#[must_use]
pub fn multiline_input(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.lines())
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

fn optional_input(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_input(name: &str, value: Option<String>) -> Result<String> {
    optional_input(value).ok_or_else(|| anyhow!("Input required and not supplied: {name}"))
}

/// YAML 1.2 core schema booleans; unset means `false`.
fn boolean_input(name: &str, value: Option<&str>) -> Result<bool> {
    match value.map(str::trim).unwrap_or_default() {
        "" | "false" | "False" | "FALSE" => Ok(false),
        "true" | "True" | "TRUE" => Ok(true),
        _ => bail!(
            "Input does not meet YAML 1.2 \"Core Schema\" specification: {name}\n\
             Support boolean input list: `true | True | TRUE | false | False | FALSE`"
        ),
    }
}

fn expand_input(value: Option<&str>) -> Result<WorkItemExpand> {
    let value = value.map(str::trim).unwrap_or_default();
    let expand = match value.to_ascii_lowercase().as_str() {
        "" | "none" => WorkItemExpand::None,
        "relations" => WorkItemExpand::Relations,
        "fields" => WorkItemExpand::Fields,
        "links" => WorkItemExpand::Links,
        "all" => WorkItemExpand::All,
        _ => bail!("invalid expand value '{value}': expected None, Relations, Fields, Links or All"),
    };
    Ok(expand)
}
