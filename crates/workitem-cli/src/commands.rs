//! The create-workitem step: attachments first, then the work item.

use crate::inputs::ActionInputs;
use crate::output::{self, Outputs};
use anyhow::Result;
use tracing::debug;
use workitem_client::AzureDevOpsClient;
use workitem_core::{CreateOptions, WorkItemTrackingApi, create_work_item};
use workitem_fs::{AttachmentOptions, create_attachments};

/// Name of the step output carrying the work item URL.
pub const WORKITEM_URL_OUTPUT: &str = "workitem_url";

/// Run the step against the configured organization.
pub fn create(inputs: &ActionInputs, outputs: &Outputs) -> Result<String> {
    output::add_mask(&inputs.token);

    let client = AzureDevOpsClient::new(&inputs.organization_url, inputs.token.clone())?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run(&client, inputs, outputs))
}

/// Upload attachments, create the work item and publish its URL.
pub async fn run<A>(api: &A, inputs: &ActionInputs, outputs: &Outputs) -> Result<String>
where
    A: WorkItemTrackingApi + ?Sized,
{
    debug!(
        project = %inputs.project,
        workitem_type = %inputs.workitem_type,
        field_mappings = ?inputs.field_mappings,
        attach_files = ?inputs.attach_files,
        "Inputs"
    );

    output::start_group("Create the attachments");

    let options = AttachmentOptions {
        upload_type: inputs.upload_type.clone(),
        project: Some(inputs.project.clone()),
        area_path: inputs.area_path.clone(),
        ..AttachmentOptions::default()
    };
    let attachments = create_attachments(api, &inputs.attach_files, &options).await?;

    output::end_group();

    output::start_group("Create the workitem");

    let options = CreateOptions {
        attachments,
        validate_only: inputs.validate_only,
        bypass_rules: inputs.bypass_rules,
        suppress_notifications: inputs.suppress_notifications,
        expand: inputs.expand,
        ..CreateOptions::default()
    };
    let created = create_work_item(
        api,
        &inputs.project,
        &inputs.workitem_type,
        &inputs.field_mappings,
        &options,
    )
    .await?;
    debug!(work_item = ?created.item, "Created work item");

    output::print_created(&created.url);
    outputs.set(WORKITEM_URL_OUTPUT, &created.url)?;

    output::end_group();

    Ok(created.url)
}
