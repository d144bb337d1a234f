//! Tests for work item creation against an in-memory backend.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Mutex;
use workitem_core::{
    AttachmentContent, AttachmentReference, CoreError, CreateOptions, CustomHeaders,
    FieldDefinition, FieldMapping, PatchOperation, WorkItem, WorkItemExpand, WorkItemTrackingApi,
    create_work_item, resolve_fields,
};

/// Arguments of a recorded `create_work_item` call.
#[derive(Debug, Clone)]
struct CreateCall {
    body: Vec<PatchOperation>,
    project: String,
    work_item_type: String,
    validate_only: bool,
    bypass_rules: bool,
    suppress_notifications: bool,
    expand: WorkItemExpand,
    headers: CustomHeaders,
}

/// In-memory backend with canned responses.
struct FakeApi {
    fields: Vec<FieldDefinition>,
    created: Option<WorkItem>,
    fields_error: Option<String>,
    field_requests: Mutex<Vec<String>>,
    create_calls: Mutex<Vec<CreateCall>>,
}

impl FakeApi {
    fn new(created: Option<WorkItem>) -> Self {
        Self {
            fields: vec![
                FieldDefinition::new("Title", "System.Title"),
                FieldDefinition::new("Assigned To", "System.AssignedTo"),
                FieldDefinition::new("Priority", "Microsoft.VSTS.Common.Priority"),
            ],
            created,
            fields_error: None,
            field_requests: Mutex::new(Vec::new()),
            create_calls: Mutex::new(Vec::new()),
        }
    }

    fn create_calls(&self) -> Vec<CreateCall> {
        self.create_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkItemTrackingApi for FakeApi {
    async fn get_fields(&self, project: &str) -> workitem_core::Result<Vec<FieldDefinition>> {
        self.field_requests.lock().unwrap().push(project.to_string());
        match &self.fields_error {
            Some(message) => Err(CoreError::Transport {
                status: Some(401),
                message: message.clone(),
            }),
            None => Ok(self.fields.clone()),
        }
    }

    async fn create_attachment(
        &self,
        _custom_headers: &CustomHeaders,
        _content: AttachmentContent,
        _file_name: &str,
        _upload_type: &str,
        _project: Option<&str>,
        _area_path: Option<&str>,
    ) -> workitem_core::Result<AttachmentReference> {
        unimplemented!("Not needed for creation tests")
    }

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
    ) -> workitem_core::Result<Option<WorkItem>> {
        self.create_calls.lock().unwrap().push(CreateCall {
            body: document.to_vec(),
            project: project.to_string(),
            work_item_type: work_item_type.to_string(),
            validate_only,
            bypass_rules,
            suppress_notifications,
            expand,
            headers: custom_headers.clone(),
        });
        Ok(self.created.clone())
    }
}

fn created_item() -> WorkItem {
    WorkItem {
        id: Some(7),
        ..WorkItem::default()
    }
    .with_html_url("https://dev.azure.com/org/proj/_workitems/edit/7")
}

#[tokio::test]
async fn test_creates_work_item_with_resolved_fields() {
    let api = FakeApi::new(Some(created_item()));
    let options = CreateOptions {
        attachments: vec![AttachmentReference::new("http://x/att1")],
        ..CreateOptions::default()
    };

    let created = create_work_item(
        &api,
        "proj",
        "Bug",
        &["title = 'Bug A'", "AssignedTo=alice@example.com", "Priority = 2"],
        &options,
    )
    .await
    .unwrap();

    assert_eq!(created.url, "https://dev.azure.com/org/proj/_workitems/edit/7");
    assert_eq!(created.item.id, Some(7));

    let calls = api.create_calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.project, "proj");
    assert_eq!(call.work_item_type, "Bug");

    let body = serde_json::to_value(&call.body).unwrap();
    assert_eq!(
        body,
        json!([
            { "op": "add", "path": "/fields/System.Title", "value": "Bug A" },
            { "op": "add", "path": "/fields/System.AssignedTo", "value": "alice@example.com" },
            { "op": "add", "path": "/fields/Microsoft.VSTS.Common.Priority", "value": "2" },
            {
                "op": "add",
                "path": "/relations/-",
                "value": {
                    "rel": "AttachedFile",
                    "url": "http://x/att1",
                    "attributes": { "comment": "Attachment added" }
                }
            }
        ])
    );
}

#[tokio::test]
async fn test_passes_create_flags() {
    let api = FakeApi::new(Some(created_item()));
    let mut headers = CustomHeaders::new();
    headers.insert("X-TFS-FedAuthRedirect".to_string(), "Suppress".to_string());

    let options = CreateOptions {
        custom_headers: headers.clone(),
        validate_only: true,
        bypass_rules: true,
        suppress_notifications: true,
        expand: WorkItemExpand::Relations,
        ..CreateOptions::default()
    };

    create_work_item(&api, "proj", "Task", &["Title=t"], &options)
        .await
        .unwrap();

    let call = &api.create_calls()[0];
    assert!(call.validate_only);
    assert!(call.bypass_rules);
    assert!(call.suppress_notifications);
    assert_eq!(call.expand, WorkItemExpand::Relations);
    assert_eq!(call.headers, headers);
}

#[tokio::test]
async fn test_null_result_is_failure() {
    let api = FakeApi::new(None);

    let err = create_work_item(&api, "proj", "Bug", &["Title=t"], &CreateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::WorkItemCreationFailed));
    assert_eq!(
        err.to_string(),
        "Create WorkItem failed. Maybe one of the inputs is incorrect."
    );
}

#[tokio::test]
async fn test_result_without_link_is_failure() {
    let api = FakeApi::new(Some(WorkItem {
        id: Some(1),
        ..WorkItem::default()
    }));

    let err = create_work_item(&api, "proj", "Bug", &["Title=t"], &CreateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::WorkItemCreationFailed));
}

#[tokio::test]
async fn test_unknown_field_stops_before_create() {
    let api = FakeApi::new(Some(created_item()));

    let err = create_work_item(
        &api,
        "proj",
        "Bug",
        &["Title=t", "Severity=1 - Critical", "Priority=2"],
        &CreateOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(&err, CoreError::FieldNotFound(name) if name == "Severity"));
    assert_eq!(
        err.to_string(),
        "Field 'Severity' not found. Please check if the field name is correct."
    );
    assert!(api.create_calls().is_empty());
}

#[tokio::test]
async fn test_invalid_line_fails_before_backend() {
    let api = FakeApi::new(Some(created_item()));

    let err = create_work_item(&api, "proj", "Bug", &["Title"], &CreateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::InvalidFieldMapping(_)));
    assert!(api.field_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_transport_error_propagates_unchanged() {
    let mut api = FakeApi::new(Some(created_item()));
    api.fields_error = Some("TF400813: The user is not authorized".to_string());

    let err = create_work_item(&api, "proj", "Bug", &["Title=t"], &CreateOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "TF400813: The user is not authorized");
    assert!(matches!(err, CoreError::Transport { status: Some(401), .. }));
}

#[tokio::test]
async fn test_resolve_fetches_definitions_once() {
    let api = FakeApi::new(None);
    let mapping = FieldMapping::parse(&["title=a", "priority=1", "assigned to=bob"]).unwrap();

    let resolved = resolve_fields(&api, &mapping, "proj").await.unwrap();

    let names: Vec<&str> = resolved.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "System.Title",
            "Microsoft.VSTS.Common.Priority",
            "System.AssignedTo"
        ]
    );
    assert_eq!(*api.field_requests.lock().unwrap(), vec!["proj".to_string()]);
}
