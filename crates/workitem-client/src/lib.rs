//! Azure DevOps REST transport.
//!
//! Implements `WorkItemTrackingApi` over the work item tracking REST API,
//! authenticating with a personal access token.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Body, Client, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::debug;
use workitem_core::{
    AttachmentContent, AttachmentReference, CoreError, CustomHeaders, FieldDefinition,
    PatchOperation, Result, WorkItem, WorkItemExpand, WorkItemTrackingApi,
};

/// REST API version sent with every request.
pub const API_VERSION: &str = "7.1";

const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";
const OCTET_STREAM_CONTENT_TYPE: &str = "application/octet-stream";
const USER_AGENT: &str = concat!("create-workitem/", env!("CARGO_PKG_VERSION"));

/// Client for one Azure DevOps organization (or collection).
#[derive(Clone)]
pub struct AzureDevOpsClient {
    organization_url: Url,
    token: String,
    client: Client,
}

impl std::fmt::Debug for AzureDevOpsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDevOpsClient")
            .field("organization_url", &self.organization_url.as_str())
            .finish_non_exhaustive()
    }
}

/// List envelope used by collection endpoints.
#[derive(Debug, Deserialize)]
struct ValueList<T> {
    value: Vec<T>,
}

/// Error document returned by the service on failure.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl AzureDevOpsClient {
    /// Create a client for `organization_url` (e.g. `https://dev.azure.com/my-org`).
    ///
    /// # Errors
    /// Returns `CoreError::Configuration` if the URL cannot address REST
    /// resources or the HTTP client cannot be built.
    pub fn new(organization_url: &str, token: impl Into<String>) -> Result<Self> {
        let organization_url = Url::parse(organization_url.trim()).map_err(|error| {
            CoreError::Configuration(format!(
                "invalid organization url '{organization_url}': {error}"
            ))
        })?;

        if organization_url.cannot_be_a_base() {
            return Err(CoreError::Configuration(format!(
                "organization url '{organization_url}' is not a base url"
            )));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| {
                CoreError::Configuration(format!("failed to build HTTP client: {error}"))
            })?;

        Ok(Self {
            organization_url,
            token: token.into(),
            client,
        })
    }

    /// The organization URL requests are made against.
    #[must_use]
    pub fn organization_url(&self) -> &Url {
        &self.organization_url
    }

    /// `{organization}/{project}/_apis/wit/{segments..}?api-version=..`
    fn endpoint(&self, project: Option<&str>, segments: &[&str]) -> Url {
        let mut url = self.organization_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            if let Some(project) = project.filter(|p| !p.is_empty()) {
                path.push(project);
            }
            path.push("_apis").push("wit").extend(segments);
        }
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        url
    }

    fn request(&self, method: Method, url: Url, custom_headers: &CustomHeaders) -> RequestBuilder {
        debug!(method = %method, url = %url, "Sending request");

        let mut builder = self
            .client
            .request(method, url)
            .basic_auth("", Some(&self.token));
        for (name, value) in custom_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String)> {
        let response = request
            .send()
            .await
            .map_err(|error| CoreError::transport(format!("request failed: {error}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|error| CoreError::Transport {
            status: Some(status.as_u16()),
            message: format!("failed to read response: {error}"),
        })?;

        debug!(status = %status, "Received response");
        Ok((status, body))
    }
}

/// Turn a failed response into a transport error, preferring the service's
/// own message.
fn error_from_response(status: StatusCode, body: &str) -> CoreError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|error| error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("request failed with status {status}: {body}"));

    CoreError::Transport {
        status: Some(status.as_u16()),
        message,
    }
}

#[async_trait]
impl WorkItemTrackingApi for AzureDevOpsClient {
    async fn get_fields(&self, project: &str) -> Result<Vec<FieldDefinition>> {
        let url = self.endpoint(Some(project), &["fields"]);
        let (status, body) = self
            .send(self.request(Method::GET, url, &CustomHeaders::new()))
            .await?;

        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }

        let fields: ValueList<FieldDefinition> = serde_json::from_str(&body)?;
        Ok(fields.value)
    }

    async fn create_attachment(
        &self,
        custom_headers: &CustomHeaders,
        content: AttachmentContent,
        file_name: &str,
        upload_type: &str,
        project: Option<&str>,
        area_path: Option<&str>,
    ) -> Result<AttachmentReference> {
        let mut url = self.endpoint(project, &["attachments"]);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("fileName", file_name)
                .append_pair("uploadType", upload_type);
            if let Some(area_path) = area_path {
                query.append_pair("areaPath", area_path);
            }
        }

        let request = self
            .request(Method::POST, url, custom_headers)
            .header(CONTENT_TYPE, OCTET_STREAM_CONTENT_TYPE)
            .body(Body::wrap_stream(ReaderStream::new(content)));
        let (status, body) = self.send(request).await?;

        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
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
    ) -> Result<Option<WorkItem>> {
        let type_segment = format!("${work_item_type}");
        let mut url = self.endpoint(Some(project), &["workitems", &type_segment]);
        url.query_pairs_mut()
            .append_pair("validateOnly", &validate_only.to_string())
            .append_pair("bypassRules", &bypass_rules.to_string())
            .append_pair("suppressNotifications", &suppress_notifications.to_string())
            .append_pair("$expand", &expand.to_string());

        let request = self
            .request(Method::POST, url, custom_headers)
            .header(CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
            .body(serde_json::to_vec(document)?);
        let (status, body) = self.send(request).await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(None);
        }

        Ok(serde_json::from_str(&body)?)
    }
}
