// ABOUTME: The subset of the deploy server's REST API used by the publisher.
// ABOUTME: DeployApi is the seam between the pipeline and the HTTP client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ClientError;
use crate::types::{ComponentId, RequestId, VersionId};

/// Remote calls needed to publish a version and run a deployment.
#[async_trait]
pub trait DeployApi: Send + Sync {
    /// Health/state probe used to validate a site profile.
    async fn check_state(&self) -> Result<(), ClientError>;

    async fn component_exists(&self, name: &str) -> Result<bool, ClientError>;

    async fn create_component(&self, component: &NewComponent) -> Result<ComponentId, ClientError>;

    async fn add_component_to_application(
        &self,
        component: &str,
        application: &str,
    ) -> Result<(), ClientError>;

    async fn create_version(&self, version: &NewVersion) -> Result<VersionId, ClientError>;

    async fn upload_file(&self, version: &VersionId, file: &VersionFile) -> Result<(), ClientError>;

    async fn set_version_property(
        &self,
        component: &str,
        version: &str,
        name: &str,
        value: &str,
    ) -> Result<(), ClientError>;

    async fn add_version_link(
        &self,
        component: &str,
        version: &str,
        title: &str,
        url: &str,
    ) -> Result<(), ClientError>;

    /// Ask the server to import new versions from the component's source.
    async fn import_versions(&self, import: &VersionImport) -> Result<(), ClientError>;

    async fn create_process(&self, process: &NewProcess) -> Result<(), ClientError>;

    async fn create_snapshot(&self, snapshot: &NewSnapshot) -> Result<(), ClientError>;

    async fn add_versions_to_snapshot(
        &self,
        membership: &SnapshotMembership,
    ) -> Result<(), ClientError>;

    /// Submit an application process request; returns its request id.
    async fn request_process(&self, request: &ProcessRequest) -> Result<RequestId, ClientError>;

    async fn request_status(&self, id: &RequestId) -> Result<RequestStatus, ClientError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentVersion {
    pub component: String,
    pub version: String,
}

impl ComponentVersion {
    pub fn new(component: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComponent {
    pub name: String,
    pub description: String,
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVersion {
    pub component: String,
    pub name: String,
    pub description: String,
    pub incremental: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFile {
    /// Path relative to the push base directory, `/`-separated.
    pub path: String,
    pub content: Vec<u8>,
    pub charset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionImport {
    pub component: String,
    pub source_type: String,
    pub source_properties: BTreeMap<String, String>,
    pub version_properties: BTreeMap<String, String>,
    pub incremental: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProcess {
    pub application: String,
    pub name: String,
    /// Component installed by the process.
    pub component: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnapshot {
    pub application: String,
    pub name: String,
    pub description: String,
    pub versions: Vec<ComponentVersion>,
    /// Capture what is currently deployed in this environment instead of `versions`.
    pub from_environment: Option<String>,
    /// Replace component versions when the snapshot already exists.
    pub update_existing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMembership {
    pub application: String,
    pub snapshot: String,
    pub versions: Vec<ComponentVersion>,
}

/// What an application process request deploys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployTarget {
    Versions(Vec<ComponentVersion>),
    Snapshot(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub application: String,
    pub process: String,
    pub environment: String,
    pub target: DeployTarget,
    pub only_changed: bool,
    pub properties: BTreeMap<String, String>,
    pub description: String,
}

/// Raw status of an application process request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestStatus {
    pub status: String,
    #[serde(default)]
    pub result: Option<String>,
}

impl RequestStatus {
    pub fn new(status: impl Into<String>, result: Option<&str>) -> Self {
        Self {
            status: status.into(),
            result: result.map(str::to_string),
        }
    }
}
