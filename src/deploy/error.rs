// ABOUTME: Error types for version creation, provisioning and deployment.
// ABOUTME: Every variant names the remote call that failed and keeps the client error.

use std::path::PathBuf;

use crate::client::ClientError;

/// Failures of the status poll loop.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The invocation was cancelled; the remote deployment keeps running.
    #[error("stopped waiting for the deployment: cancelled")]
    Cancelled,

    /// Too many consecutive transport failures.
    #[error("gave up polling after {attempts} consecutive transport failures: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: ClientError,
    },

    /// The server rejected a status request.
    #[error("status request failed: {0}")]
    Remote(#[source] ClientError),
}

/// Errors from executing remote calls.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("failed to look up component {component}: {source}")]
    ComponentLookup {
        component: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to create component {component}: {source}")]
    ComponentCreate {
        component: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to add component {component} to application {application}: {source}")]
    ComponentAttach {
        component: String,
        application: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to read artifacts under {}: {source}", path.display())]
    Artifacts {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create version {version} of {component}: {source}")]
    VersionCreate {
        component: String,
        version: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to upload {path}: {source}")]
    Upload {
        path: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to set version property {name}: {source}")]
    VersionProperty {
        name: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to link version to the build: {0}")]
    VersionLink(#[source] ClientError),

    #[error("failed to import versions of {component}: {source}")]
    Import {
        component: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to create process {name}: {source}")]
    ProcessCreate {
        name: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to create snapshot {name}: {source}")]
    SnapshotCreate {
        name: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to add versions to snapshot {name}: {source}")]
    SnapshotMembership {
        name: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to request {process} in {environment}: {source}")]
    Trigger {
        process: String,
        environment: String,
        #[source]
        source: ClientError,
    },

    #[error(transparent)]
    Poll(#[from] PollError),
}

impl DeployError {
    /// The underlying client error, if the failure came from a remote call.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            DeployError::ComponentLookup { source, .. }
            | DeployError::ComponentCreate { source, .. }
            | DeployError::ComponentAttach { source, .. }
            | DeployError::VersionCreate { source, .. }
            | DeployError::Upload { source, .. }
            | DeployError::VersionProperty { source, .. }
            | DeployError::Import { source, .. }
            | DeployError::ProcessCreate { source, .. }
            | DeployError::SnapshotCreate { source, .. }
            | DeployError::SnapshotMembership { source, .. }
            | DeployError::Trigger { source, .. }
            | DeployError::VersionLink(source) => Some(source),
            DeployError::Poll(PollError::Exhausted { source, .. })
            | DeployError::Poll(PollError::Remote(source)) => Some(source),
            DeployError::Artifacts { .. } | DeployError::Poll(PollError::Cancelled) => None,
        }
    }
}
