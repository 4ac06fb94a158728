// ABOUTME: Stage-tagged orchestration errors with SNAFU pattern.
// ABOUTME: kind() classifies failures so callers can tell configuration from transport trouble.

use snafu::Snafu;

use crate::build::UpstreamResult;
use crate::client::ClientError;
use crate::config::ConfigError;
use crate::deploy::{DeployError, DeploymentOutcome, PollError};

/// Failure of one publish invocation, tagged with the stage that failed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PublishError {
    #[snafu(display("skipped: upstream build result is {upstream}"))]
    Skipped { upstream: UpstreamResult },

    #[snafu(display("invalid step configuration: {source}"))]
    Configuration { source: ConfigError },

    #[snafu(display("site configuration failed: {source}"))]
    Site { source: crate::error::Error },

    #[snafu(display("could not connect to {site}: {source}"))]
    Connection { site: String, source: ClientError },

    #[snafu(display("version creation failed: {source}"))]
    VersionCreation { source: DeployError },

    #[snafu(display("provisioning failed: {source}"))]
    Provisioning { source: DeployError },

    #[snafu(display("deployment trigger failed: {source}"))]
    DeploymentTrigger { source: DeployError },

    /// The server accepted the request; watching it failed.
    #[snafu(display("waiting for deployment failed: {source}"))]
    DeploymentWait { source: DeployError },

    #[snafu(display(
        "deployment outcome: request {} {}: {}",
        outcome.request_id,
        outcome.state,
        outcome.detail
    ))]
    DeploymentOutcome { outcome: DeploymentOutcome },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad configuration; fix the job, do not retry.
    Configuration,
    /// Network or TLS failure.
    Transport,
    /// The server answered with a non-success status.
    RemoteCall,
    /// The deployment ran and failed or did not finish in time.
    DeploymentFailed,
    /// Upstream build already failed; nothing was attempted.
    Skipped,
    /// Status polling gave up.
    Polling,
    /// The invocation was cancelled.
    Cancelled,
}

fn client_kind(error: &ClientError) -> ErrorKind {
    match error {
        ClientError::Tls(_) => ErrorKind::Configuration,
        ClientError::Transport { .. } => ErrorKind::Transport,
        ClientError::Unauthorized { .. }
        | ClientError::Status { .. }
        | ClientError::Decode { .. } => ErrorKind::RemoteCall,
    }
}

fn deploy_kind(error: &DeployError) -> ErrorKind {
    match error {
        DeployError::Poll(PollError::Cancelled) => ErrorKind::Cancelled,
        DeployError::Poll(_) => ErrorKind::Polling,
        DeployError::Artifacts { .. } => ErrorKind::Configuration,
        other => other
            .client_error()
            .map(client_kind)
            .unwrap_or(ErrorKind::RemoteCall),
    }
}

impl PublishError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PublishError::Skipped { .. } => ErrorKind::Skipped,
            PublishError::Configuration { .. } | PublishError::Site { .. } => {
                ErrorKind::Configuration
            }
            PublishError::Connection { source, .. } => client_kind(source),
            PublishError::VersionCreation { source }
            | PublishError::Provisioning { source }
            | PublishError::DeploymentTrigger { source }
            | PublishError::DeploymentWait { source } => deploy_kind(source),
            PublishError::DeploymentOutcome { .. } => ErrorKind::DeploymentFailed,
        }
    }

    /// Short name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            PublishError::Skipped { .. } => "upstream check",
            PublishError::Configuration { .. } | PublishError::Site { .. } => "configuration",
            PublishError::Connection { .. } => "connection",
            PublishError::VersionCreation { .. } => "version creation",
            PublishError::Provisioning { .. } => "provisioning",
            PublishError::DeploymentTrigger { .. } => "deployment trigger",
            PublishError::DeploymentWait { .. } | PublishError::DeploymentOutcome { .. } => {
                "deployment outcome"
            }
        }
    }
}

/// What the build pipeline sees when an invocation fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AbortError {
    pub stage: &'static str,
    pub kind: ErrorKind,
    pub message: String,
}

impl From<PublishError> for AbortError {
    fn from(error: PublishError) -> Self {
        AbortError {
            stage: error.stage(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}
