// ABOUTME: Runs version creation where the build's files live.
// ABOUTME: PublishTask is serializable so an agent on another machine can execute it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::path::PathBuf;
use std::sync::Arc;

use super::error::{ConfigurationSnafu, ConnectionSnafu, PublishError, VersionCreationSnafu};
use crate::build::{BuildEnv, Provenance};
use crate::client::{ConnectionCache, CredentialOverride};
use crate::config::{SiteProfile, VersionBlock};
use crate::deploy::{CreatedVersion, create_version};
use crate::delivery::build_version_request;

/// One unit of version-creation work, self-contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishTask {
    pub site: SiteProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<CredentialOverride>,
    pub version: VersionBlock,
    pub provenance: Provenance,
    pub env: BuildEnv,
    /// Directory relative push base directories resolve against.
    pub base: PathBuf,
}

/// Capability to execute a [`PublishTask`] next to the workspace files.
#[async_trait]
pub trait Workspace: Send + Sync {
    async fn publish(&self, task: PublishTask) -> Result<CreatedVersion, PublishError>;
}

/// Executes tasks in this process against the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    cache: Arc<ConnectionCache>,
}

impl LocalWorkspace {
    pub fn new(cache: Arc<ConnectionCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl Workspace for LocalWorkspace {
    async fn publish(&self, task: PublishTask) -> Result<CreatedVersion, PublishError> {
        let request = build_version_request(&task.version, &task.env).context(ConfigurationSnafu)?;
        let conn = self
            .cache
            .connection_for(&task.site, task.credentials.as_ref())
            .context(ConnectionSnafu {
                site: task.site.display_name(),
            })?;
        tracing::debug!(
            site = task.site.display_name(),
            handle = %conn.id(),
            component = %request.component,
            delivery = request.delivery.kind(),
            "running publish task"
        );
        create_version(&request, &conn, &task.provenance, &task.base)
            .await
            .context(VersionCreationSnafu)
    }
}
