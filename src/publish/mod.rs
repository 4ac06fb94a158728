// ABOUTME: Orchestrates one publish invocation: version creation, provisioning, deployment.
// ABOUTME: Every failure becomes a single stage-tagged abort for the build pipeline.

mod error;
mod workspace;

pub use error::{AbortError, ErrorKind, PublishError};
pub use workspace::{LocalWorkspace, PublishTask, Workspace};

use chrono::{DateTime, Utc};
use serde::Serialize;
use snafu::ResultExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::build::BuildContext;
use crate::client::{ConnectionCache, CredentialOverride};
use crate::config::{Config, ConfigError, SiteProfile};
use crate::delivery::build_version_request;
use crate::deploy::{
    CreatedVersion, DeployError, Deployment, DeploymentOutcome, build_deployment_request,
    trigger_deployment,
};
use crate::diagnostics::{Diagnostics, Warning};
use error::{
    ConfigurationSnafu, ConnectionSnafu, DeploymentOutcomeSnafu, ProvisioningSnafu, SiteSnafu,
    SkippedSnafu,
};

/// What a successful invocation did.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub site: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<CreatedVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<DeploymentOutcome>,
    pub warnings: Vec<Warning>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Runs the configured publish step against a build.
pub struct Publisher {
    config: Config,
    cache: Arc<ConnectionCache>,
    workspace: Arc<dyn Workspace>,
    cancel: CancellationToken,
}

impl Publisher {
    /// Publisher backed by the process-wide connection cache, working locally.
    pub fn new(config: Config) -> Self {
        Self::with_cache(config, ConnectionCache::global())
    }

    /// Publisher with its own cache; the local workspace shares it.
    pub fn with_cache(config: Config, cache: Arc<ConnectionCache>) -> Self {
        Self {
            config,
            workspace: Arc::new(LocalWorkspace::new(cache.clone())),
            cache,
            cancel: CancellationToken::new(),
        }
    }

    /// Run version creation somewhere else.
    pub fn workspace(mut self, workspace: impl Workspace + 'static) -> Self {
        self.workspace = Arc::new(workspace);
        self
    }

    pub fn cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn credential_override(&self) -> Result<Option<CredentialOverride>, PublishError> {
        let Some(alt) = &self.config.publish.alt_user else {
            return Ok(None);
        };
        let username = alt.username.trim();
        if username.is_empty() {
            return Err(PublishError::Configuration {
                source: ConfigError::MissingField("alt_user.username"),
            });
        }
        let password = alt.password.resolve_secret().context(SiteSnafu)?;
        Ok(Some(CredentialOverride::new(username, password)))
    }

    /// Execute the publish step for `build`.
    pub async fn run(&self, build: &BuildContext) -> Result<PublishReport, PublishError> {
        let started_at = Utc::now();
        if build.upstream.is_failed() {
            return SkippedSnafu {
                upstream: build.upstream,
            }
            .fail();
        }

        let step = &self.config.publish;
        let site: SiteProfile = self.config.publish_site().context(SiteSnafu)?;
        let credentials = self.credential_override()?;

        // Validate everything before the first remote call.
        if let Some(block) = &step.component {
            build_version_request(block, &build.env).context(ConfigurationSnafu)?;
        }
        let deployment = step
            .deploy
            .as_ref()
            .map(|block| build_deployment_request(block, &build.env))
            .transpose()
            .context(ConfigurationSnafu)?;

        let mut diagnostics = Diagnostics::default();
        tracing::info!(
            site = site.display_name(),
            alt_user = credentials.is_some(),
            version = step.component.is_some(),
            deploy = deployment.is_some(),
            "publish started"
        );

        let mut version = None;
        if let Some(block) = &step.component {
            let task = PublishTask {
                site: site.clone(),
                credentials: credentials.clone(),
                version: block.clone(),
                provenance: build.provenance.clone(),
                env: build.env.clone(),
                base: build.workspace.clone(),
            };
            let created = self.workspace.publish(task).await?;
            if let CreatedVersion::Pushed {
                component,
                version: label,
                files,
                ..
            } = &created
            {
                if files.is_empty() {
                    diagnostics.warn(Warning::no_files_matched(component, label));
                }
            }
            version = Some(created);
        }

        let mut outcome = None;
        if let Some(mut request) = deployment {
            let conn = self
                .cache
                .connection_for(&site, credentials.as_ref())
                .context(ConnectionSnafu {
                    site: site.display_name(),
                })?;

            if site.skip_props && !request.properties.is_empty() {
                diagnostics.warn(Warning::properties_skipped(
                    site.display_name(),
                    request.properties.len(),
                ));
                request.properties.clear();
            }

            let provisioned = Deployment::new(request)
                .provision(&conn)
                .await
                .context(ProvisioningSnafu)?;
            let result = trigger_deployment(provisioned, &conn, &self.cancel, &mut diagnostics)
                .await
                .map_err(|source| match source {
                    DeployError::Trigger { .. } => PublishError::DeploymentTrigger { source },
                    source => PublishError::DeploymentWait { source },
                })?;
            tracing::info!(
                request = %result.request_id,
                state = %result.state,
                "deployment finished"
            );
            if !result.is_success() {
                return DeploymentOutcomeSnafu { outcome: result }.fail();
            }
            outcome = Some(result);
        }

        Ok(PublishReport {
            site: site.display_name().to_string(),
            version,
            deployment: outcome,
            warnings: diagnostics.into_warnings(),
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Run for the build pipeline: success, or an abort naming the failed stage.
    ///
    /// A skipped invocation is not a failure of the publisher and passes.
    pub async fn perform(&self, build: &BuildContext) -> Result<Option<PublishReport>, AbortError> {
        match self.run(build).await {
            Ok(report) => Ok(Some(report)),
            Err(error @ PublishError::Skipped { .. }) => {
                tracing::info!("{error}");
                Ok(None)
            }
            Err(error) => {
                tracing::error!(stage = error.stage(), kind = ?error.kind(), "{error}");
                Err(AbortError::from(error))
            }
        }
    }
}
