// ABOUTME: Server-side objects to create before a deployment is requested.
// ABOUTME: Steps always run in the order process, snapshot, snapshot membership.

use crate::build::BuildEnv;
use crate::client::{
    ComponentVersion, ConnectionHandle, NewProcess, NewSnapshot, SnapshotMembership,
};
use crate::config::{ConfigError, DeployBlock};
use crate::delivery::parse_versions;

use super::error::DeployError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningStep {
    CreateProcess(NewProcess),
    CreateSnapshot(NewSnapshot),
    /// Add the deployed component versions to an existing snapshot.
    AddToSnapshot(SnapshotMembership),
}

impl ProvisioningStep {
    pub fn describe(&self) -> String {
        match self {
            ProvisioningStep::CreateProcess(p) => format!("create process {}", p.name),
            ProvisioningStep::CreateSnapshot(s) => format!("create snapshot {}", s.name),
            ProvisioningStep::AddToSnapshot(m) => {
                format!("add {} version(s) to snapshot {}", m.versions.len(), m.snapshot)
            }
        }
    }
}

/// Ordered provisioning steps for one deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisioningPlan {
    steps: Vec<ProvisioningStep>,
}

impl ProvisioningPlan {
    pub fn steps(&self) -> &[ProvisioningStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

/// Plan the provisioning requested by a deploy block.
pub fn build_provisioning_plan(
    block: &DeployBlock,
    env: &BuildEnv,
) -> Result<ProvisioningPlan, ConfigError> {
    let application = env.expand(&block.application);
    let versions: Vec<ComponentVersion> = parse_versions(&env.expand(&block.versions))?;
    let mut steps = Vec::new();

    if let Some(process) = &block.create_process {
        steps.push(ProvisioningStep::CreateProcess(NewProcess {
            application: application.clone(),
            name: env.expand(&block.process),
            component: env.expand(&process.component),
        }));
    }

    if let Some(snapshot) = &block.create_snapshot {
        let from_environment = if snapshot.include_only_deployed_versions {
            None
        } else {
            Some(env.expand(&block.environment))
        };
        steps.push(ProvisioningStep::CreateSnapshot(NewSnapshot {
            application: application.clone(),
            name: env.expand(&snapshot.name),
            description: env.expand(&block.description),
            versions: versions.clone(),
            from_environment,
            update_existing: snapshot.update_snapshot_component,
        }));
    }

    if let Some(membership) = &block.snapshot_component {
        steps.push(ProvisioningStep::AddToSnapshot(SnapshotMembership {
            application,
            snapshot: env.expand(&membership.snapshot),
            versions,
        }));
    }

    Ok(ProvisioningPlan { steps })
}

/// Run every step in order; the first failure stops the plan.
pub async fn apply_provisioning(
    plan: &ProvisioningPlan,
    conn: &ConnectionHandle,
) -> Result<(), DeployError> {
    let api = conn.api();
    for step in plan.steps() {
        tracing::info!(step = %step.describe(), handle = %conn.id(), "provisioning");
        match step {
            ProvisioningStep::CreateProcess(process) => {
                api.create_process(process)
                    .await
                    .map_err(|source| DeployError::ProcessCreate {
                        name: process.name.clone(),
                        source,
                    })?
            }
            ProvisioningStep::CreateSnapshot(snapshot) => {
                api.create_snapshot(snapshot)
                    .await
                    .map_err(|source| DeployError::SnapshotCreate {
                        name: snapshot.name.clone(),
                        source,
                    })?
            }
            ProvisioningStep::AddToSnapshot(membership) => api
                .add_versions_to_snapshot(membership)
                .await
                .map_err(|source| DeployError::SnapshotMembership {
                    name: membership.snapshot.clone(),
                    source,
                })?,
        }
    }
    Ok(())
}
