// ABOUTME: Deployment request resolved from a deploy block.
// ABOUTME: Chooses between deploying explicit versions and deploying a snapshot.

use std::collections::BTreeMap;
use std::time::Duration;

use super::provisioning::{ProvisioningPlan, build_provisioning_plan};
use crate::build::BuildEnv;
use crate::client::{DeployTarget, ProcessRequest};
use crate::config::{ConfigError, DeployBlock};
use crate::delivery::{parse_properties, parse_versions};

/// How the status of a triggered deployment is watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
    /// Consecutive transport failures tolerated before giving up.
    pub retries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub application: String,
    pub environment: String,
    pub process: String,
    pub target: DeployTarget,
    pub only_changed: bool,
    pub properties: BTreeMap<String, String>,
    pub description: String,
    pub skip_wait: bool,
    pub polling: PollSettings,
    pub provisioning: ProvisioningPlan,
}

impl DeploymentRequest {
    pub(crate) fn process_request(&self) -> ProcessRequest {
        ProcessRequest {
            application: self.application.clone(),
            process: self.process.clone(),
            environment: self.environment.clone(),
            target: self.target.clone(),
            only_changed: self.only_changed,
            properties: self.properties.clone(),
            description: self.description.clone(),
        }
    }
}

fn required(value: String, field: &'static str) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::MissingField(field))
    } else {
        Ok(value.trim().to_string())
    }
}

/// Resolve a deploy block, substituting build variables in every text field.
pub fn build_deployment_request(
    block: &DeployBlock,
    env: &BuildEnv,
) -> Result<DeploymentRequest, ConfigError> {
    let application = required(env.expand(&block.application), "deploy.application")?;
    let environment = required(env.expand(&block.environment), "deploy.environment")?;
    let process = required(env.expand(&block.process), "deploy.process")?;

    let target = match &block.create_snapshot {
        Some(snapshot) if snapshot.deploy_with_snapshot => {
            DeployTarget::Snapshot(required(env.expand(&snapshot.name), "create_snapshot.name")?)
        }
        _ => DeployTarget::Versions(parse_versions(&env.expand(&block.versions))?),
    };

    if block.poll_interval.is_zero() {
        return Err(ConfigError::ZeroDuration("deploy.poll_interval"));
    }

    Ok(DeploymentRequest {
        application,
        environment,
        process,
        target,
        only_changed: block.only_changed,
        properties: parse_properties(&env.expand(&block.properties))?,
        description: env.expand(&block.description),
        skip_wait: block.skip_wait,
        polling: PollSettings {
            interval: block.poll_interval,
            timeout: block.timeout,
            retries: block.poll_retries,
        },
        provisioning: build_provisioning_plan(block, env)?,
    })
}
