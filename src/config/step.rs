// ABOUTME: Publish step configuration: alternative user, version block and deploy block.
// ABOUTME: Blocks mirror the build-step form; absent blocks are None, never empty structs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::EnvValue;

/// One publish step of a build job.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishConfig {
    /// Site profile to use; the first configured site when omitted.
    #[serde(default)]
    pub site: Option<String>,

    /// Credentials that replace the site's for this step only.
    #[serde(default)]
    pub alt_user: Option<AltUserConfig>,

    /// Create a new component version.
    #[serde(default)]
    pub component: Option<VersionBlock>,

    /// Deploy to an environment.
    #[serde(default)]
    pub deploy: Option<DeployBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AltUserConfig {
    pub username: String,
    #[serde(default)]
    pub password: EnvValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionBlock {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_component: Option<CreateComponentBlock>,
    #[serde(default)]
    pub delivery: DeliveryBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateComponentBlock {
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub application: String,
}

/// Delivery as written in the form: both members are optional here and the
/// delivery resolver rejects anything but exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<PushBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull: Option<PullBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushBlock {
    pub version: String,
    #[serde(default)]
    pub base_dir: String,
    #[serde(default = "default_include")]
    pub include: String,
    #[serde(default)]
    pub exclude: String,
    #[serde(default)]
    pub extensions: String,
    #[serde(default)]
    pub charset: String,
    #[serde(default)]
    pub properties: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub incremental: bool,
}

fn default_include() -> String {
    "**/*".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullBlock {
    #[serde(default)]
    pub properties: String,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub source_properties: String,
    #[serde(default)]
    pub incremental: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeployBlock {
    pub application: String,
    pub environment: String,
    pub process: String,

    /// `component:version` lines.
    #[serde(default)]
    pub versions: String,

    #[serde(default)]
    pub only_changed: bool,

    /// `name=value` lines.
    #[serde(default)]
    pub properties: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub skip_wait: bool,

    #[serde(default)]
    pub create_process: Option<CreateProcessBlock>,

    #[serde(default)]
    pub create_snapshot: Option<CreateSnapshotBlock>,

    #[serde(default)]
    pub snapshot_component: Option<SnapshotComponentBlock>,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Consecutive transport failures tolerated while polling.
    #[serde(default = "default_poll_retries")]
    pub poll_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProcessBlock {
    /// Component the new process installs.
    pub component: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSnapshotBlock {
    pub name: String,
    #[serde(default)]
    pub deploy_with_snapshot: bool,
    #[serde(default)]
    pub update_snapshot_component: bool,
    #[serde(default)]
    pub include_only_deployed_versions: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotComponentBlock {
    /// Snapshot that receives the deployed component versions.
    pub snapshot: String,
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_timeout() -> Duration {
    Duration::from_secs(3600)
}

fn default_poll_retries() -> u32 {
    3
}

impl DeployBlock {
    /// Minimal deploy block with defaults for everything optional.
    pub fn new(
        application: impl Into<String>,
        environment: impl Into<String>,
        process: impl Into<String>,
    ) -> Self {
        Self {
            application: application.into(),
            environment: environment.into(),
            process: process.into(),
            versions: String::new(),
            only_changed: false,
            properties: String::new(),
            description: String::new(),
            skip_wait: false,
            create_process: None,
            create_snapshot: None,
            snapshot_component: None,
            poll_interval: default_poll_interval(),
            timeout: default_timeout(),
            poll_retries: default_poll_retries(),
        }
    }
}

impl PushBlock {
    pub fn new(version: impl Into<String>, base_dir: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            base_dir: base_dir.into(),
            include: default_include(),
            exclude: String::new(),
            extensions: String::new(),
            charset: String::new(),
            properties: String::new(),
            description: String::new(),
            incremental: false,
        }
    }
}
