// ABOUTME: Configuration types and parsing for ucdeploy.yml.
// ABOUTME: Handles YAML parsing, env var interpolation, and site profile lookup.

mod deserialize;
mod env_value;
mod error;
mod init;
mod site;
mod step;

pub use env_value::EnvValue;
pub use error::ConfigError;
pub use init::init_config;
pub use site::{SiteConfig, SiteProfile};
pub use step::{
    AltUserConfig, CreateComponentBlock, CreateProcessBlock, CreateSnapshotBlock, DeliveryBlock,
    DeployBlock, PublishConfig, PullBlock, PushBlock, SnapshotComponentBlock, VersionBlock,
};

use crate::error::{Error, Result};
use deserialize::deserialize_sites;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "ucdeploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "ucdeploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".ucdeploy/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_sites")]
    pub sites: NonEmpty<SiteConfig>,

    #[serde(default)]
    pub publish: PublishConfig,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Look up a site by display name, defaulting to the first one.
    pub fn site(&self, name: Option<&str>) -> Result<SiteProfile> {
        let site = match name {
            None => self.sites.first(),
            Some(name) => self
                .sites
                .iter()
                .find(|s| s.display_name() == name)
                .ok_or_else(|| Error::UnknownSite(name.to_string()))?,
        };
        site.resolve()
    }

    /// Site selected by the publish step.
    pub fn publish_site(&self) -> Result<SiteProfile> {
        self.site(self.publish.site.as_deref())
    }
}
