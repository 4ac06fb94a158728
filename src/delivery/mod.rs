// ABOUTME: Turns a version block into a version request with exactly one delivery mode.
// ABOUTME: Push uploads workspace files; pull asks the server to import from a source.

mod files;
mod text;

pub use files::{ArtifactFile, FileFilter, collect_files, compile_pattern, glob_match};
pub use text::{parse_list, parse_properties, parse_versions};

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::build::BuildEnv;
use crate::config::{ConfigError, PullBlock, PushBlock, VersionBlock};

/// Everything needed to create one component version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRequest {
    pub component: String,
    pub create_component: Option<CreateComponent>,
    pub delivery: Delivery,
}

/// Create the component first if it does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateComponent {
    pub template: String,
    /// Application the new component is added to.
    pub application: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Push(PushDelivery),
    Pull(PullDelivery),
}

impl Delivery {
    pub fn kind(&self) -> &'static str {
        match self {
            Delivery::Push(_) => "push",
            Delivery::Pull(_) => "pull",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushDelivery {
    pub version: String,
    pub base_dir: PathBuf,
    pub filter: FileFilter,
    pub charset: Option<String>,
    pub properties: BTreeMap<String, String>,
    pub description: String,
    pub incremental: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullDelivery {
    pub properties: BTreeMap<String, String>,
    pub source_type: String,
    pub source_properties: BTreeMap<String, String>,
    pub incremental: bool,
}

/// Resolve a version block, substituting build variables in every text field.
pub fn build_version_request(
    block: &VersionBlock,
    env: &BuildEnv,
) -> Result<VersionRequest, ConfigError> {
    let component = env.expand(block.name.trim());
    if component.is_empty() {
        return Err(ConfigError::MissingField("component.name"));
    }

    let delivery = match (&block.delivery.push, &block.delivery.pull) {
        (Some(push), None) => Delivery::Push(push_delivery(push, env)?),
        (None, Some(pull)) => Delivery::Pull(pull_delivery(pull, env)?),
        (Some(_), Some(_)) => return Err(ConfigError::ConflictingDelivery { component }),
        (None, None) => return Err(ConfigError::NoDelivery { component }),
    };

    let create_component = block.create_component.as_ref().map(|c| CreateComponent {
        template: env.expand(&c.template),
        application: Some(env.expand(&c.application)).filter(|a| !a.is_empty()),
    });

    Ok(VersionRequest {
        component,
        create_component,
        delivery,
    })
}

fn push_delivery(push: &PushBlock, env: &BuildEnv) -> Result<PushDelivery, ConfigError> {
    let version = env.expand(push.version.trim());
    if version.is_empty() {
        return Err(ConfigError::MissingField("push.version"));
    }

    let charset = env.expand(push.charset.trim());

    Ok(PushDelivery {
        version,
        base_dir: PathBuf::from(env.expand(&push.base_dir)),
        filter: FileFilter::new(
            &parse_list(&env.expand(&push.include)),
            &parse_list(&env.expand(&push.exclude)),
            parse_list(&env.expand(&push.extensions)),
        )?,
        charset: Some(charset).filter(|c| !c.is_empty()),
        properties: parse_properties(&env.expand(&push.properties))?,
        description: env.expand(&push.description),
        incremental: push.incremental,
    })
}

fn pull_delivery(pull: &PullBlock, env: &BuildEnv) -> Result<PullDelivery, ConfigError> {
    Ok(PullDelivery {
        properties: parse_properties(&env.expand(&pull.properties))?,
        source_type: env.expand(pull.source_type.trim()),
        source_properties: parse_properties(&env.expand(&pull.source_properties))?,
        incremental: pull.incremental,
    })
}
