// ABOUTME: Application-wide error types for ucdeploy.
// ABOUTME: Uses thiserror for configuration, lookup and I/O failures.

use std::path::PathBuf;
use thiserror::Error;

use crate::publish::AbortError;
use crate::types::SiteUrlError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("no site profile named '{0}' is configured")]
    UnknownSite(String),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error(transparent)]
    SiteUrl(#[from] SiteUrlError),

    #[error("connection check failed: {0}")]
    Connection(#[from] crate::client::ClientError),

    #[error("{0}")]
    Abort(#[from] AbortError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
