// ABOUTME: Errors raised while turning step blocks into requests.
// ABOUTME: Always fatal and never retried; they point at a field of the step config.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("component '{component}' has no delivery: configure either push or pull")]
    NoDelivery { component: String },

    #[error("component '{component}' configures both push and pull delivery; pick one")]
    ConflictingDelivery { component: String },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid property line '{0}': expected name=value")]
    InvalidProperty(String),

    #[error("invalid version line '{0}': expected component:version")]
    InvalidVersion(String),

    #[error("invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}
