// ABOUTME: Configuration values that may come from the environment.
// ABOUTME: Keeps passwords out of the config file via { env: VAR } references.

use crate::error::{Error, Result};
use crate::types::Secret;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl Default for EnvValue {
    fn default() -> Self {
        EnvValue::Literal(String::new())
    }
}

impl EnvValue {
    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) => Ok(val),
                Err(_) => default
                    .clone()
                    .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            },
        }
    }

    pub fn resolve_secret(&self) -> Result<Secret> {
        self.resolve().map(Secret::from)
    }
}
