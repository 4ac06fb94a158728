// ABOUTME: Picks the username/password pair for one invocation.
// ABOUTME: A per-invocation override wins over the site profile's defaults.

use serde::{Deserialize, Serialize};

use crate::config::SiteProfile;
use crate::types::Secret;

/// Credentials supplied for a single invocation; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialOverride {
    pub username: String,
    pub password: Secret,
}

impl CredentialOverride {
    pub fn new(username: impl Into<String>, password: impl Into<Secret>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredentials {
    pub username: String,
    pub password: Secret,
    pub use_override: bool,
}

pub fn resolve(site: &SiteProfile, over: Option<&CredentialOverride>) -> ResolvedCredentials {
    match over {
        Some(over) => ResolvedCredentials {
            username: over.username.clone(),
            password: over.password.clone(),
            use_override: true,
        },
        None => ResolvedCredentials {
            username: site.user.clone(),
            password: site.password.clone(),
            use_override: false,
        },
    }
}
