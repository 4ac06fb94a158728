// ABOUTME: Site profiles: named connection settings for one deploy server.
// ABOUTME: Raw config entries resolve into profiles with secrets pulled from the environment.

use serde::{Deserialize, Serialize};

use super::EnvValue;
use crate::error::Result;
use crate::types::{Secret, SiteUrl};

/// A site profile as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub profile_name: String,
    pub url: SiteUrl,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: EnvValue,
    #[serde(default)]
    pub trust_all_certs: bool,
    #[serde(default)]
    pub skip_props: bool,
    #[serde(default)]
    pub always_create_new_client: bool,
}

impl SiteConfig {
    /// Site with only a URL; credentials must come from an alternative user.
    pub fn from_url(url: SiteUrl) -> Self {
        Self {
            profile_name: String::new(),
            url,
            user: String::new(),
            password: EnvValue::default(),
            trust_all_certs: false,
            skip_props: false,
            always_create_new_client: false,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.profile_name.is_empty() {
            self.url.as_str()
        } else {
            &self.profile_name
        }
    }

    pub fn resolve(&self) -> Result<SiteProfile> {
        Ok(SiteProfile {
            profile_name: self.profile_name.clone(),
            url: self.url.clone(),
            user: self.user.clone(),
            password: self.password.resolve_secret()?,
            trust_all_certs: self.trust_all_certs,
            skip_props: self.skip_props,
            always_create_new_client: self.always_create_new_client,
        })
    }
}

/// Connection settings for one deploy server, read-only during a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    pub profile_name: String,
    pub url: SiteUrl,
    pub user: String,
    pub password: Secret,
    pub trust_all_certs: bool,
    /// Do not send deployment request properties to this server.
    pub skip_props: bool,
    /// Build a fresh HTTP client for every invocation instead of reusing one.
    pub always_create_new_client: bool,
}

impl SiteProfile {
    pub fn new(
        profile_name: impl Into<String>,
        url: SiteUrl,
        user: impl Into<String>,
        password: impl Into<Secret>,
    ) -> Self {
        Self {
            profile_name: profile_name.into(),
            url,
            user: user.into(),
            password: password.into(),
            trust_all_certs: false,
            skip_props: false,
            always_create_new_client: false,
        }
    }

    pub fn trust_all_certs(mut self, trust: bool) -> Self {
        self.trust_all_certs = trust;
        self
    }

    pub fn skip_props(mut self, skip: bool) -> Self {
        self.skip_props = skip;
        self
    }

    pub fn always_create_new_client(mut self, always: bool) -> Self {
        self.always_create_new_client = always;
        self
    }

    /// Profile name, or the URL when the profile is unnamed.
    pub fn display_name(&self) -> &str {
        if self.profile_name.is_empty() {
            self.url.as_str()
        } else {
            &self.profile_name
        }
    }
}
