// ABOUTME: Normalised base URL of a deploy server.
// ABOUTME: Converts backslashes, trims trailing slashes and checks the scheme.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteUrlError {
    #[error("site URL cannot be empty")]
    Empty,

    #[error("URL {url} is malformed: {reason}")]
    Malformed { url: String, reason: String },
}

/// Base URL of a deploy server, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteUrl(String);

impl SiteUrl {
    pub fn parse(input: &str) -> Result<Self, SiteUrlError> {
        let mut url = input.trim().replace('\\', "/");

        // One slash per iteration so "https://host//" keeps its host.
        while url.ends_with('/') {
            url.pop();
        }

        if url.is_empty() {
            return Err(SiteUrlError::Empty);
        }

        let parsed = reqwest::Url::parse(&url).map_err(|e| SiteUrlError::Malformed {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SiteUrlError::Malformed {
                url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        if parsed.host_str().is_none() {
            return Err(SiteUrlError::Malformed {
                url,
                reason: "missing host".to_string(),
            });
        }

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join a path below the base URL.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl fmt::Display for SiteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for SiteUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SiteUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SiteUrl::parse(&s).map_err(serde::de::Error::custom)
    }
}
