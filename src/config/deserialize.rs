// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Accepts site entries as a bare URL or a detailed profile.

use nonempty::NonEmpty;
use serde::Deserialize;

use super::SiteConfig;
use crate::types::SiteUrl;

pub fn deserialize_sites<'de, D>(deserializer: D) -> Result<NonEmpty<SiteConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<SiteEntry> = Vec::deserialize(deserializer)?;
    let sites = values
        .into_iter()
        .map(|entry| entry.into_site_config())
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)?;

    NonEmpty::from_vec(sites)
        .ok_or_else(|| serde::de::Error::custom("at least one site is required"))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SiteEntry {
    Url(String),
    Detailed(SiteConfig),
}

impl SiteEntry {
    fn into_site_config(self) -> Result<SiteConfig, String> {
        match self {
            SiteEntry::Url(s) => SiteUrl::parse(&s)
                .map(SiteConfig::from_url)
                .map_err(|e| e.to_string()),
            SiteEntry::Detailed(c) => Ok(c),
        }
    }
}
