// ABOUTME: Parsers for the multi-value text fields of the step form.
// ABOUTME: Lists, name=value property lines and component:version lines.

use std::collections::BTreeMap;

use crate::client::ComponentVersion;
use crate::config::ConfigError;

/// Split a comma- or newline-separated list, dropping blanks.
pub fn parse_list(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `name=value` lines. Blank lines and `#` comments are ignored.
pub fn parse_properties(text: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut properties = BTreeMap::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, value) = line
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidProperty(line.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::InvalidProperty(line.to_string()));
        }
        properties.insert(name.to_string(), value.trim().to_string());
    }
    Ok(properties)
}

/// Parse `component:version` lines.
pub fn parse_versions(text: &str) -> Result<Vec<ComponentVersion>, ConfigError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (component, version) = line
                .split_once(':')
                .ok_or_else(|| ConfigError::InvalidVersion(line.to_string()))?;
            let (component, version) = (component.trim(), version.trim());
            if component.is_empty() || version.is_empty() {
                return Err(ConfigError::InvalidVersion(line.to_string()));
            }
            Ok(ComponentVersion::new(component, version))
        })
        .collect()
}
