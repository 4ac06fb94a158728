// ABOUTME: The invoking build pipeline as seen by the publisher.
// ABOUTME: Upstream result, environment snapshot with ${VAR} expansion, and provenance.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Result of the build steps that ran before the publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamResult {
    #[default]
    Success,
    Unstable,
    Failure,
    Aborted,
}

impl UpstreamResult {
    /// Whether publishing must be skipped entirely.
    pub fn is_failed(&self) -> bool {
        matches!(self, UpstreamResult::Failure | UpstreamResult::Aborted)
    }
}

impl FromStr for UpstreamResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(UpstreamResult::Success),
            "unstable" => Ok(UpstreamResult::Unstable),
            "failure" | "failed" => Ok(UpstreamResult::Failure),
            "aborted" => Ok(UpstreamResult::Aborted),
            other => Err(format!("unknown build result: {other}")),
        }
    }
}

impl fmt::Display for UpstreamResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UpstreamResult::Success => "success",
            UpstreamResult::Unstable => "unstable",
            UpstreamResult::Failure => "failure",
            UpstreamResult::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Read-only snapshot of the build's environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildEnv(HashMap<String, String>);

impl BuildEnv {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self(vars)
    }

    pub fn from_process() -> Self {
        Self(std::env::vars().collect())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Substitute `$VAR` and `${VAR}` references.
    ///
    /// Bare names stop at the first character outside `[A-Za-z0-9_]`; names
    /// with dots need braces. Unknown variables are left untouched, including
    /// their `$`.
    pub fn expand(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(braced) = after.strip_prefix('{')
                && let Some(end) = braced.find('}')
            {
                let name = &braced[..end];
                match self.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[pos..pos + end + 3]),
                }
                rest = &braced[end + 1..];
                continue;
            }

            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let name = &after[..len];
            match self.get(name) {
                Some(value) if !name.is_empty() => out.push_str(value),
                _ => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = &after[len..];
        }

        out.push_str(rest);
        out
    }
}

/// Where a published version came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub build_name: String,
    pub build_url: String,
}

impl Provenance {
    /// Title of the link attached to pushed versions.
    pub fn link_title(&self) -> String {
        format!("Build {}", self.build_name)
    }
}

/// Everything the publisher needs to know about the current build.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    pub upstream: UpstreamResult,
    pub env: BuildEnv,
    pub provenance: Provenance,
    /// Root of the build workspace; relative push directories resolve against it.
    pub workspace: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> BuildEnv {
        let mut env = BuildEnv::default();
        env.insert("BUILD_NUMBER", "42");
        env.insert("GIT_BRANCH", "main");
        env
    }

    #[test]
    fn expands_braced_and_bare_references() {
        let env = env();
        assert_eq!(env.expand("1.0.${BUILD_NUMBER}"), "1.0.42");
        assert_eq!(env.expand("$GIT_BRANCH-$BUILD_NUMBER"), "main-42");
    }

    #[test]
    fn bare_reference_ends_at_a_dot() {
        let mut env = env();
        env.insert("VERSION", "1.0.3");
        env.insert("MAJOR", "2");
        env.insert("MINOR", "7");
        env.insert("app.version", "9.9");
        assert_eq!(env.expand("app-$VERSION.jar"), "app-1.0.3.jar");
        assert_eq!(env.expand("$MAJOR.$MINOR.$BUILD_NUMBER"), "2.7.42");
        assert_eq!(env.expand("${app.version}"), "9.9");
    }

    #[test]
    fn leaves_unknown_references_alone() {
        let env = env();
        assert_eq!(env.expand("${NOPE}/x"), "${NOPE}/x");
        assert_eq!(env.expand("$NOPE/x"), "$NOPE/x");
        assert_eq!(env.expand("cost: $"), "cost: $");
        assert_eq!(env.expand("${unterminated"), "${unterminated");
    }

    #[test]
    fn failed_and_aborted_builds_are_skipped() {
        assert!(UpstreamResult::Failure.is_failed());
        assert!(UpstreamResult::Aborted.is_failed());
        assert!(!UpstreamResult::Unstable.is_failed());
        assert!(!UpstreamResult::Success.is_failed());
    }

    #[test]
    fn parses_upstream_result() {
        assert_eq!("FAILURE".parse::<UpstreamResult>(), Ok(UpstreamResult::Failure));
        assert!("maybe".parse::<UpstreamResult>().is_err());
    }
}
