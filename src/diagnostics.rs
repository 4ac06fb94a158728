// ABOUTME: Diagnostics accumulator for non-fatal warnings during a publish invocation.
// ABOUTME: Collects warnings that shouldn't fail the build but should be shown to users.

use serde::Serialize;

/// Collects non-fatal warnings during publish operations.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal warning collected during an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Deployment properties were dropped because the site skips them.
    pub fn properties_skipped(site: &str, count: usize) -> Self {
        Self {
            kind: WarningKind::PropertiesSkipped,
            message: format!("site {site} skips deployment properties; {count} ignored"),
        }
    }

    /// A push delivery selected no files; the version is created empty.
    pub fn no_files_matched(component: &str, version: &str) -> Self {
        Self {
            kind: WarningKind::NoFilesMatched,
            message: format!(
                "no files matched for {component} {version}; created an empty version"
            ),
        }
    }

    /// A status poll failed at the transport level and will be retried.
    pub fn poll_retry(attempt: u32, allowed: u32, error: impl std::fmt::Display) -> Self {
        Self {
            kind: WarningKind::PollRetry,
            message: format!("status poll failed ({attempt}/{allowed}), retrying: {error}"),
        }
    }
}

/// Categories of warnings that can occur during an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    PropertiesSkipped,
    NoFilesMatched,
    PollRetry,
}
