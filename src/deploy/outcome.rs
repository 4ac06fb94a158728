// ABOUTME: Final result of a deployment request and the mapping from raw remote status.
// ABOUTME: Terminal results are matched case-insensitively.

use serde::Serialize;
use std::fmt;

use crate::client::RequestStatus;
use crate::types::RequestId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeState {
    Succeeded,
    Failed,
    /// The request was accepted and the invocation did not wait for it.
    SkippedNoWait,
    TimedOut,
}

impl fmt::Display for OutcomeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutcomeState::Succeeded => "succeeded",
            OutcomeState::Failed => "failed",
            OutcomeState::SkippedNoWait => "not awaited",
            OutcomeState::TimedOut => "timed out",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentOutcome {
    pub state: OutcomeState,
    pub request_id: RequestId,
    /// Last status reported by the server, or why polling stopped.
    pub detail: String,
}

impl DeploymentOutcome {
    pub fn new(state: OutcomeState, request_id: RequestId, detail: impl Into<String>) -> Self {
        Self {
            state,
            request_id,
            detail: detail.into(),
        }
    }

    /// Succeeded or not awaited; both let the build pass.
    pub fn is_success(&self) -> bool {
        matches!(
            self.state,
            OutcomeState::Succeeded | OutcomeState::SkippedNoWait
        )
    }
}

/// Where a polled request stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteState {
    Running,
    Succeeded,
    Failed,
}

const FAILED_RESULTS: &[&str] = &[
    "FAULTED",
    "FAILED",
    "FAILED TO START",
    "CANCELED",
    "APPROVAL REJECTED",
];

impl RemoteState {
    pub fn classify(status: &RequestStatus) -> Self {
        let result = status
            .result
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_ascii_uppercase();
        if result == "SUCCEEDED" {
            return RemoteState::Succeeded;
        }
        if FAILED_RESULTS.contains(&result.as_str()) {
            return RemoteState::Failed;
        }
        match status.status.trim().to_ascii_uppercase().as_str() {
            "CLOSED" | "FAULTED" => RemoteState::Failed,
            _ => RemoteState::Running,
        }
    }
}

/// Human-readable form of a raw status for logs and outcome details.
pub(crate) fn describe(status: &RequestStatus) -> String {
    match status.result.as_deref().filter(|r| !r.is_empty()) {
        Some(result) => format!("{} ({})", status.status, result),
        None => status.status.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(status: &str, result: Option<&str>) -> RemoteState {
        RemoteState::classify(&RequestStatus::new(status, result))
    }

    #[test]
    fn closed_and_succeeded_is_success() {
        assert_eq!(classify("CLOSED", Some("SUCCEEDED")), RemoteState::Succeeded);
        assert_eq!(classify("closed", Some("succeeded")), RemoteState::Succeeded);
    }

    #[test]
    fn failure_results() {
        for result in ["FAULTED", "Failed", "FAILED TO START", "CANCELED", "approval rejected"] {
            assert_eq!(classify("CLOSED", Some(result)), RemoteState::Failed, "{result}");
        }
    }

    #[test]
    fn terminal_status_without_success_is_failure() {
        assert_eq!(classify("FAULTED", None), RemoteState::Failed);
        assert_eq!(classify("CLOSED", Some("")), RemoteState::Failed);
    }

    #[test]
    fn anything_else_is_running() {
        assert_eq!(classify("EXECUTING", None), RemoteState::Running);
        assert_eq!(classify("PENDING", Some("NONE")), RemoteState::Running);
        assert_eq!(classify("AWAITING APPROVAL", None), RemoteState::Running);
    }

    #[test]
    fn skipped_no_wait_counts_as_success() {
        let outcome =
            DeploymentOutcome::new(OutcomeState::SkippedNoWait, RequestId::new("r-1"), "");
        assert!(outcome.is_success());
        let outcome = DeploymentOutcome::new(OutcomeState::TimedOut, RequestId::new("r-1"), "");
        assert!(!outcome.is_success());
    }
}
