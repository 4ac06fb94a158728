// ABOUTME: State transition methods for a deployment request.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::Deployment;
use super::error::{DeployError, PollError};
use super::outcome::{DeploymentOutcome, OutcomeState, RemoteState, describe};
use super::provisioning::apply_provisioning;
use super::state::{Planned, Provisioned, Triggered};
use crate::client::ConnectionHandle;
use crate::diagnostics::{Diagnostics, Warning};
use crate::types::RequestId;

// =============================================================================
// Planned -> Provisioned
// =============================================================================

impl Deployment<Planned> {
    /// Create the process, snapshot and snapshot membership the request needs.
    pub async fn provision(
        self,
        conn: &ConnectionHandle,
    ) -> Result<Deployment<Provisioned>, DeployError> {
        apply_provisioning(&self.request.provisioning, conn).await?;
        Ok(self.transition(Provisioned))
    }
}

// =============================================================================
// Provisioned -> Triggered
// =============================================================================

impl Deployment<Provisioned> {
    /// Submit the application process request.
    pub async fn trigger(
        self,
        conn: &ConnectionHandle,
    ) -> Result<Deployment<Triggered>, DeployError> {
        let request = &self.request;
        tracing::info!(
            application = %request.application,
            environment = %request.environment,
            process = %request.process,
            handle = %conn.id(),
            "requesting application process"
        );
        let request_id = conn
            .api()
            .request_process(&request.process_request())
            .await
            .map_err(|source| DeployError::Trigger {
                process: request.process.clone(),
                environment: request.environment.clone(),
                source,
            })?;
        tracing::info!(request = %request_id, "deployment requested");
        Ok(self.transition(Triggered { request_id }))
    }
}

// =============================================================================
// Triggered -> outcome
// =============================================================================

impl Deployment<Triggered> {
    /// Wait for the request to finish unless the request says not to.
    ///
    /// Polls right away, then every poll interval until the server reports a
    /// terminal state or the timeout elapses. A status call still in flight
    /// at the deadline is abandoned. Consecutive transport failures
    /// up to the retry budget are recorded as warnings; one more gives up.
    /// Cancellation stops waiting but leaves the remote request running.
    pub async fn await_outcome(
        self,
        conn: &ConnectionHandle,
        cancel: &CancellationToken,
        diagnostics: &mut Diagnostics,
    ) -> Result<DeploymentOutcome, DeployError> {
        let request_id = self.state.request_id;
        if self.request.skip_wait {
            return Ok(DeploymentOutcome::new(
                OutcomeState::SkippedNoWait,
                request_id,
                "not waiting for the deployment",
            ));
        }

        let settings = self.request.polling;
        let deadline = Instant::now() + settings.timeout;
        let mut failures = 0u32;
        let mut last = String::from("no status received");

        loop {
            let polled = tokio::select! {
                _ = cancel.cancelled() => return Err(PollError::Cancelled.into()),
                _ = tokio::time::sleep_until(deadline) => {
                    return Ok(timed_out(request_id, &last, settings.timeout));
                }
                polled = conn.api().request_status(&request_id) => polled,
            };

            match polled {
                Ok(status) => {
                    failures = 0;
                    last = describe(&status);
                    match RemoteState::classify(&status) {
                        RemoteState::Succeeded => {
                            return Ok(DeploymentOutcome::new(
                                OutcomeState::Succeeded,
                                request_id,
                                last,
                            ));
                        }
                        RemoteState::Failed => {
                            return Ok(DeploymentOutcome::new(
                                OutcomeState::Failed,
                                request_id,
                                last,
                            ));
                        }
                        RemoteState::Running => {
                            tracing::debug!(request = %request_id, status = %last, "still running");
                        }
                    }
                }
                Err(error) if error.is_transport() => {
                    failures += 1;
                    if failures > settings.retries {
                        return Err(PollError::Exhausted {
                            attempts: failures,
                            source: error,
                        }
                        .into());
                    }
                    diagnostics.warn(Warning::poll_retry(failures, settings.retries, &error));
                }
                Err(error) => return Err(PollError::Remote(error).into()),
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(timed_out(request_id, &last, settings.timeout));
            }
            let pause = settings.interval.min(deadline - now);
            tokio::select! {
                _ = cancel.cancelled() => return Err(PollError::Cancelled.into()),
                _ = tokio::time::sleep(pause) => {}
            }
        }
    }
}

fn timed_out(request_id: RequestId, last: &str, timeout: Duration) -> DeploymentOutcome {
    DeploymentOutcome::new(
        OutcomeState::TimedOut,
        request_id,
        format!("still {last} after {timeout:?}"),
    )
}

/// Trigger a provisioned deployment and wait for its outcome.
///
/// Failures to submit come back as `DeployError::Trigger`; anything after the
/// server accepted the request is a `DeployError::Poll`.
pub async fn trigger_deployment(
    deployment: Deployment<Provisioned>,
    conn: &ConnectionHandle,
    cancel: &CancellationToken,
    diagnostics: &mut Diagnostics,
) -> Result<DeploymentOutcome, DeployError> {
    deployment
        .trigger(conn)
        .await?
        .await_outcome(conn, cancel, diagnostics)
        .await
}
